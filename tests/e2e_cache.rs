//! End-to-end tests for the query cache: deduplication, invalidation,
//! replay and failure eviction.

mod common;

use std::error::Error as _;
use std::time::Duration;

use pretty_assertions::assert_eq;

use common::*;
use ldpath::Error;

// ============================================================================
// 1. Deduplication
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_accesses_share_one_execution() {
    let (data, engine, _) = anonymous();
    engine.set_delay(Duration::from_millis(50));

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            // Built independently in every task.
            let data = data.clone();
            tokio::spawn(async move { data.entry().get(THIS).get("firstName").await })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap().unwrap(), Some(literal("Ada")));
    }
    assert_eq!(engine.executions(), 1);
    assert_eq!(data.cache().len(), 1);
}

#[tokio::test]
async fn test_sequential_accesses_reuse_the_result() {
    let (data, engine, _) = anonymous();
    let friends = data.subject(iri(THIS)).get("friends");

    let first = friends.to_vec().await.unwrap();
    let again = data.subject(iri(THIS)).resolve(Some("friends")).to_vec().await.unwrap();
    let awaited = friends.first().await.unwrap();

    assert_eq!(first, vec![named(BOB), named(CY)]);
    assert_eq!(again, first);
    assert_eq!(awaited, Some(named(BOB)));
    assert_eq!(engine.executions(), 1);
}

#[tokio::test]
async fn test_distinct_paths_execute_separately() {
    let (data, engine, _) = anonymous();
    let ada = data.subject(iri(THIS));

    ada.get("firstName").await.unwrap();
    ada.get("lastName").await.unwrap();
    ada.get("friends").get("firstName").await.unwrap();
    assert_eq!(engine.executions(), 3);
    assert_eq!(data.cache().len(), 3);
}

// ============================================================================
// 2. Invalidation
// ============================================================================

#[tokio::test]
async fn test_clear_cache_forces_new_execution() {
    let (data, engine, _) = anonymous();
    let name = data.subject(iri(THIS)).get("firstName");

    name.await.unwrap();
    data.clear_cache(None);
    assert!(data.cache().is_empty());

    data.subject(iri(THIS)).get("firstName").await.unwrap();
    assert_eq!(engine.executions(), 2);
    assert_eq!(engine.cleared(), vec![None]);
}

#[tokio::test]
async fn test_clear_cache_sees_new_data() {
    let (data, engine, _) = anonymous();
    let nick = data.subject(iri(THIS)).get("nick");
    assert_eq!(nick.first().await.unwrap(), None);

    engine.store().add(iri(THIS), foaf("nick"), ldpath::Literal::new_simple_literal("ada"));
    assert_eq!(nick.first().await.unwrap(), None);

    nick.clear_cache(None);
    assert_eq!(nick.first().await.unwrap(), Some(literal("ada")));
}

#[tokio::test]
async fn test_clear_cache_for_one_document() {
    let (data, engine, _) = anonymous();
    let ada = data.subject(iri(THIS)).get("firstName");
    let bob = data.subject(iri(BOB)).get("firstName");
    ada.await.unwrap();
    bob.await.unwrap();

    let bob_document = iri("https://bob.example/profile");
    data.clear_cache(Some(&bob_document));
    assert_eq!(data.cache().len(), 1);
    assert_eq!(engine.cleared(), vec![Some("https://bob.example/profile".to_owned())]);

    data.subject(iri(THIS)).get("firstName").await.unwrap();
    data.subject(iri(BOB)).get("firstName").await.unwrap();
    assert_eq!(engine.executions(), 3);
}

#[tokio::test]
async fn test_clear_cache_as_call_segment() {
    let (data, engine, _) = anonymous();
    let name = data.subject(iri(THIS)).get("firstName");
    name.first().await.unwrap();

    let bob = data.subject(iri(BOB)).get("firstName");
    bob.first().await.unwrap();

    // A resource stands for its document.
    let root = name.call("clearCache", vec![THIS.into()]);
    assert_eq!(root, data.subject(iri(THIS)));
    assert_eq!(engine.cleared(), vec![Some("https://ex.org/".to_owned())]);
    assert_eq!(data.cache().len(), 1);
    assert!(data.cache().contains(bob.path()));

    name.call("clearCache", vec![]);
    assert!(data.cache().is_empty());
}

#[tokio::test]
async fn test_clear_cache_with_a_literal_clears_nothing() {
    let (data, engine, _) = anonymous();
    let name = data.subject(iri(THIS)).get("firstName");
    name.first().await.unwrap();

    let rejected = name.call("clearCache", vec![ldpath::Literal::new_simple_literal("ex.org").into()]);
    assert!(matches!(rejected.first().await, Err(Error::PathResolutionError { .. })));
    assert!(engine.cleared().is_empty());
    assert_eq!(data.cache().len(), 1);
}

#[tokio::test]
async fn test_clear_cache_for_a_document_read_mid_path() {
    let (data, engine, _) = anonymous();
    let ada = data.subject(iri(THIS));
    let friend_names = ada.get("friends").get("firstName");
    let name = ada.get("firstName");

    assert_eq!(friend_names.to_vec().await.unwrap(), vec![literal("Bob"), literal("Cy")]);
    name.first().await.unwrap();

    engine.store().add(iri(BOB), foaf("givenName"), ldpath::Literal::new_simple_literal("Robert"));
    data.clear_cache(Some(&iri("https://bob.example/profile")));

    // Ada's own name never left her document.
    assert!(data.cache().contains(name.path()));
    assert!(!data.cache().contains(friend_names.path()));
    assert!(friend_names.to_vec().await.unwrap().contains(&literal("Robert")));
    assert_eq!(engine.executions(), 3);
}

#[tokio::test]
async fn test_evicted_result_keeps_its_terms() {
    let (data, engine, _) = anonymous();
    let result = data.subject(iri(THIS)).get("friends").result();
    let before = result.to_vec().await.unwrap();

    data.clear_cache(None);
    assert_eq!(result.to_vec().await.unwrap(), before);
    assert_eq!(engine.executions(), 1);
}

// ============================================================================
// 3. Failures
// ============================================================================

#[tokio::test]
async fn test_failure_is_reported_with_query_and_cause() {
    let (data, engine, _) = anonymous();
    engine.fail_next(1);

    let err = data.subject(iri(THIS)).get("firstName").await.unwrap_err();

    match &err {
        Error::QueryExecutionError { query, cause } => {
            assert!(query.starts_with("SELECT ?firstName WHERE {"), "{query}");
            assert!(matches!(&**cause, Error::ExecutionError(message) if message == "injected failure"));
        }
        other => panic!("unexpected error {other}"),
    }
    assert!(err.source().is_some());
}

#[tokio::test]
async fn test_failure_is_evicted_and_retried() {
    let (data, engine, _) = anonymous();
    engine.fail_next(1);
    let name = data.subject(iri(THIS)).get("firstName");

    let failed = name.result();
    assert!(failed.first().await.is_err());
    assert!(data.cache().is_empty());

    // Holders of the failed result keep seeing the failure.
    assert!(matches!(failed.to_vec().await, Err(Error::QueryExecutionError { .. })));

    // A new access starts over.
    assert_eq!(name.first().await.unwrap(), Some(literal("Ada")));
    assert!(!name.result().ptr_eq(&failed));
    assert_eq!(engine.executions(), 2);
}

#[tokio::test]
async fn test_resolution_failure_does_not_poison_other_paths() {
    let (data, engine, _) = anonymous();
    let ada = data.subject(iri(THIS));

    assert!(ada.get("undefinedTerm").await.is_err());
    assert_eq!(ada.get("firstName").await.unwrap(), Some(literal("Ada")));
    assert_eq!(engine.executions(), 1);
}
