//! Shared fixtures for the end-to-end tests.
//!
//! `RecordingEngine` wraps a `MemoryEngine` and records what reaches it:
//! every executed query as SPARQL text and every cache invalidation.
//! It can also fail or delay executions on request.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use parking_lot::Mutex;

use ldpath::{
    BlankNode, Error, Literal, MemoryEngine, MemorySession, NamedNode, PathFactory, QueryEngine,
    QuerySpec, Result, SessionProvider, Settings, Term, TermStream,
};

pub const THIS: &str = "https://ex.org/#this";
pub const ME: &str = "https://ex.org/#me";
pub const BOB: &str = "https://bob.example/profile#me";
pub const CY: &str = "https://cy.example/#me";
pub const POST: &str = "https://ex.org/posts/1";
pub const OTHER_POST: &str = "https://ex.org/posts/2";

pub const FOAF: &str = "http://xmlns.com/foaf/0.1/";
pub const AS: &str = "https://www.w3.org/ns/activitystreams#";

pub fn iri(value: &str) -> NamedNode {
    NamedNode::new_unchecked(value)
}

pub fn foaf(local: &str) -> NamedNode {
    iri(&format!("{FOAF}{local}"))
}

pub fn act(local: &str) -> NamedNode {
    iri(&format!("{AS}{local}"))
}

pub fn literal(value: &str) -> Term {
    Literal::new_simple_literal(value).into()
}

pub fn named(value: &str) -> Term {
    iri(value).into()
}

// ============================================================================
// Fixture graph
// ============================================================================

/// Ada (`THIS`) knows Bob and Cy; `ME` knows Ada and likes `POST`;
/// Ada likes `OTHER_POST`.
pub fn fixture() -> MemoryEngine {
    let engine = MemoryEngine::new();

    engine.add(iri(THIS), foaf("givenName"), Literal::new_simple_literal("Ada"));
    engine.add(iri(THIS), foaf("familyName"), Literal::new_simple_literal("Lovelace"));
    engine.add(iri(THIS), foaf("knows"), iri(BOB));
    engine.add(iri(THIS), foaf("knows"), iri(CY));
    engine.add(iri(BOB), foaf("givenName"), Literal::new_simple_literal("Bob"));
    engine.add(iri(CY), foaf("givenName"), Literal::new_simple_literal("Cy"));
    engine.add(iri(ME), foaf("givenName"), Literal::new_simple_literal("Me"));
    engine.add(iri(ME), foaf("knows"), iri(THIS));

    add_activity(&engine, ME, "Like", POST);
    add_activity(&engine, THIS, "Like", OTHER_POST);
    engine
}

pub fn add_activity(engine: &MemoryEngine, actor: &str, kind: &str, object: &str) {
    let document = iri(actor.split_once('#').map_or(actor, |(doc, _)| doc));
    let activity = BlankNode::default();
    let rdf_type = iri("http://www.w3.org/1999/02/22-rdf-syntax-ns#type");
    engine.insert(&document, activity.clone(), rdf_type, act(kind));
    engine.insert(&document, activity.clone(), act("actor"), iri(actor));
    engine.insert(&document, activity, act("object"), iri(object));
}

// ============================================================================
// RecordingEngine
// ============================================================================

#[derive(Default)]
pub struct RecordingEngine {
    store: MemoryEngine,
    queries: Mutex<Vec<String>>,
    cleared: Mutex<Vec<Option<String>>>,
    failures: AtomicUsize,
    delay: Mutex<Option<Duration>>,
}

impl RecordingEngine {
    pub fn new(store: MemoryEngine) -> Arc<Self> {
        Arc::new(Self {
            store,
            ..Self::default()
        })
    }

    pub fn store(&self) -> &MemoryEngine {
        &self.store
    }

    /// SPARQL text of every query that reached the engine, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }

    pub fn executions(&self) -> usize {
        self.queries.lock().len()
    }

    /// Documents passed to `clear_cache`; `None` for a full clear.
    pub fn cleared(&self) -> Vec<Option<String>> {
        self.cleared.lock().clone()
    }

    /// Reject the next `n` executions.
    pub fn fail_next(&self, n: usize) {
        self.failures.store(n, Ordering::SeqCst);
    }

    /// Sleep before answering, to keep executions in flight.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }
}

#[async_trait]
impl QueryEngine for RecordingEngine {
    async fn execute(&self, subject: &Term, query: &QuerySpec) -> Result<TermStream> {
        self.queries.lock().push(query.to_string());

        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let fail = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if fail {
            return Err(Error::ExecutionError("injected failure".into()));
        }
        self.store.execute(subject, query).await
    }

    fn clear_cache(&self, document: Option<&NamedNode>) {
        self.cleared.lock().push(document.map(|d| d.as_str().to_owned()));
    }
}

// ============================================================================
// CountingEngine: unbounded results
// ============================================================================

/// Answers every query with `"0"`, `"1"`, `"2"`, ... forever and counts
/// how many terms were actually produced.
#[derive(Default)]
pub struct CountingEngine {
    produced: Arc<AtomicUsize>,
}

impl CountingEngine {
    pub fn produced(&self) -> usize {
        self.produced.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueryEngine for CountingEngine {
    async fn execute(&self, _subject: &Term, _query: &QuerySpec) -> Result<TermStream> {
        let produced = Arc::clone(&self.produced);
        Ok(stream::iter((0u64..).map(move |n| {
            produced.fetch_add(1, Ordering::SeqCst);
            Ok::<_, Error>(literal(&n.to_string()))
        }))
        .boxed())
    }
}

// ============================================================================
// Factories
// ============================================================================

pub fn factory(engine: &Arc<RecordingEngine>, session: &Arc<MemorySession>) -> PathFactory {
    let engine: Arc<dyn QueryEngine> = engine.clone();
    let session: Arc<dyn SessionProvider> = session.clone();
    PathFactory::new(Settings::builder().engine(engine).session(session).build())
}

/// The fixture graph, nobody logged in.
pub fn anonymous() -> (PathFactory, Arc<RecordingEngine>, Arc<MemorySession>) {
    let engine = RecordingEngine::new(fixture());
    let session = Arc::new(MemorySession::anonymous());
    (factory(&engine, &session), engine, session)
}

/// The fixture graph, logged in as `ME`.
pub fn logged_in() -> (PathFactory, Arc<RecordingEngine>, Arc<MemorySession>) {
    let (data, engine, session) = anonymous();
    session.login(iri(ME));
    (data, engine, session)
}
