//! In-memory query engine.
//!
//! This is the reference implementation of `QueryEngine`.
//! It keeps triples grouped per document in maps protected by RwLock.
//!
//! ## Limitations
//!
//! - **Naive joins**: patterns are matched by nested loops over every
//!   stored triple. Fine for tests and small embedded graphs.
//! - **No fetching**: documents exist only once something inserts into
//!   them; `clear_cache()` has nothing to drop and only counts calls.
//! - **Eager reads**: a query is evaluated completely before the first
//!   term is streamed.
//!
//! Use this engine for:
//! - Testing path resolution and caching end to end
//! - Embedding a small graph in applications that don't need a store

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use parking_lot::RwLock;
use tracing::trace;

use super::{QueryEngine, TermStream};
use crate::model::term::document_of;
use crate::model::{BlankNode, NamedNode, Term, Variable};
use crate::query::{Node, QuerySpec, TriplePattern};
use crate::{Error, Result};

/// A stored triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTriple {
    pub subject: Term,
    pub predicate: NamedNode,
    pub object: Term,
}

type Solution = HashMap<Variable, Term>;

// ============================================================================
// MemoryEngine
// ============================================================================

/// In-memory triple storage answering `QuerySpec`s.
#[derive(Clone, Default)]
pub struct MemoryEngine {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    /// document IRI → triples, in insertion order
    documents: RwLock<BTreeMap<String, Vec<StoredTriple>>>,
    executions: AtomicU64,
    invalidations: AtomicU64,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a triple in the document of its subject.
    pub fn add(&self, subject: NamedNode, predicate: NamedNode, object: impl Into<Term>) {
        let document = document_of(&subject);
        self.insert(&document, subject, predicate, object);
    }

    /// Store a triple in an explicit document.
    pub fn insert(
        &self,
        document: &NamedNode,
        subject: impl Into<Term>,
        predicate: NamedNode,
        object: impl Into<Term>,
    ) {
        let triple = StoredTriple {
            subject: subject.into(),
            predicate,
            object: object.into(),
        };
        self.inner
            .documents
            .write()
            .entry(document.as_str().to_owned())
            .or_default()
            .push(triple);
    }

    /// The triples of one document.
    pub fn triples(&self, document: &NamedNode) -> Vec<StoredTriple> {
        self.inner
            .documents
            .read()
            .get(document.as_str())
            .cloned()
            .unwrap_or_default()
    }

    /// Total number of stored triples.
    pub fn len(&self) -> usize {
        self.inner.documents.read().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many queries were executed so far.
    pub fn executions(&self) -> u64 {
        self.inner.executions.load(Ordering::Relaxed)
    }

    /// How many times `clear_cache` was called.
    pub fn invalidations(&self) -> u64 {
        self.inner.invalidations.load(Ordering::Relaxed)
    }

    /// All solutions of a basic graph pattern.
    fn evaluate(&self, patterns: &[TriplePattern]) -> Result<Vec<Solution>> {
        let documents = self.inner.documents.read();
        let mut solutions = vec![Solution::new()];
        for pattern in patterns {
            let mut next = Vec::new();
            for solution in &solutions {
                for triple in documents.values().flatten() {
                    if let Some(extended) = match_pattern(pattern, triple, solution)? {
                        next.push(extended);
                    }
                }
            }
            solutions = next;
            if solutions.is_empty() {
                break;
            }
        }
        Ok(solutions)
    }

    /// Instantiate `template` once per solution of `conditions` into `document`.
    fn write(
        &self,
        document: &NamedNode,
        template: &[TriplePattern],
        conditions: &[TriplePattern],
    ) -> Result<usize> {
        let solutions = self.evaluate(conditions)?;
        let mut triples = Vec::new();
        for solution in &solutions {
            // Blank nodes in a template are fresh for every solution.
            let mut fresh: HashMap<BlankNode, BlankNode> = HashMap::new();
            let mut relabel = |term: Term| match term {
                Term::BlankNode(b) => Term::from(fresh.entry(b).or_default().clone()),
                other => other,
            };
            for pattern in template {
                let [s, p, o] = pattern.nodes().map(|node| instantiate(node, solution));
                let (subject, predicate, object) = (relabel(s?), p?, relabel(o?));
                let Term::NamedNode(predicate) = predicate else {
                    return Err(Error::ExecutionError(format!("predicate {predicate} is not an IRI")));
                };
                if let Term::Literal(literal) = &subject {
                    return Err(Error::ExecutionError(format!("literal {literal} cannot be a subject")));
                }
                triples.push(StoredTriple { subject, predicate, object });
            }
        }

        let count = triples.len();
        self.inner
            .documents
            .write()
            .entry(document.as_str().to_owned())
            .or_default()
            .extend(triples);
        Ok(count)
    }
}

fn match_pattern(
    pattern: &TriplePattern,
    triple: &StoredTriple,
    solution: &Solution,
) -> Result<Option<Solution>> {
    let predicate = Term::from(triple.predicate.clone());
    let mut solution = solution.clone();
    for (node, value) in pattern.nodes().into_iter().zip([&triple.subject, &predicate, &triple.object]) {
        match node {
            Node::Subject | Node::User => {
                return Err(Error::ExecutionError(format!("query still contains the {node} placeholder")));
            }
            Node::Term(term) => {
                if term != value {
                    return Ok(None);
                }
            }
            Node::Variable(variable) => match solution.get(variable) {
                Some(bound) if bound != value => return Ok(None),
                Some(_) => {}
                None => {
                    solution.insert(variable.clone(), value.clone());
                }
            },
        }
    }
    Ok(Some(solution))
}

fn instantiate(node: &Node, solution: &Solution) -> Result<Term> {
    match node {
        Node::Term(term) => Ok(term.clone()),
        Node::Variable(variable) => solution
            .get(variable)
            .cloned()
            .ok_or_else(|| Error::ExecutionError(format!("{variable} is unbound in the insert template"))),
        Node::Subject | Node::User => Err(Error::ExecutionError(format!("query still contains the {node} placeholder"))),
    }
}

// ============================================================================
// QueryEngine impl
// ============================================================================

#[async_trait]
impl QueryEngine for MemoryEngine {
    async fn execute(&self, subject: &Term, query: &QuerySpec) -> Result<TermStream> {
        self.inner.executions.fetch_add(1, Ordering::Relaxed);
        match query {
            QuerySpec::Select { variable, patterns } => {
                let terms: Vec<Term> = self
                    .evaluate(patterns)?
                    .into_iter()
                    .filter_map(|mut solution| solution.remove(variable))
                    .collect();
                trace!(%subject, count = terms.len(), "memory engine selected terms");
                Ok(stream::iter(terms.into_iter().map(Ok)).boxed())
            }
            QuerySpec::Insert { template, conditions } => {
                let Term::NamedNode(node) = subject else {
                    return Err(Error::ExecutionError(format!(
                        "cannot write to the document of {subject}"
                    )));
                };
                let count = self.write(&document_of(node), template, conditions)?;
                trace!(%subject, count, "memory engine inserted triples");
                Ok(stream::empty().boxed())
            }
        }
    }

    fn clear_cache(&self, _document: Option<&NamedNode>) {
        self.inner.invalidations.fetch_add(1, Ordering::Relaxed);
    }
}

// ============================================================================
// Tests
// ============================================================================
