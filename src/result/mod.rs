//! # Lazy Results
//!
//! A [`LazyResult`] is the execution of one path, started by whoever asks
//! for a term first and shared by everyone else holding it.
//!
//! ```text
//! Idle ──first access──▶ Streaming ──end──▶ Done
//!   │                       │
//!   └──────── error ────────┴──────────────▶ Failed
//! ```
//!
//! Terms are recorded as they arrive, so every consumer (and every later
//! iteration) replays the same sequence without querying again. A failed
//! result evicts itself from its cache; the next lookup of the same path
//! starts over.

use std::fmt;
use std::future::IntoFuture;
use std::iter;
use std::sync::{Arc, Weak};

use futures::future::BoxFuture;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use tracing::{debug, trace};

use crate::cache::{CacheInner, CacheKey};
use crate::engine::TermStream;
use crate::model::term::document_of;
use crate::model::{NamedNode, Path, Term};
use crate::query::{Node, QuerySpec};
use crate::resolver::{Resolution, Resolver, SubjectSource};
use crate::{Error, Result};

/// The shared, lazily started execution of a path.
#[derive(Clone)]
pub struct LazyResult {
    shared: Arc<Shared>,
}

struct Shared {
    path: Path,
    key: CacheKey,
    cache: Weak<CacheInner>,
    state: tokio::sync::Mutex<State>,
    /// Documents the query can read, known once it started.
    reach: parking_lot::Mutex<Reach>,
}

#[derive(Debug, Default)]
enum Reach {
    #[default]
    Unknown,
    Documents(Vec<NamedNode>),
    /// A pattern's subject is only bound while the query runs.
    Everywhere,
}

impl Reach {
    /// The documents holding the subjects of `query`'s patterns.
    fn of(subject: &Term, query: &QuerySpec) -> Reach {
        let subjects = query.read_patterns().iter().map(|pattern| match &pattern.subject {
            Node::Term(term) => Some(term),
            _ => None,
        });
        let mut documents = Vec::new();
        for term in iter::once(Some(subject)).chain(subjects) {
            let Some(Term::NamedNode(node)) = term else {
                return Reach::Everywhere;
            };
            let document = document_of(node);
            if !documents.contains(&document) {
                documents.push(document);
            }
        }
        Reach::Documents(documents)
    }

    fn contains(&self, document: &NamedNode) -> bool {
        match self {
            Reach::Unknown => false,
            Reach::Documents(documents) => documents.contains(document),
            Reach::Everywhere => true,
        }
    }
}

#[derive(Default)]
struct State {
    terms: Vec<Term>,
    source: Source,
}

#[derive(Default)]
enum Source {
    #[default]
    Idle,
    Streaming(TermStream),
    Done,
    Failed(Error),
}

/// What starting an execution produced.
enum Started {
    Nothing,
    Term(Term),
    Stream(TermStream),
}

impl LazyResult {
    pub(crate) fn new(path: Path, key: CacheKey, cache: Weak<CacheInner>) -> Self {
        Self {
            shared: Arc::new(Shared {
                path,
                key,
                cache,
                state: tokio::sync::Mutex::new(State::default()),
                reach: parking_lot::Mutex::new(Reach::Unknown),
            }),
        }
    }

    /// A result that belongs to no cache.
    pub fn detached(path: Path) -> Self {
        let key = CacheKey::of(&path);
        Self::new(path, key, Weak::new())
    }

    pub fn path(&self) -> &Path {
        &self.shared.path
    }

    pub fn key(&self) -> &CacheKey {
        &self.shared.key
    }

    /// Whether both handles share one execution.
    pub fn ptr_eq(&self, other: &LazyResult) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// Whether the execution may have read from `document`.
    ///
    /// Queries that join through resources found along the way may read
    /// any document. Results that have not started touch nothing.
    pub fn touches(&self, document: &NamedNode) -> bool {
        self.shared.reach.lock().contains(document)
    }

    /// The first term, or `None` when the path selects nothing.
    pub async fn first(&self) -> Result<Option<Term>> {
        self.term_at(0).await
    }

    /// Every term, in order. Ends after the first error.
    ///
    /// Terms are pulled from the engine only as the stream is polled; an
    /// unbounded query is fine as long as the consumer stops early.
    pub fn stream(&self) -> BoxStream<'static, Result<Term>> {
        stream::try_unfold((self.clone(), 0usize), |(result, index)| async move {
            let next = result.term_at(index).await?;
            Ok::<_, Error>(next.map(|term| (term, (result, index + 1))))
        })
        .boxed()
    }

    pub async fn to_vec(&self) -> Result<Vec<Term>> {
        self.stream().try_collect().await
    }

    /// The term at `index`, pulling from the engine until it is recorded
    /// or the execution ends.
    ///
    /// The state lock is held across the pull so one execution serves all
    /// waiters. Dropping this future leaves the state consistent: an
    /// interrupted start is simply retried by the next caller.
    async fn term_at(&self, index: usize) -> Result<Option<Term>> {
        let mut guard = self.shared.state.lock().await;
        let state = &mut *guard;
        loop {
            if let Some(term) = state.terms.get(index) {
                return Ok(Some(term.clone()));
            }
            match &mut state.source {
                Source::Done => return Ok(None),
                Source::Failed(error) => return Err(error.clone()),
                Source::Idle => match self.start().await {
                    Ok(Started::Nothing) => state.source = Source::Done,
                    Ok(Started::Term(term)) => {
                        state.terms.push(term);
                        state.source = Source::Done;
                    }
                    Ok(Started::Stream(stream)) => state.source = Source::Streaming(stream),
                    Err(error) => self.fail(state, error),
                },
                Source::Streaming(stream) => match stream.next().await {
                    Some(Ok(term)) => state.terms.push(term),
                    Some(Err(error)) => self.fail(state, error),
                    None => {
                        trace!(path = %self.shared.path, count = state.terms.len(), "query finished");
                        state.source = Source::Done;
                    }
                },
            }
        }
    }

    /// Resolve the path and, if it denotes a query, hand it to the engine.
    async fn start(&self) -> Result<Started> {
        let path = &self.shared.path;
        let settings = path.settings();
        let resolution = Resolver::new(settings).resolve(path)?;

        let plan = match resolution {
            Resolution::Nothing => return Ok(Started::Nothing),
            Resolution::Subject(source) => {
                return source.acquire(settings.session()).await.map(Started::Term);
            }
            Resolution::Query(plan) => plan,
        };

        let subject = plan.subject.acquire(settings.session()).await?;
        let mut query = plan.query.bind_subject(&subject);
        if query.mentions_user() {
            let user = SubjectSource::User.acquire(settings.session()).await?;
            query = query.bind_user(&user);
        }
        *self.shared.reach.lock() = Reach::of(&subject, &query);
        let sparql = query.to_string();
        debug!(%path, query = %sparql, "executing query");

        let stream = settings
            .engine()
            .execute(&subject, &query)
            .await
            .map_err(|cause| Error::query_execution(sparql.as_str(), cause))?;
        Ok(Started::Stream(
            stream
                .map_err(move |cause| Error::query_execution(sparql.as_str(), cause))
                .boxed(),
        ))
    }

    fn fail(&self, state: &mut State, error: Error) {
        debug!(path = %self.shared.path, %error, "query failed");
        state.source = Source::Failed(error);
        if let Some(cache) = self.shared.cache.upgrade() {
            cache.evict(&self.shared.key, self);
        }
    }
}

/// Awaiting a result yields its first term.
impl IntoFuture for LazyResult {
    type Output = Result<Option<Term>>;
    type IntoFuture = BoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move { self.first().await })
    }
}

impl fmt::Debug for LazyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyResult")
            .field("path", &self.shared.path.to_string())
            .field("key", &self.shared.key)
            .finish()
    }
}
