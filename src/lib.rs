//! # ldpath: Lazy Linked-Data Path Navigation
//!
//! Navigate a graph of RDF triples by chaining property accesses
//! (`person.friends.firstName`) and let each chain become a query only
//! when its value is actually needed.
//!
//! ## Design Principles
//!
//! 1. **Paths are values**: navigation builds immutable `Path`s, never performs I/O
//! 2. **Dispatch table**: a `HandlerRegistry` decides what each segment means
//! 3. **Trait-first collaborators**: `QueryEngine` and `SessionProvider` are the
//!    only contracts with the outside world
//! 4. **One execution per path**: the `QueryCache` deduplicates structurally-equal paths
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ldpath::{PathFactory, Settings};
//!
//! # async fn example() -> ldpath::Result<()> {
//! let data = PathFactory::new(Settings::default());
//!
//! // Nothing is executed until the path is awaited or streamed.
//! let first_name = data.entry().get("https://ex.org/#this").get("firstName");
//! if let Some(term) = first_name.await? {
//!     println!("{term}");
//! }
//!
//! // Every friend's name, as a lazy stream.
//! use futures::TryStreamExt;
//! let names: Vec<_> = data
//!     .user()
//!     .resolve(Some("friends.firstName"))
//!     .stream()
//!     .try_collect()
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Built-in Handlers
//!
//! | Segment | Handler | Meaning |
//! |---------|---------|---------|
//! | `user` (entry) | `UserPathHandler` | Anchor at the logged-in actor |
//! | any IRI (entry) | `SubjectPathHandler` | Anchor at that IRI |
//! | `likes`, `dislikes`, `follows` | `FindActivityHandler` | Objects of the subject's activities |
//! | `like()`, `dislike()`, `follow()` | `CreateActivityHandler` | Insert a new activity |
//! | anything else | `PredicatePathHandler` | Follow the predicate named in the `Context` |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod query;
pub mod config;
pub mod handlers;
pub mod resolver;
pub mod engine;
pub mod session;
pub mod cache;
pub mod result;
pub mod proxy;
pub mod vocab;

use std::sync::Arc;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    Anchor, Path, PathSegment, Value,
    BlankNode, Literal, NamedNode, Term, Variable,
};

// ============================================================================
// Re-exports: Query descriptions
// ============================================================================

pub use query::{Node, QuerySpec, TriplePattern};

// ============================================================================
// Re-exports: Configuration and dispatch
// ============================================================================

pub use config::{Context, Settings, SettingsBuilder};
pub use handlers::{
    ActivityType, CreateActivityHandler, FindActivityHandler, Handled, Handler,
    HandlerContext, HandlerRegistry, PathHandler, PredicatePathHandler,
    SubjectPathHandler, UserPathHandler,
};
pub use resolver::{QueryPlan, Resolution, Resolver, SubjectSource};

// ============================================================================
// Re-exports: Collaborators
// ============================================================================

pub use engine::{MemoryEngine, QueryEngine, TermStream};
pub use session::{MemorySession, Session, SessionProvider};

// ============================================================================
// Re-exports: Execution surface
// ============================================================================

pub use cache::{CacheKey, QueryCache};
pub use result::LazyResult;
pub use proxy::{PathFactory, PathHandle};

// ============================================================================
// Error Types
// ============================================================================

/// Every failure surfaces as one of these, through the awaited or iterated
/// result of the path that caused it.
///
/// `Clone` so that all holders of a shared [`LazyResult`] observe the same failure.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// A user-anchored path was accessed while no session is active.
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// A segment cannot be mapped by any handler.
    #[error("Cannot resolve path `{path}`: {message}")]
    PathResolutionError { path: String, message: String },

    /// The query engine rejected a query, either up front or mid-stream.
    #[error("Query execution failed for `{query}`: {cause}")]
    QueryExecutionError {
        query: String,
        #[source]
        cause: Arc<Error>,
    },

    /// Raised by engines themselves.
    #[error("Execution error: {0}")]
    ExecutionError(String),

    #[error("Session error: {0}")]
    SessionError(String),

    #[error("Invalid IRI: {0}")]
    InvalidIri(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl Error {
    /// Wrap an engine failure together with the query that caused it.
    pub fn query_execution(query: impl Into<String>, cause: Error) -> Self {
        Error::QueryExecutionError {
            query: query.into(),
            cause: Arc::new(cause),
        }
    }

    pub(crate) fn resolution(path: &Path, message: impl Into<String>) -> Self {
        Error::PathResolutionError {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
