//! # Query Engine Trait
//!
//! This is THE contract between path resolution and whatever answers
//! queries. The engine owns query-language specifics; resolution only
//! hands it a subject and a structured [`QuerySpec`].
//!
//! ## Implementations
//!
//! | Engine | Module | Description |
//! |--------|--------|-------------|
//! | `MemoryEngine` | `memory` | In-memory triples for testing/embedding |

pub mod memory;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::model::{NamedNode, Term};
use crate::query::QuerySpec;
use crate::Result;

pub use memory::MemoryEngine;

/// The terms a query yields, finite or not. Dropping the stream is how a
/// consumer stops execution.
pub type TermStream = BoxStream<'static, Result<Term>>;

/// Executes structured queries.
#[async_trait]
pub trait QueryEngine: Send + Sync + 'static {
    /// Start executing `query` for `subject`.
    ///
    /// Reads stream the bindings of the selected variable. Writes yield
    /// nothing and complete once applied. Failures may arrive either as
    /// the returned `Err` or as an `Err` item mid-stream.
    async fn execute(&self, subject: &Term, query: &QuerySpec) -> Result<TermStream>;

    /// Forget whatever the engine cached, for one document or for all.
    ///
    /// Default: nothing is cached, nothing to do.
    fn clear_cache(&self, _document: Option<&NamedNode>) {}
}
