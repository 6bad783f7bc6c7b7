//! # Query Descriptions
//!
//! Structured queries built by handlers and handed to a `QueryEngine`.
//! Pure data with no engine dependency. Rendering to
//! SPARQL text lives in `sparql`.

pub mod pattern;
pub mod sparql;

pub use pattern::{Node, TriplePattern};
pub use sparql::QuerySpec;
