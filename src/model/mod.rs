//! # Navigation Model
//!
//! The values that navigation produces: terms, call arguments and paths.
//! These types cross every boundary: proxy ↔ resolver ↔ cache ↔ engine.
//!
//! Design rule: this module is pure data. No I/O, no async. A `Path`
//! carries its `Settings` but never consults the engine or session.

pub mod term;
pub mod value;
pub mod path;

pub use term::{BlankNode, Literal, NamedNode, Term, Variable};
pub use value::Value;
pub use path::{Anchor, Path, PathSegment};
