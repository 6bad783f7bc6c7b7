//! RDF terms.
//!
//! The term types come from `oxrdf`; this module adds the few helpers
//! navigation needs on top of them.

pub use oxrdf::{BlankNode, Literal, NamedNode, Term, Variable};

use crate::{Error, Result};

/// Parse an IRI into a named node.
pub fn named_node(iri: impl Into<String>) -> Result<NamedNode> {
    let iri = iri.into();
    NamedNode::new(iri.as_str()).map_err(|e| Error::InvalidIri(format!("<{iri}>: {e}")))
}

/// Whether a segment name is an absolute IRI rather than a vocabulary term.
///
/// Compact IRIs like `foaf:knows` are syntactically absolute too, so an
/// authority (`://`) or the `urn:` scheme is required.
pub fn is_absolute_iri(name: &str) -> bool {
    (name.contains("://") || name.starts_with("urn:")) && NamedNode::new(name).is_ok()
}

/// The document holding a resource: its IRI without the fragment.
pub fn document_of(node: &NamedNode) -> NamedNode {
    match node.as_str().split_once('#') {
        Some((document, _)) => NamedNode::new_unchecked(document),
        None => node.clone(),
    }
}
