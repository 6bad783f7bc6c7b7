//! Arguments passed to call segments (`like(<https://ex.org/post/1>)`).

use std::fmt;

use super::term::{is_absolute_iri, BlankNode, Literal, NamedNode, Term};

/// A call-segment argument.
///
/// Covers what callers pass to function-like segments:
/// - Scalars: Bool, Int, Float, String
/// - Graph: Term (IRI, blank node or literal)
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Term(Term),
}

// ============================================================================
// Terms
// ============================================================================

impl Value {
    /// The named node this value denotes, if any. Strings holding an
    /// absolute IRI count.
    pub fn as_named_node(&self) -> Option<NamedNode> {
        match self {
            Value::Term(Term::NamedNode(node)) => Some(node.clone()),
            Value::String(s) if is_absolute_iri(s) => Some(NamedNode::new_unchecked(s.as_str())),
            _ => None,
        }
    }

    /// Convert into an RDF term for use in a triple.
    ///
    /// Strings holding an absolute IRI become named nodes, other strings
    /// plain literals. `Null` has no term.
    pub fn to_term(&self) -> Option<Term> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(Literal::from(*b).into()),
            Value::Int(i) => Some(Literal::from(*i).into()),
            Value::Float(f) => Some(Literal::from(*f).into()),
            Value::String(s) => Some(match self.as_named_node() {
                Some(node) => node.into(),
                None => Literal::new_simple_literal(s.as_str()).into(),
            }),
            Value::Term(t) => Some(t.clone()),
        }
    }
}

// ============================================================================
// Conversions (From impls)
// ============================================================================

impl From<bool> for Value { fn from(v: bool) -> Self { Value::Bool(v) } }
impl From<i32> for Value { fn from(v: i32) -> Self { Value::Int(v as i64) } }
impl From<i64> for Value { fn from(v: i64) -> Self { Value::Int(v) } }
impl From<f64> for Value { fn from(v: f64) -> Self { Value::Float(v) } }
impl From<String> for Value { fn from(v: String) -> Self { Value::String(v) } }
impl From<&str> for Value { fn from(v: &str) -> Self { Value::String(v.to_owned()) } }
impl From<Term> for Value { fn from(v: Term) -> Self { Value::Term(v) } }
impl From<NamedNode> for Value { fn from(v: NamedNode) -> Self { Value::Term(v.into()) } }
impl From<BlankNode> for Value { fn from(v: BlankNode) -> Self { Value::Term(v.into()) } }
impl From<Literal> for Value { fn from(v: Literal) -> Self { Value::Term(v.into()) } }
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self { v.map(Into::into).unwrap_or(Value::Null) }
}

// ============================================================================
// Display
// ============================================================================

/// Canonical rendering; cache keys depend on it being injective per type.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v:?}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Term(t) => write!(f, "{t}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_from() {
        assert_eq!(Value::from("hello"), Value::String("hello".into()));
        assert_eq!(Value::from(42), Value::Int(42));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(None::<i64>), Value::Null);
    }

    #[test]
    fn test_iri_strings_become_named_nodes() {
        let term = Value::from("https://ex.org/post/1").to_term();
        assert_eq!(term, Some(NamedNode::new_unchecked("https://ex.org/post/1").into()));

        let term = Value::from("hello").to_term();
        assert_eq!(term, Some(Literal::new_simple_literal("hello").into()));

        assert_eq!(Value::Null.to_term(), None);
    }

    #[test]
    fn test_display_distinguishes_types() {
        assert_ne!(Value::from("1").to_string(), Value::from(1).to_string());
        assert_ne!(Value::from(1.0).to_string(), Value::from(1).to_string());
        assert_eq!(
            Value::from(NamedNode::new_unchecked("https://ex.org/a")).to_string(),
            "<https://ex.org/a>"
        );
    }
}
