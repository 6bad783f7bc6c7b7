//! Path: an immutable root plus an ordered list of navigation steps.

use std::fmt;
use std::sync::Arc;

use super::{Term, Value};
use crate::config::Settings;

/// Jumps back to the zero-segment path.
pub const ROOT: &str = "root";
/// Returns the receiver, or appends the segments of an expression.
pub const RESOLVE: &str = "resolve";
/// Invalidates cached results; never a navigation step.
pub const CLEAR_CACHE: &str = "clearCache";

/// Names handled by the path itself rather than by the handler registry.
pub fn is_reserved(name: &str) -> bool {
    matches!(name, ROOT | RESOLVE | CLEAR_CACHE)
}

/// Where a path starts.
#[derive(Debug, Clone, PartialEq)]
pub enum Anchor {
    /// The navigable entry point. Has no subject of its own; its first
    /// segment decides the subject (`user`, or an IRI).
    Entry,
    /// A known subject.
    Term(Term),
    /// The authenticated actor, known only once the session is consulted.
    User,
}

/// One navigation step.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSegment {
    pub name: String,
    /// `None` for property access, `Some` for a function-call segment.
    pub args: Option<Vec<Value>>,
}

impl PathSegment {
    pub fn property(name: impl Into<String>) -> Self {
        Self { name: name.into(), args: None }
    }

    pub fn call(name: impl Into<String>, args: Vec<Value>) -> Self {
        Self { name: name.into(), args: Some(args) }
    }

    pub fn is_call(&self) -> bool {
        self.args.is_some()
    }

    pub fn args(&self) -> &[Value] {
        self.args.as_deref().unwrap_or_default()
    }
}

/// A path in the graph: anchor.segment.segment...
///
/// Paths are never mutated; every step returns a new `Path` sharing the
/// anchor and settings. Two paths with equal anchors and segments over
/// the same settings are interchangeable.
#[derive(Clone)]
pub struct Path {
    root: Anchor,
    segments: Vec<PathSegment>,
    settings: Arc<Settings>,
}

impl Path {
    /// A zero-segment path anchored at `root`.
    pub fn new(root: Anchor, settings: Arc<Settings>) -> Self {
        Self { root, segments: Vec::new(), settings }
    }

    pub fn anchor(&self) -> &Anchor {
        &self.root
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last_segment(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// The zero-segment path with the same anchor and settings.
    pub fn root(&self) -> Path {
        Path::new(self.root.clone(), Arc::clone(&self.settings))
    }

    /// Append one step. Pure: never fails, never performs I/O.
    ///
    /// `root` and `resolve` are interpreted here; every other name,
    /// `clearCache` included, becomes a segment.
    pub fn extend(&self, name: impl Into<String>, args: Option<Vec<Value>>) -> Path {
        let name = name.into();
        match name.as_str() {
            ROOT => self.root(),
            RESOLVE => match args.as_deref() {
                Some([Value::String(expression)]) => self.resolve(Some(expression.as_str())),
                _ => self.clone(),
            },
            _ => {
                let mut segments = self.segments.clone();
                segments.push(PathSegment { name, args });
                Path {
                    root: self.root.clone(),
                    segments,
                    settings: Arc::clone(&self.settings),
                }
            }
        }
    }

    /// Property-access shorthand for [`Path::extend`].
    pub fn get(&self, name: impl Into<String>) -> Path {
        self.extend(name, None)
    }

    /// Function-call shorthand for [`Path::extend`].
    pub fn call(&self, name: impl Into<String>, args: Vec<Value>) -> Path {
        self.extend(name, Some(args))
    }

    /// Without an expression, the receiver itself. With one, the receiver
    /// extended by each part of a dotted expression such as
    /// `friends.firstName` or `foaf:knows.<https://ex.org/vocab#nick>`.
    pub fn resolve(&self, expression: Option<&str>) -> Path {
        match expression {
            None => self.clone(),
            Some(expression) => split_expression(expression)
                .into_iter()
                .fold(self.clone(), |path, part| path.get(part)),
        }
    }
}

/// Split on dots outside `<...>`. Empty parts are dropped.
fn split_expression(expression: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_iri = false;

    for c in expression.chars() {
        match c {
            '<' if !in_iri => in_iri = true,
            '>' if in_iri => in_iri = false,
            '.' if !in_iri => {
                let part = current.trim();
                if !part.is_empty() {
                    parts.push(part.to_owned());
                }
                current.clear();
            }
            _ => current.push(c),
        }
    }
    let part = current.trim();
    if !part.is_empty() {
        parts.push(part.to_owned());
    }
    parts
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root
            && self.segments == other.segments
            && Arc::ptr_eq(&self.settings, &other.settings)
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Path")
            .field("root", &self.root)
            .field("segments", &self.segments)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Display: `user.likes`, `<https://ex.org/#this>.firstName`, `like(<...>)`
// ============================================================================

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anchor::Entry => Ok(()),
            Anchor::Term(term) => write!(f, "{term}"),
            Anchor::User => write!(f, "user"),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(args) = &self.args {
            write!(f, "(")?;
            for (i, arg) in args.iter().enumerate() {
                if i > 0 { write!(f, ", ")?; }
                write!(f, "{arg}")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.root == Anchor::Entry && self.segments.is_empty() {
            return write!(f, "(entry)");
        }
        write!(f, "{}", self.root)?;
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 || self.root != Anchor::Entry { write!(f, ".")?; }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NamedNode;

    fn entry() -> Path {
        Path::new(Anchor::Entry, Arc::new(Settings::default()))
    }

    #[test]
    fn test_extend_appends_without_touching_receiver() {
        let root = entry();
        let user = root.get("user");
        let likes = user.get("likes");

        assert!(root.is_root());
        assert_eq!(user.len(), 1);
        assert_eq!(likes.len(), 2);
        assert_eq!(likes.last_segment(), Some(&PathSegment::property("likes")));
    }

    #[test]
    fn test_root_restores_identity() {
        let root = entry();
        let path = root.get("user").get("root").get("root").get("user").get("root");
        assert_eq!(path, root);
    }

    #[test]
    fn test_resolve_without_expression_is_identity() {
        let root = entry();
        assert_eq!(root.resolve(None), root);
        assert_eq!(root.extend(RESOLVE, Some(vec![])), root);

        let friends = root.get("user").get("friends");
        assert_eq!(friends.resolve(None), friends);
    }

    #[test]
    fn test_resolve_expression_appends_each_part() {
        let root = entry();
        let resolved = root.get("user").resolve(Some("friends.firstName"));
        assert_eq!(resolved, root.get("user").get("friends").get("firstName"));

        let called = root.extend(RESOLVE, Some(vec![Value::from("user.name")]));
        assert_eq!(called, root.get("user").get("name"));
    }

    #[test]
    fn test_expression_protects_bracketed_iris() {
        assert_eq!(
            split_expression("<https://ex.org/#this>.foaf:knows. .<https://ex.org/v1.2#nick>"),
            vec!["https://ex.org/#this", "foaf:knows", "https://ex.org/v1.2#nick"]
        );
        assert!(split_expression("").is_empty());
    }

    #[test]
    fn test_clear_cache_is_an_ordinary_segment_for_paths() {
        let path = entry().get("user").get(CLEAR_CACHE);
        assert_eq!(path.len(), 2);
        assert!(is_reserved(CLEAR_CACHE));
        assert!(!is_reserved("likes"));
    }

    #[test]
    fn test_paths_over_different_settings_differ() {
        let a = entry().get("user");
        let b = Path::new(Anchor::Entry, Arc::new(Settings::default())).get("user");
        assert_ne!(a, b);
    }

    #[test]
    fn test_display() {
        let root = entry();
        assert_eq!(root.to_string(), "(entry)");
        assert_eq!(root.get("user").get("likes").to_string(), "user.likes");

        let this = NamedNode::new_unchecked("https://ex.org/#this");
        let anchored = Path::new(Anchor::Term(this.clone().into()), Arc::clone(root.settings()));
        assert_eq!(
            anchored.get("firstName").to_string(),
            "<https://ex.org/#this>.firstName"
        );
        assert_eq!(
            root.get("user").call("like", vec![this.into()]).to_string(),
            "user.like(<https://ex.org/#this>)"
        );
    }
}
