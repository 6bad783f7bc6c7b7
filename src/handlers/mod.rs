//! # Path Handlers
//!
//! A handler decides what one named segment means. Built-in handlers are
//! variants of [`Handler`]; callers plug in their own through
//! [`Handler::Custom`].
//!
//! | Handler | Output |
//! |---------|--------|
//! | `SubjectPathHandler` | anchor at an IRI |
//! | `UserPathHandler` | anchor at the authenticated actor |
//! | `PredicatePathHandler` | one triple pattern, focus moves to its object |
//! | `FindActivityHandler` | activity patterns, focus moves to the activity object |
//! | `CreateActivityHandler` | an insert template |

pub mod registry;
mod subject;
mod predicate;
mod activity;

use std::cell::Cell;
use std::fmt;
use std::sync::Arc;

use crate::config::Settings;
use crate::model::{Anchor, Path, PathSegment, Variable};
use crate::query::{Node, TriplePattern};
use crate::{Error, Result};

pub use registry::{HandlerRegistry, HandlerRegistryBuilder};
pub use subject::{SubjectPathHandler, UserPathHandler};
pub use predicate::PredicatePathHandler;
pub use activity::{ActivityType, CreateActivityHandler, FindActivityHandler};

// ============================================================================
// Handler contract
// ============================================================================

/// What a handler turns its segment into.
#[derive(Debug, Clone, PartialEq)]
pub enum Handled {
    /// Start the remaining segments from a new subject.
    Anchor(Anchor),
    /// Narrow: add read patterns and move the focus.
    Traverse {
        patterns: Vec<TriplePattern>,
        focus: Node,
    },
    /// Write: a template to insert for every focus the path selects.
    Insert { template: Vec<TriplePattern> },
}

/// The single capability every handler provides.
pub trait PathHandler: Send + Sync {
    fn handle(&self, cx: &HandlerContext<'_>) -> Result<Handled>;
}

/// Everything a handler may consult while handling one segment.
pub struct HandlerContext<'a> {
    path: &'a Path,
    segment: &'a PathSegment,
    focus: &'a Node,
    terminal: bool,
    settings: &'a Settings,
    variables: &'a Variables,
}

impl<'a> HandlerContext<'a> {
    pub(crate) fn new(
        path: &'a Path,
        segment: &'a PathSegment,
        focus: &'a Node,
        terminal: bool,
        variables: &'a Variables,
    ) -> Self {
        Self {
            path,
            segment,
            focus,
            terminal,
            settings: path.settings(),
            variables,
        }
    }

    /// The whole path being resolved.
    pub fn path(&self) -> &Path {
        self.path
    }

    pub fn segment(&self) -> &PathSegment {
        self.segment
    }

    /// What the preceding segments selected: the root subject, or the
    /// variable bound by the previous handler.
    pub fn focus(&self) -> &Node {
        self.focus
    }

    /// Whether this segment decides the shape of the query.
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    pub fn settings(&self) -> &Settings {
        self.settings
    }

    /// A variable no other pattern of this query uses (`?v0`, `?v1`, ...).
    pub fn fresh_variable(&self) -> Variable {
        self.variables.fresh()
    }

    /// The variable this segment should bind: named after the segment
    /// when it is terminal, fresh otherwise.
    pub fn result_variable(&self) -> Variable {
        if self.terminal {
            Variable::new_unchecked(variable_name(&self.segment.name))
        } else {
            self.fresh_variable()
        }
    }

    /// A resolution failure pointing at this path.
    pub fn error(&self, message: impl Into<String>) -> Error {
        Error::resolution(self.path, message)
    }
}

/// Allocates `?v0`, `?v1`, ... for one resolution.
#[derive(Debug, Default)]
pub(crate) struct Variables {
    next: Cell<usize>,
}

impl Variables {
    fn fresh(&self) -> Variable {
        let n = self.next.get();
        self.next.set(n + 1);
        Variable::new_unchecked(format!("v{n}"))
    }
}

/// A SPARQL-safe variable name derived from a segment name.
fn variable_name(name: &str) -> String {
    let local = name.rsplit(['/', '#', ':']).next().unwrap_or(name);
    let cleaned: String = local
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();

    let generated = cleaned.len() > 1
        && cleaned.starts_with('v')
        && cleaned[1..].chars().all(|c| c.is_ascii_digit());
    match cleaned.chars().next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            if generated { format!("{cleaned}_") } else { cleaned }
        }
        _ => "result".to_owned(),
    }
}

// ============================================================================
// Handler variants
// ============================================================================

/// The handler set a registry maps names to.
#[derive(Clone)]
pub enum Handler {
    Subject(SubjectPathHandler),
    User(UserPathHandler),
    Predicate(PredicatePathHandler),
    FindActivity(FindActivityHandler),
    CreateActivity(CreateActivityHandler),
    Custom(Arc<dyn PathHandler>),
}

impl Handler {
    pub fn custom(handler: impl PathHandler + 'static) -> Self {
        Handler::Custom(Arc::new(handler))
    }

    pub fn handle(&self, cx: &HandlerContext<'_>) -> Result<Handled> {
        match self {
            Handler::Subject(h) => h.handle(cx),
            Handler::User(h) => h.handle(cx),
            Handler::Predicate(h) => h.handle(cx),
            Handler::FindActivity(h) => h.handle(cx),
            Handler::CreateActivity(h) => h.handle(cx),
            Handler::Custom(h) => h.handle(cx),
        }
    }

    pub fn is_activity(&self) -> bool {
        matches!(self, Handler::FindActivity(_) | Handler::CreateActivity(_))
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Subject(h) => write!(f, "{h:?}"),
            Handler::User(h) => write!(f, "{h:?}"),
            Handler::Predicate(h) => write!(f, "{h:?}"),
            Handler::FindActivity(h) => write!(f, "{h:?}"),
            Handler::CreateActivity(h) => write!(f, "{h:?}"),
            Handler::Custom(_) => write!(f, "Custom"),
        }
    }
}
