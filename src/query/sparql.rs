//! `QuerySpec` and its SPARQL rendering.
//!
//! ```text
//! SELECT ?firstName WHERE {
//!   <https://ex.org/#this> <http://xmlns.com/foaf/0.1/givenName> ?firstName.
//! }
//! ```

use std::fmt;

use super::{Node, TriplePattern};
use crate::model::{Term, Variable};

/// What a resolved path asks the engine to do.
#[derive(Debug, Clone, PartialEq)]
pub enum QuerySpec {
    /// Read: every binding of `variable` matching all `patterns`.
    Select {
        variable: Variable,
        patterns: Vec<TriplePattern>,
    },
    /// Write: instantiate `template` once per solution of `conditions`
    /// (exactly once when there are no conditions).
    Insert {
        template: Vec<TriplePattern>,
        conditions: Vec<TriplePattern>,
    },
}

impl QuerySpec {
    pub fn is_write(&self) -> bool {
        matches!(self, QuerySpec::Insert { .. })
    }

    /// The selected variable of a read.
    pub fn variable(&self) -> Option<&Variable> {
        match self {
            QuerySpec::Select { variable, .. } => Some(variable),
            QuerySpec::Insert { .. } => None,
        }
    }

    /// The patterns the query reads: the selection of a read, the
    /// conditions of a write.
    pub fn read_patterns(&self) -> &[TriplePattern] {
        match self {
            QuerySpec::Select { patterns, .. } => patterns,
            QuerySpec::Insert { conditions, .. } => conditions,
        }
    }

    /// Whether the query needs the logged-in user bound before it runs.
    pub fn mentions_user(&self) -> bool {
        let template: &[TriplePattern] = match self {
            QuerySpec::Select { .. } => &[],
            QuerySpec::Insert { template, .. } => template,
        };
        template
            .iter()
            .chain(self.read_patterns())
            .any(|pattern| pattern.nodes().iter().any(|node| **node == Node::User))
    }

    /// Replace the subject placeholder everywhere.
    pub fn bind_subject(&self, subject: &Term) -> QuerySpec {
        self.map(|pattern| pattern.bind_subject(subject))
    }

    /// Replace the user placeholder everywhere.
    pub fn bind_user(&self, user: &Term) -> QuerySpec {
        self.map(|pattern| pattern.bind_user(user))
    }

    fn map(&self, f: impl Fn(&TriplePattern) -> TriplePattern) -> QuerySpec {
        let map = |patterns: &[TriplePattern]| -> Vec<TriplePattern> { patterns.iter().map(&f).collect() };
        match self {
            QuerySpec::Select { variable, patterns } => QuerySpec::Select {
                variable: variable.clone(),
                patterns: map(patterns),
            },
            QuerySpec::Insert { template, conditions } => QuerySpec::Insert {
                template: map(template),
                conditions: map(conditions),
            },
        }
    }
}

fn write_group(f: &mut fmt::Formatter<'_>, patterns: &[TriplePattern]) -> fmt::Result {
    writeln!(f, "{{")?;
    for pattern in patterns {
        writeln!(f, "  {pattern}")?;
    }
    write!(f, "}}")
}

impl fmt::Display for QuerySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuerySpec::Select { variable, patterns } => {
                write!(f, "SELECT {variable} WHERE ")?;
                write_group(f, patterns)
            }
            QuerySpec::Insert { template, conditions } if conditions.is_empty() => {
                write!(f, "INSERT DATA ")?;
                write_group(f, template)
            }
            QuerySpec::Insert { template, conditions } => {
                write!(f, "INSERT ")?;
                write_group(f, template)?;
                write!(f, " WHERE ")?;
                write_group(f, conditions)
            }
        }
    }
}
