//! Triple patterns over subjects, terms and variables.

use std::fmt;

use crate::model::{NamedNode, Term, Variable};

/// A position in a triple pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    /// The root subject of the path, bound once it is known.
    Subject,
    /// Whoever is logged in when the query runs.
    User,
    Term(Term),
    Variable(Variable),
}

impl Node {
    /// Replace the subject placeholder.
    pub fn bind_subject(&self, subject: &Term) -> Node {
        self.bind(&Node::Subject, subject)
    }

    /// Replace the user placeholder.
    pub fn bind_user(&self, user: &Term) -> Node {
        self.bind(&Node::User, user)
    }

    fn bind(&self, placeholder: &Node, value: &Term) -> Node {
        if self == placeholder {
            Node::Term(value.clone())
        } else {
            self.clone()
        }
    }
}

impl From<Term> for Node { fn from(v: Term) -> Self { Node::Term(v) } }
impl From<NamedNode> for Node { fn from(v: NamedNode) -> Self { Node::Term(v.into()) } }
impl From<Variable> for Node { fn from(v: Variable) -> Self { Node::Variable(v) } }

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Subject => write!(f, "?subject"),
            Node::User => write!(f, "?user"),
            Node::Term(term) => write!(f, "{term}"),
            Node::Variable(variable) => write!(f, "{variable}"),
        }
    }
}

/// subject predicate object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TriplePattern {
    pub subject: Node,
    pub predicate: Node,
    pub object: Node,
}

impl TriplePattern {
    pub fn new(subject: impl Into<Node>, predicate: impl Into<Node>, object: impl Into<Node>) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    pub fn bind_subject(&self, subject: &Term) -> TriplePattern {
        self.map(|node| node.bind_subject(subject))
    }

    pub fn bind_user(&self, user: &Term) -> TriplePattern {
        self.map(|node| node.bind_user(user))
    }

    fn map(&self, f: impl Fn(&Node) -> Node) -> TriplePattern {
        TriplePattern {
            subject: f(&self.subject),
            predicate: f(&self.predicate),
            object: f(&self.object),
        }
    }

    pub fn nodes(&self) -> [&Node; 3] {
        [&self.subject, &self.predicate, &self.object]
    }
}

impl fmt::Display for TriplePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}.", self.subject, self.predicate, self.object)
    }
}
