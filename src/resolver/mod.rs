//! Path resolver: turns a path into a subject or a query.
//!
//! Resolution is synchronous and side-effect free. The only asynchronous
//! part, finding out who the user is, is deferred to
//! [`SubjectSource::acquire`] at execution time.

use tracing::trace;

use crate::config::Settings;
use crate::handlers::{Handled, HandlerContext, UserPathHandler, Variables};
use crate::model::path::CLEAR_CACHE;
use crate::model::{Anchor, Path, Term};
use crate::query::{Node, QuerySpec};
use crate::session::SessionProvider;
use crate::{Error, Result};

/// The subject a query runs against.
#[derive(Debug, Clone, PartialEq)]
pub enum SubjectSource {
    Term(Term),
    /// The authenticated actor; requires an active session.
    User,
}

impl SubjectSource {
    pub async fn acquire(&self, session: &dyn SessionProvider) -> Result<Term> {
        match self {
            SubjectSource::Term(term) => Ok(term.clone()),
            SubjectSource::User => UserPathHandler::web_id(session).await.map(Term::from),
        }
    }
}

/// A query together with the subject it is about.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub subject: SubjectSource,
    /// Still contains `Node::Subject`; bind it once the subject is acquired.
    pub query: QuerySpec,
}

/// What a path resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The bare entry point: no subject, no value.
    Nothing,
    /// A path without navigation steps denotes its subject. No query.
    Subject(SubjectSource),
    Query(QueryPlan),
}

/// Dispatches each segment of a path to its handler.
pub struct Resolver<'a> {
    settings: &'a Settings,
}

impl<'a> Resolver<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Resolve `path` left to right.
    ///
    /// After the anchor, every segment but the last narrows the focus
    /// through predicate traversal; the last one decides whether the
    /// query reads or writes.
    pub fn resolve(&self, path: &Path) -> Result<Resolution> {
        let registry = self.settings.handlers();
        let variables = Variables::default();
        let mut segments = path.segments();

        let subject = match path.anchor() {
            Anchor::Term(term) => SubjectSource::Term(term.clone()),
            Anchor::User => SubjectSource::User,
            Anchor::Entry => {
                let Some((first, rest)) = segments.split_first() else {
                    return Ok(Resolution::Nothing);
                };
                segments = rest;

                let handler = registry.entry_handler(&first.name);
                trace!(segment = %first, ?handler, "dispatching entry segment");
                let focus = Node::Subject;
                let cx = HandlerContext::new(path, first, &focus, rest.is_empty(), &variables);
                match handler.handle(&cx)? {
                    Handled::Anchor(Anchor::Term(term)) => SubjectSource::Term(term),
                    Handled::Anchor(Anchor::User) => SubjectSource::User,
                    _ => return Err(cx.error(format!("'{}' does not name a subject", first.name))),
                }
            }
        };

        let Some(last) = segments.len().checked_sub(1) else {
            return Ok(Resolution::Subject(subject));
        };

        let mut focus = Node::Subject;
        let mut patterns = Vec::new();
        for (index, segment) in segments.iter().enumerate() {
            if segment.name == CLEAR_CACHE {
                let message = if segment.is_call() {
                    format!("{segment} does not name a document")
                } else {
                    "clearCache is an operation, not a property".to_owned()
                };
                return Err(Error::resolution(path, message));
            }
            let terminal = index == last;
            let handler = registry.subject_handler(&segment.name);
            trace!(%segment, ?handler, terminal, "dispatching segment");

            let handled = {
                let cx = HandlerContext::new(path, segment, &focus, terminal, &variables);
                handler.handle(&cx)?
            };
            match handled {
                Handled::Traverse { patterns: found, focus: next } => {
                    patterns.extend(found);
                    focus = next;
                }
                Handled::Insert { template } if terminal => {
                    let plan = QueryPlan {
                        subject,
                        query: QuerySpec::Insert { template, conditions: patterns },
                    };
                    return Ok(Resolution::Query(plan));
                }
                Handled::Insert { .. } => {
                    return Err(Error::resolution(path, format!("cannot navigate past {segment}")));
                }
                Handled::Anchor(_) => {
                    return Err(Error::resolution(path, format!("'{}' can only start a path", segment.name)));
                }
            }
        }

        match focus {
            Node::Variable(variable) => Ok(Resolution::Query(QueryPlan {
                subject,
                query: QuerySpec::Select { variable, patterns },
            })),
            _ => Err(Error::resolution(path, "the last segment does not select anything")),
        }
    }
}
