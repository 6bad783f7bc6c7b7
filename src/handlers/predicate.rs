//! The default: a segment name is a predicate to follow.

use super::{Handled, HandlerContext, PathHandler};
use crate::query::{Node, TriplePattern};
use crate::Result;

/// `focus <expanded(name)> ?name`; the focus moves to the object.
#[derive(Debug, Clone, Copy, Default)]
pub struct PredicatePathHandler;

impl PathHandler for PredicatePathHandler {
    fn handle(&self, cx: &HandlerContext<'_>) -> Result<Handled> {
        let name = &cx.segment().name;
        if cx.segment().is_call() {
            return Err(cx.error(format!("no handler registered for {name}()")));
        }
        let predicate = cx
            .settings()
            .context()
            .expand(name)
            .ok_or_else(|| cx.error(format!("'{name}' does not expand to a predicate IRI")))?;

        let object = Node::Variable(cx.result_variable());
        Ok(Handled::Traverse {
            patterns: vec![TriplePattern::new(cx.focus().clone(), predicate, object.clone())],
            focus: object,
        })
    }
}
