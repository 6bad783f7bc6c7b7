//! Handlers that anchor a path at a subject.

use super::{Handled, HandlerContext, PathHandler};
use crate::model::term::is_absolute_iri;
use crate::model::{Anchor, NamedNode};
use crate::session::SessionProvider;
use crate::{Error, Result};

/// Anchors the rest of the path at the IRI named by the segment
/// (`entry.get("https://ex.org/#this")`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SubjectPathHandler;

impl PathHandler for SubjectPathHandler {
    fn handle(&self, cx: &HandlerContext<'_>) -> Result<Handled> {
        let name = &cx.segment().name;
        if cx.segment().is_call() {
            return Err(cx.error(format!("{name}() cannot start a path")));
        }
        if !is_absolute_iri(name) {
            return Err(cx.error(format!("'{name}' is neither a registered name nor an absolute IRI")));
        }
        Ok(Handled::Anchor(Anchor::Term(NamedNode::new_unchecked(name.as_str()).into())))
    }
}

/// Anchors the rest of the path at the authenticated actor.
///
/// The actor is not known while resolving; the anchor is settled by
/// [`UserPathHandler::web_id`] when the path is executed.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserPathHandler;

impl PathHandler for UserPathHandler {
    fn handle(&self, cx: &HandlerContext<'_>) -> Result<Handled> {
        if cx.segment().is_call() {
            return Err(cx.error(format!("{}() cannot start a path", cx.segment().name)));
        }
        Ok(Handled::Anchor(Anchor::User))
    }
}

impl UserPathHandler {
    /// The WebID of the logged-in actor.
    pub async fn web_id(session: &dyn SessionProvider) -> Result<NamedNode> {
        match session.session().await? {
            Some(session) => Ok(session.web_id),
            None => Err(Error::AuthenticationError(
                "Cannot resolve user path: no user logged in".into(),
            )),
        }
    }
}
