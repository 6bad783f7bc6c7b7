//! # Session Provider
//!
//! The contract for finding out who is logged in. Only the absence of a
//! session matters to path resolution: `user` paths fail without one.
//!
//! | Provider | Description |
//! |----------|-------------|
//! | `MemorySession` | Session set by hand, for tests and embedding |

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::model::NamedNode;
use crate::Result;

/// An authenticated actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub web_id: NamedNode,
}

/// Yields the current session, if any.
///
/// An `Err` means the provider itself failed; "nobody logged in" is `Ok(None)`.
#[async_trait]
pub trait SessionProvider: Send + Sync + 'static {
    async fn session(&self) -> Result<Option<Session>>;
}

/// A session held in memory and changed explicitly.
#[derive(Debug, Default)]
pub struct MemorySession {
    current: RwLock<Option<Session>>,
}

impl MemorySession {
    /// Nobody logged in.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn logged_in(web_id: NamedNode) -> Self {
        Self { current: RwLock::new(Some(Session { web_id })) }
    }

    pub fn login(&self, web_id: NamedNode) {
        *self.current.write() = Some(Session { web_id });
    }

    pub fn logout(&self) {
        *self.current.write() = None;
    }
}

#[async_trait]
impl SessionProvider for MemorySession {
    async fn session(&self) -> Result<Option<Session>> {
        Ok(self.current.read().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_login_logout() {
        let me = NamedNode::new_unchecked("https://ex.org/#me");
        let session = MemorySession::anonymous();
        assert_eq!(session.session().await.unwrap(), None);

        session.login(me.clone());
        assert_eq!(session.session().await.unwrap(), Some(Session { web_id: me.clone() }));

        session.logout();
        assert_eq!(session.session().await.unwrap(), None);

        let session = MemorySession::logged_in(me.clone());
        assert_eq!(session.session().await.unwrap().map(|s| s.web_id), Some(me));
    }
}
