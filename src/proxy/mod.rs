//! # Navigation Handles
//!
//! The surface callers navigate with. A [`PathHandle`] pairs an immutable
//! [`Path`] with the [`QueryCache`] of the factory that created it:
//! building handles is free, awaiting or streaming one goes through the
//! cache.
//!
//! ```rust,no_run
//! # async fn example(data: ldpath::PathFactory) -> ldpath::Result<()> {
//! let me = data.user();
//! let liked = me.get("likes").to_vec().await?;
//! me.call("like", vec!["https://ex.org/post/1".into()]).await?;
//! data.clear_cache(None);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::future::IntoFuture;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::stream::BoxStream;
use tracing::debug;

use crate::cache::QueryCache;
use crate::config::Settings;
use crate::model::path::CLEAR_CACHE;
use crate::model::term::document_of;
use crate::model::{Anchor, NamedNode, Path, Term, Value};
use crate::result::LazyResult;
use crate::Result;

// ============================================================================
// PathFactory
// ============================================================================

/// Creates root handles that share one settings object and one cache.
#[derive(Clone)]
pub struct PathFactory {
    settings: Arc<Settings>,
    cache: QueryCache,
}

impl PathFactory {
    pub fn new(settings: Settings) -> Self {
        Self::shared(Arc::new(settings))
    }

    pub fn shared(settings: Arc<Settings>) -> Self {
        Self {
            settings,
            cache: QueryCache::new(),
        }
    }

    /// The navigable entry point: `user` or an IRI comes next.
    pub fn entry(&self) -> PathHandle {
        self.create_root(Anchor::Entry)
    }

    pub fn create_root(&self, anchor: Anchor) -> PathHandle {
        PathHandle {
            path: Path::new(anchor, Arc::clone(&self.settings)),
            cache: self.cache.clone(),
        }
    }

    /// A root handle anchored at `subject`.
    pub fn subject(&self, subject: impl Into<Term>) -> PathHandle {
        self.create_root(Anchor::Term(subject.into()))
    }

    /// A root handle anchored at whoever is logged in when it executes.
    pub fn user(&self) -> PathHandle {
        self.create_root(Anchor::User)
    }

    pub fn clear_cache(&self, document: Option<&NamedNode>) {
        invalidate(&self.settings, &self.cache, document);
    }

    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }
}

impl Default for PathFactory {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl fmt::Debug for PathFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathFactory")
            .field("settings", &self.settings)
            .field("cache", &self.cache)
            .finish()
    }
}

/// Engine first, then the local map: a lookup racing with the clear can
/// only find a fresh entry that will query the already-cleared engine.
///
/// A resource IRI stands for the document that holds it.
fn invalidate(settings: &Settings, cache: &QueryCache, document: Option<&NamedNode>) {
    let document = document.map(document_of);
    debug!(document = document.as_ref().map(NamedNode::as_str), "clearing caches");
    settings.engine().clear_cache(document.as_ref());
    cache.clear(document.as_ref());
}

/// The document argument of a `clearCache` call: `Some(None)` for none
/// at all, `None` when the argument is not an IRI.
fn clear_cache_target(args: &[Value]) -> Option<Option<NamedNode>> {
    match args {
        [] | [Value::Null] => Some(None),
        [document] => document.as_named_node().map(Some),
        _ => None,
    }
}

// ============================================================================
// PathHandle
// ============================================================================

/// One step of a navigation. Cheap to clone; every method returns a new
/// handle and leaves the receiver untouched.
#[derive(Clone)]
pub struct PathHandle {
    path: Path,
    cache: QueryCache,
}

impl PathHandle {
    fn with_path(&self, path: Path) -> PathHandle {
        PathHandle {
            path,
            cache: self.cache.clone(),
        }
    }

    /// Property access: `person.get("firstName")`.
    pub fn get(&self, name: impl Into<String>) -> PathHandle {
        self.with_path(self.path.get(name))
    }

    /// Function call: `me.call("like", vec![post.into()])`.
    ///
    /// `clearCache` is performed immediately, with an optional document
    /// IRI as its argument, and yields the root handle. Any other
    /// argument clears nothing; the returned handle fails to resolve.
    pub fn call(&self, name: impl Into<String>, args: Vec<Value>) -> PathHandle {
        let name = name.into();
        if name == CLEAR_CACHE {
            if let Some(document) = clear_cache_target(&args) {
                self.clear_cache(document.as_ref());
                return self.root();
            }
            debug!(path = %self.path, "rejected clearCache argument");
        }
        self.with_path(self.path.call(name, args))
    }

    pub fn root(&self) -> PathHandle {
        self.with_path(self.path.root())
    }

    /// `None` returns an equal handle; `Some("friends.firstName")` walks
    /// a dotted expression.
    pub fn resolve(&self, expression: Option<&str>) -> PathHandle {
        self.with_path(self.path.resolve(expression))
    }

    pub fn clear_cache(&self, document: Option<&NamedNode>) {
        invalidate(self.path.settings(), &self.cache, document);
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The cached execution of this path. Does not start it.
    pub fn result(&self) -> LazyResult {
        self.cache.get_or_create(&self.path)
    }

    pub fn stream(&self) -> BoxStream<'static, Result<Term>> {
        self.result().stream()
    }

    pub async fn first(&self) -> Result<Option<Term>> {
        self.result().first().await
    }

    pub async fn to_vec(&self) -> Result<Vec<Term>> {
        self.result().to_vec().await
    }
}

impl PartialEq for PathHandle {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl fmt::Debug for PathHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PathHandle").field(&self.path.to_string()).finish()
    }
}

impl fmt::Display for PathHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.path, f)
    }
}

/// Awaiting a handle yields the first term of its path.
impl IntoFuture for PathHandle {
    type Output = Result<Option<Term>>;
    type IntoFuture = BoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        self.result().into_future()
    }
}

impl IntoFuture for &PathHandle {
    type Output = Result<Option<Term>>;
    type IntoFuture = BoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        self.result().into_future()
    }
}
