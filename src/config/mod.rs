//! # Settings
//!
//! Everything a `Path` carries besides its anchor and segments: the
//! handler registry, the vocabulary context and the two collaborators.
//! Built once, then shared read-only by every path derived from it.

pub mod context;

use std::fmt;
use std::sync::Arc;

use crate::engine::{MemoryEngine, QueryEngine};
use crate::handlers::HandlerRegistry;
use crate::session::{MemorySession, SessionProvider};

pub use context::Context;

/// Shared configuration of a family of paths.
pub struct Settings {
    handlers: HandlerRegistry,
    context: Context,
    engine: Arc<dyn QueryEngine>,
    session: Arc<dyn SessionProvider>,
}

impl Settings {
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::default()
    }

    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn engine(&self) -> &dyn QueryEngine {
        self.engine.as_ref()
    }

    pub fn session(&self) -> &dyn SessionProvider {
        self.session.as_ref()
    }
}

/// Empty in-memory engine, anonymous session, default context and the
/// Solid handler set.
impl Default for Settings {
    fn default() -> Self {
        Settings::builder().build()
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("handlers", &self.handlers)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`Settings`]. Unset parts fall back to the defaults.
#[derive(Default)]
pub struct SettingsBuilder {
    handlers: Option<HandlerRegistry>,
    context: Option<Context>,
    engine: Option<Arc<dyn QueryEngine>>,
    session: Option<Arc<dyn SessionProvider>>,
}

impl SettingsBuilder {
    pub fn handlers(mut self, handlers: HandlerRegistry) -> Self {
        self.handlers = Some(handlers);
        self
    }

    pub fn context(mut self, context: Context) -> Self {
        self.context = Some(context);
        self
    }

    pub fn engine(mut self, engine: Arc<dyn QueryEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn session(mut self, session: Arc<dyn SessionProvider>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn build(self) -> Settings {
        Settings {
            handlers: self.handlers.unwrap_or_else(HandlerRegistry::solid),
            context: self.context.unwrap_or_default(),
            engine: self.engine.unwrap_or_else(|| Arc::new(MemoryEngine::new())),
            session: self.session.unwrap_or_else(|| Arc::new(MemorySession::anonymous())),
        }
    }
}
