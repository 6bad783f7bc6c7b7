//! Name → handler lookup, built once and read-only afterwards.

use std::collections::HashMap;

use super::{
    ActivityType, CreateActivityHandler, FindActivityHandler, Handler,
    PredicatePathHandler, SubjectPathHandler, UserPathHandler,
};

/// Two lookup tables: one for the first segment after the entry point
/// (which must produce a subject), one for every segment after that.
/// Each falls back to a default handler for unregistered names.
#[derive(Debug, Clone)]
pub struct HandlerRegistry {
    entry: HashMap<String, Handler>,
    entry_default: Handler,
    subject: HashMap<String, Handler>,
    subject_default: Handler,
}

impl HandlerRegistry {
    /// No named handlers: IRIs anchor, names are predicates.
    pub fn builder() -> HandlerRegistryBuilder {
        HandlerRegistryBuilder {
            registry: HandlerRegistry {
                entry: HashMap::new(),
                entry_default: Handler::Subject(SubjectPathHandler),
                subject: HashMap::new(),
                subject_default: Handler::Predicate(PredicatePathHandler),
            },
        }
    }

    /// `user` at the entry point, plus the activity handlers.
    pub fn solid() -> Self {
        let mut builder = Self::builder().entry("user", Handler::User(UserPathHandler));
        for activity in ActivityType::ALL {
            builder = builder
                .subject(
                    activity.find_name(),
                    Handler::FindActivity(FindActivityHandler::new(activity)),
                )
                .subject(
                    activity.create_name(),
                    Handler::CreateActivity(CreateActivityHandler::new(activity)),
                );
        }
        builder.build()
    }

    /// The handler for the first segment after the entry point.
    pub fn entry_handler(&self, name: &str) -> &Handler {
        self.entry.get(name).unwrap_or(&self.entry_default)
    }

    /// The handler for a segment following a subject.
    pub fn subject_handler(&self, name: &str) -> &Handler {
        self.subject.get(name).unwrap_or(&self.subject_default)
    }

    /// Whether `name` has its own subject-level handler.
    pub fn is_registered(&self, name: &str) -> bool {
        self.subject.contains_key(name)
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::solid()
    }
}

/// Builder for [`HandlerRegistry`].
pub struct HandlerRegistryBuilder {
    registry: HandlerRegistry,
}

impl HandlerRegistryBuilder {
    pub fn entry(mut self, name: impl Into<String>, handler: Handler) -> Self {
        self.registry.entry.insert(name.into(), handler);
        self
    }

    pub fn entry_default(mut self, handler: Handler) -> Self {
        self.registry.entry_default = handler;
        self
    }

    pub fn subject(mut self, name: impl Into<String>, handler: Handler) -> Self {
        self.registry.subject.insert(name.into(), handler);
        self
    }

    pub fn subject_default(mut self, handler: Handler) -> Self {
        self.registry.subject_default = handler;
        self
    }

    pub fn build(self) -> HandlerRegistry {
        self.registry
    }
}
