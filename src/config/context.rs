//! JSON-LD style vocabulary: which predicate a segment name stands for.
//!
//! ```json
//! { "@context": {
//!     "foaf": "http://xmlns.com/foaf/0.1/",
//!     "firstName": "foaf:givenName",
//!     "friends": { "@id": "foaf:knows" }
//! } }
//! ```

use std::collections::HashMap;

use serde_json::Value as Json;

use crate::model::term::is_absolute_iri;
use crate::model::NamedNode;
use crate::{Error, Result};

/// Term definitions plus an optional `@vocab`.
///
/// Any definition can serve as a prefix of a compact IRI, as in JSON-LD.
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    definitions: HashMap<String, String>,
    vocab: Option<String>,
}

/// Term definitions chain through each other at most this deep.
const MAX_INDIRECTION: usize = 8;

impl Context {
    /// A context that expands nothing but absolute IRIs.
    pub fn empty() -> Self {
        Self { definitions: HashMap::new(), vocab: None }
    }

    pub fn with_term(mut self, name: impl Into<String>, iri: impl Into<String>) -> Self {
        self.definitions.insert(name.into(), iri.into());
        self
    }

    /// Names without a definition expand to `vocab + name`.
    pub fn with_vocab(mut self, vocab: impl Into<String>) -> Self {
        self.vocab = Some(vocab.into());
        self
    }

    /// Add every definition of `other`, overriding ours on conflict.
    pub fn merge(mut self, other: Context) -> Self {
        self.definitions.extend(other.definitions);
        if other.vocab.is_some() {
            self.vocab = other.vocab;
        }
        self
    }

    /// Parse a JSON-LD document carrying a `@context`, or a bare context
    /// object. Arrays of context objects are merged in order; remote
    /// context references are rejected.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: Json = serde_json::from_str(json)
            .map_err(|e| Error::ConfigError(format!("invalid JSON-LD context: {e}")))?;
        let context = match &document {
            Json::Object(map) => map.get("@context").unwrap_or(&document),
            _ => &document,
        };
        Self::empty().load(context)
    }

    fn load(mut self, context: &Json) -> Result<Self> {
        match context {
            Json::Array(items) => items.iter().try_fold(self, |ctx, item| ctx.load(item)),
            Json::Object(map) => {
                for (key, value) in map {
                    match (key.as_str(), value) {
                        ("@vocab", Json::String(vocab)) => self.vocab = Some(vocab.clone()),
                        (key, _) if key.starts_with('@') => {}
                        (_, Json::String(iri)) => {
                            self.definitions.insert(key.clone(), iri.clone());
                        }
                        (_, Json::Object(definition)) => match definition.get("@id") {
                            Some(Json::String(iri)) => {
                                self.definitions.insert(key.clone(), iri.clone());
                            }
                            _ => {
                                return Err(Error::ConfigError(format!(
                                    "term '{key}' has no string @id"
                                )))
                            }
                        },
                        (_, Json::Null) => {
                            self.definitions.remove(key);
                        }
                        _ => {
                            return Err(Error::ConfigError(format!(
                                "unsupported definition for term '{key}'"
                            )))
                        }
                    }
                }
                Ok(self)
            }
            Json::String(reference) => Err(Error::ConfigError(format!(
                "remote context <{reference}> is not supported"
            ))),
            Json::Null => Ok(self),
            _ => Err(Error::ConfigError("a context must be an object or an array".into())),
        }
    }

    /// The predicate a segment name stands for.
    ///
    /// Tried in order: a term definition, a compact IRI with a defined
    /// prefix, an absolute IRI, then `@vocab`.
    pub fn expand(&self, name: &str) -> Option<NamedNode> {
        if let Some(definition) = self.definitions.get(name) {
            return self.expand_definition(definition, 0);
        }
        if let Some(iri) = self.expand_compact(name) {
            return Some(iri);
        }
        if is_absolute_iri(name) {
            return NamedNode::new(name).ok();
        }
        let vocab = self.vocab.as_ref()?;
        NamedNode::new(format!("{vocab}{name}")).ok()
    }

    fn expand_definition(&self, value: &str, depth: usize) -> Option<NamedNode> {
        if depth > MAX_INDIRECTION {
            return None;
        }
        if let Some(iri) = self.expand_compact(value) {
            return Some(iri);
        }
        match self.definitions.get(value) {
            Some(next) if next != value => self.expand_definition(next, depth + 1),
            _ => NamedNode::new(value).ok(),
        }
    }

    fn expand_compact(&self, name: &str) -> Option<NamedNode> {
        let (prefix, local) = name.split_once(':')?;
        if local.starts_with("//") {
            return None;
        }
        let base = self.definitions.get(prefix)?;
        NamedNode::new(format!("{base}{local}")).ok()
    }
}

/// Prefixes and terms commonly found in Solid profiles.
impl Default for Context {
    fn default() -> Self {
        const PREFIXES: &[(&str, &str)] = &[
            ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
            ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
            ("xsd", "http://www.w3.org/2001/XMLSchema#"),
            ("foaf", "http://xmlns.com/foaf/0.1/"),
            ("vcard", "http://www.w3.org/2006/vcard/ns#"),
            ("as", "https://www.w3.org/ns/activitystreams#"),
            ("schema", "http://schema.org/"),
            ("dc", "http://purl.org/dc/terms/"),
            ("ldp", "http://www.w3.org/ns/ldp#"),
            ("space", "http://www.w3.org/ns/pim/space#"),
            ("solid", "http://www.w3.org/ns/solid/terms#"),
        ];
        const TERMS: &[(&str, &str)] = &[
            ("type", "rdf:type"),
            ("label", "rdfs:label"),
            ("comment", "rdfs:comment"),
            ("name", "foaf:name"),
            ("firstName", "foaf:givenName"),
            ("lastName", "foaf:familyName"),
            ("nick", "foaf:nick"),
            ("friends", "foaf:knows"),
            ("knows", "foaf:knows"),
            ("email", "foaf:mbox"),
            ("image", "foaf:img"),
            ("homepage", "foaf:homepage"),
            ("title", "dc:title"),
            ("inbox", "ldp:inbox"),
            ("storage", "space:storage"),
            ("actor", "as:actor"),
            ("object", "as:object"),
            ("published", "as:published"),
        ];

        PREFIXES
            .iter()
            .chain(TERMS)
            .fold(Context::empty(), |ctx, (name, iri)| ctx.with_term(*name, *iri))
    }
}
