//! IRIs the built-in handlers and the default context rely on.

use crate::model::NamedNode;

pub mod rdf {
    pub const NAMESPACE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
}

pub mod xsd {
    pub const NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
}

pub mod foaf {
    pub const NAMESPACE: &str = "http://xmlns.com/foaf/0.1/";
    pub const GIVEN_NAME: &str = "http://xmlns.com/foaf/0.1/givenName";
    pub const KNOWS: &str = "http://xmlns.com/foaf/0.1/knows";
}

/// ActivityStreams 2.0.
pub mod activitystreams {
    pub const NAMESPACE: &str = "https://www.w3.org/ns/activitystreams#";
    pub const ACTOR: &str = "https://www.w3.org/ns/activitystreams#actor";
    pub const OBJECT: &str = "https://www.w3.org/ns/activitystreams#object";
    pub const PUBLISHED: &str = "https://www.w3.org/ns/activitystreams#published";
    pub const LIKE: &str = "https://www.w3.org/ns/activitystreams#Like";
    pub const DISLIKE: &str = "https://www.w3.org/ns/activitystreams#Dislike";
    pub const FOLLOW: &str = "https://www.w3.org/ns/activitystreams#Follow";
}

/// A named node for one of the constants above.
pub fn iri(constant: &'static str) -> NamedNode {
    NamedNode::new_unchecked(constant)
}
