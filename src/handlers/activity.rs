//! ActivityStreams handlers: `likes` finds, `like(...)` creates.
//!
//! ```text
//! me.likes            ?v0 a as:Like; as:actor <me>; as:object ?likes.
//! me.like(<post>)     _:b a as:Like; as:actor <me>; as:object <post>; as:published "..."
//! post.like()         _:b a as:Like; as:actor ?user; as:object <post>; as:published "..."
//! ```

use chrono::{SecondsFormat, Utc};

use super::{Handled, HandlerContext, PathHandler};
use crate::model::{BlankNode, Literal, NamedNode, Term};
use crate::query::{Node, TriplePattern};
use crate::vocab::{self, activitystreams as act};
use crate::Result;

/// The activity kinds with built-in handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityType {
    Like,
    Dislike,
    Follow,
}

impl ActivityType {
    pub const ALL: [ActivityType; 3] = [ActivityType::Like, ActivityType::Dislike, ActivityType::Follow];

    pub fn iri(self) -> NamedNode {
        vocab::iri(match self {
            ActivityType::Like => act::LIKE,
            ActivityType::Dislike => act::DISLIKE,
            ActivityType::Follow => act::FOLLOW,
        })
    }

    /// Segment that finds activities of this type (`likes`).
    pub fn find_name(self) -> &'static str {
        match self {
            ActivityType::Like => "likes",
            ActivityType::Dislike => "dislikes",
            ActivityType::Follow => "follows",
        }
    }

    /// Call segment that creates one (`like()`).
    pub fn create_name(self) -> &'static str {
        match self {
            ActivityType::Like => "like",
            ActivityType::Dislike => "dislike",
            ActivityType::Follow => "follow",
        }
    }
}

/// Reads the objects of the focus's activities of one type.
#[derive(Debug, Clone, Copy)]
pub struct FindActivityHandler {
    activity: ActivityType,
}

impl FindActivityHandler {
    pub fn new(activity: ActivityType) -> Self {
        Self { activity }
    }

    pub fn activity(&self) -> ActivityType {
        self.activity
    }
}

impl PathHandler for FindActivityHandler {
    fn handle(&self, cx: &HandlerContext<'_>) -> Result<Handled> {
        if cx.segment().is_call() {
            let name = &cx.segment().name;
            return Err(cx.error(format!("{name} is not callable; use {} to create one", self.activity.create_name())));
        }
        let activity = Node::Variable(cx.fresh_variable());
        let object = Node::Variable(cx.result_variable());
        Ok(Handled::Traverse {
            patterns: vec![
                TriplePattern::new(activity.clone(), vocab::iri(vocab::rdf::TYPE), self.activity.iri()),
                TriplePattern::new(activity.clone(), vocab::iri(act::ACTOR), cx.focus().clone()),
                TriplePattern::new(activity, vocab::iri(act::OBJECT), object.clone()),
            ],
            focus: object,
        })
    }
}

/// Inserts one activity of its type per call argument, with the focus as
/// actor. Called without arguments, the logged-in user acts on the focus.
#[derive(Debug, Clone, Copy)]
pub struct CreateActivityHandler {
    activity: ActivityType,
}

impl CreateActivityHandler {
    pub fn new(activity: ActivityType) -> Self {
        Self { activity }
    }

    pub fn activity(&self) -> ActivityType {
        self.activity
    }
}

impl PathHandler for CreateActivityHandler {
    fn handle(&self, cx: &HandlerContext<'_>) -> Result<Handled> {
        let name = &cx.segment().name;
        let Some(args) = &cx.segment().args else {
            return Err(cx.error(format!("{name} must be called, as in {name}(object)")));
        };
        let (actor, objects): (Node, Vec<Node>) = if args.is_empty() {
            (Node::User, vec![cx.focus().clone()])
        } else {
            let objects: Vec<Node> = args.iter().filter_map(|arg| arg.to_term()).map(Node::from).collect();
            if objects.is_empty() {
                return Err(cx.error(format!("{name}() arguments name no object")));
            }
            (cx.focus().clone(), objects)
        };

        let published = Literal::new_typed_literal(
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            vocab::iri(vocab::xsd::DATE_TIME),
        );
        let mut template = Vec::with_capacity(objects.len() * 4);
        for object in objects {
            let activity = Node::Term(BlankNode::default().into());
            template.push(TriplePattern::new(activity.clone(), vocab::iri(vocab::rdf::TYPE), self.activity.iri()));
            template.push(TriplePattern::new(activity.clone(), vocab::iri(act::ACTOR), actor.clone()));
            template.push(TriplePattern::new(activity.clone(), vocab::iri(act::OBJECT), object));
            template.push(TriplePattern::new(activity, vocab::iri(act::PUBLISHED), Term::from(published.clone())));
        }
        Ok(Handled::Insert { template })
    }
}
