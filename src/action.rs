//! schema.org Action records over a [`TripleStore`].
//!
//! An action record is a projection, not a stored entity: it is recomputed from the store whenever it
//! is read. Only one property is writable, the action's `schema:additionalType`.

use serde::{Deserialize, Serialize};

use crate::rdf::{
    vocab::{
        RDF_TYPE, SCHEMA_ACTION, SCHEMA_ADDITIONAL_TYPE, SCHEMA_NAME, SCHEMA_OBJECT,
        SCHEMA_START_TIME,
    },
    Node, TripleStore,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionObject {
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub subject: Node,
    /// `schema:additionalType`
    pub action_type: Option<String>,
    /// The entity linked through `schema:object`
    pub object: ActionObject,
    /// `schema:startTime`
    pub start_time: Option<String>,
}

/// Action types offered by the type selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    Bookmark,
    Like,
    Follow,
}

impl ActionType {
    pub const ALL: [ActionType; 3] = [ActionType::Bookmark, ActionType::Like, ActionType::Follow];

    pub fn iri(&self) -> &'static str {
        match self {
            ActionType::Bookmark => "https://schema.org/BookmarkAction",
            ActionType::Like => "https://schema.org/LikeAction",
            ActionType::Follow => "https://schema.org/FollowAction",
        }
    }

    pub fn from_iri(iri: &str) -> Option<Self> {
        ActionType::ALL.into_iter().find(|t| t.iri() == iri)
    }
}

pub trait ActionGraph {
    /// Subjects typed `schema:Action`, in store enumeration order.
    fn list_action_subjects(&self) -> Vec<Node>;

    /// Resolve the fixed property set of `subject`. The object's name is read one hop away, through
    /// `schema:object`.
    fn read_action_properties(&self, subject: &Node) -> ActionRecord;

    /// Replace every `schema:additionalType` of `subject` with exactly `type_iri`. The store is
    /// mutated in place; persisting it is the caller's job.
    fn set_action_type(&mut self, subject: &Node, type_iri: &str);

    fn action_records(&self) -> Vec<ActionRecord> {
        self.list_action_subjects()
            .iter()
            .map(|subject| self.read_action_properties(subject))
            .collect()
    }

    fn has_actions(&self) -> bool {
        !self.list_action_subjects().is_empty()
    }
}

impl ActionGraph for TripleStore {
    fn list_action_subjects(&self) -> Vec<Node> {
        let action = Node::iri(SCHEMA_ACTION);
        self.statements_matching(None, Some(RDF_TYPE), Some(&action))
            .map(|st| st.subject.clone())
            .collect()
    }

    fn read_action_properties(&self, subject: &Node) -> ActionRecord {
        let name = self
            .any_statement_matching(Some(subject), Some(SCHEMA_OBJECT), None)
            .and_then(|st| self.any_value(&st.object, SCHEMA_NAME))
            .map(str::to_string);

        ActionRecord {
            subject: subject.clone(),
            action_type: self
                .any_value(subject, SCHEMA_ADDITIONAL_TYPE)
                .map(str::to_string),
            object: ActionObject { name },
            start_time: self
                .any_value(subject, SCHEMA_START_TIME)
                .map(str::to_string),
        }
    }

    fn set_action_type(&mut self, subject: &Node, type_iri: &str) {
        let removed = self.remove_matches(Some(subject), Some(SCHEMA_ADDITIONAL_TYPE), None);
        tracing::debug!(
            "[ActionGraph] {subject}: replacing {removed} additionalType statement(s) with {type_iri}"
        );
        self.add(subject.clone(), SCHEMA_ADDITIONAL_TYPE, Node::iri(type_iri));
    }
}
