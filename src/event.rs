use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::rdf::Node;

/// User intents emitted by rendered views and dispatched back into the [`App`](crate::app::App).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrowserEvent {
    /// Navigate to a resource (child entry of a folder)
    Select(String),
    /// Navigate to the container of the current resource
    NavigateParent,
    /// The text editor widget reported new content
    EditContent(String),
    /// The content type selector changed
    ChangeContentType(String),
    /// Persist the current buffer
    SaveFile,
    /// Switch between the action table and the raw text editor
    ToggleActionsEditor,
    /// Action subject, new additionalType IRI
    SetActionType { subject: Node, type_iri: String },
    /// Ask the host to start the login flow
    Login,
}

impl Display for BrowserEvent {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            BrowserEvent::Select(_) => write!(f, "Select"),
            BrowserEvent::NavigateParent => write!(f, "NavigateParent"),
            BrowserEvent::EditContent(_) => write!(f, "EditContent"),
            BrowserEvent::ChangeContentType(_) => write!(f, "ChangeContentType"),
            BrowserEvent::SaveFile => write!(f, "SaveFile"),
            BrowserEvent::ToggleActionsEditor => write!(f, "ToggleActionsEditor"),
            BrowserEvent::SetActionType { .. } => write!(f, "SetActionType"),
            BrowserEvent::Login => write!(f, "Login"),
        }
    }
}

/// An event waiting for the value of the form control it is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeEvent {
    ContentType,
    EditorText,
    ActionType { subject: Node },
}

impl ChangeEvent {
    pub fn with_value(self, value: String) -> BrowserEvent {
        match self {
            ChangeEvent::ContentType => BrowserEvent::ChangeContentType(value),
            ChangeEvent::EditorText => BrowserEvent::EditContent(value),
            ChangeEvent::ActionType { subject } => BrowserEvent::SetActionType {
                subject,
                type_iri: value,
            },
        }
    }
}
