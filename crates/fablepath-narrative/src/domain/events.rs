//! Domain events for the Narrative Playback context.

use fablepath_content::domain::published::NodeIndex;
use fablepath_content::domain::story::EndingType;
use fablepath_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const SESSION_STARTED_EVENT_TYPE: &str = "session.started";
pub const CHOICE_MADE_EVENT_TYPE: &str = "session.choice_made";
pub const SESSION_COMPLETED_EVENT_TYPE: &str = "session.completed";

/// Emitted when a session opens on a story's starting node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStarted {
    /// The session identifier.
    pub session_id: Uuid,
    /// The story being played.
    pub story_id: String,
    /// Version hash of the published story.
    pub story_version: String,
    /// Arena index of the starting node.
    pub start: NodeIndex,
    /// Id of the starting node.
    pub start_node_id: String,
}

/// Emitted when the player takes a choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceMade {
    /// The session identifier.
    pub session_id: Uuid,
    /// Node the choice was taken on.
    pub node_id: String,
    /// Index of the choice within that node.
    pub choice_index: usize,
    /// Points carried by the choice.
    pub points_awarded: i32,
    /// Arena index of the node the choice leads to.
    pub next: NodeIndex,
    /// Id of the node the choice leads to.
    pub next_node_id: String,
}

/// Emitted when the session enters an ending node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCompleted {
    /// The session identifier.
    pub session_id: Uuid,
    /// Classification of the ending reached.
    pub ending_type: EndingType,
    /// Score at completion.
    pub final_score: i64,
}

/// Event payload variants for the Narrative Playback context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEventKind {
    /// A session has started.
    SessionStarted(SessionStarted),
    /// A choice has been taken.
    ChoiceMade(ChoiceMade),
    /// The session has reached an ending.
    SessionCompleted(SessionCompleted),
}

/// Domain event envelope for the Narrative Playback context.
#[derive(Debug, Clone)]
pub struct SessionEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: SessionEventKind,
}

impl SessionEventKind {
    /// Event type name for this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::SessionStarted(_) => SESSION_STARTED_EVENT_TYPE,
            Self::ChoiceMade(_) => CHOICE_MADE_EVENT_TYPE,
            Self::SessionCompleted(_) => SESSION_COMPLETED_EVENT_TYPE,
        }
    }
}

impl DomainEvent for SessionEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("SessionEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
