//! Commands for the Narrative Playback context.

use fablepath_core::command::Command;
use uuid::Uuid;

/// Command to open a session against a stored story.
#[derive(Debug, Clone)]
pub struct StartSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The story to play.
    pub story_id: String,
}

impl Command for StartSession {
    fn command_type(&self) -> &'static str {
        "narrative.start_session"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to take one of the current node's choices.
#[derive(Debug, Clone)]
pub struct MakeChoice {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Zero-based index into the current node's choices.
    pub choice_index: usize,
}

impl Command for MakeChoice {
    fn command_type(&self) -> &'static str {
        "narrative.make_choice"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
