//! Commands for the Session & Progress context.

use fablepath_core::command::Command;
use uuid::Uuid;

/// Command to take a choice on behalf of a player and settle the session if
/// the choice ends it.
#[derive(Debug, Clone)]
pub struct PlayChoice {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Player the reward goes to.
    pub player_id: Uuid,
    /// Zero-based index into the current node's choices.
    pub choice_index: usize,
}

impl Command for PlayChoice {
    fn command_type(&self) -> &'static str {
        "progress.play_choice"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
