//! Errors raised while opening or driving a session.

use fablepath_content::domain::validation::FatalError;
use fablepath_core::error::DomainError;
use thiserror::Error;
use uuid::Uuid;

/// Session-level error. Every variant leaves the session unchanged.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The story has fatal structural errors and cannot be played.
    #[error("story {story_id:?} failed validation with {} fatal error(s)", .errors.len())]
    ValidationFailed {
        /// The rejected story.
        story_id: String,
        /// The fatal errors found.
        errors: Vec<FatalError>,
    },

    /// The choice index is outside the current node's choices.
    #[error("choice index {index} is out of range: the current node offers {available} choice(s)")]
    InvalidChoiceIndex {
        /// The requested index.
        index: usize,
        /// Number of choices on the current node.
        available: usize,
    },

    /// The session already reached an ending.
    #[error("session {session_id} has already terminated")]
    SessionAlreadyTerminated {
        /// The terminated session.
        session_id: Uuid,
    },

    /// An outcome was requested before the session reached an ending.
    #[error("session {session_id} has not terminated yet")]
    SessionNotTerminated {
        /// The running session.
        session_id: Uuid,
    },

    /// Loading the story failed.
    #[error(transparent)]
    Store(#[from] DomainError),
}
