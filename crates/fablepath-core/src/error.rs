//! Domain error types.

use thiserror::Error;

/// Errors shared by every context of the engine.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No published story exists under the requested id.
    #[error("story not found: {0}")]
    StoryNotFound(String),

    /// An authoring payload could not be turned into a story definition.
    #[error("validation error: {0}")]
    Validation(String),

    /// A recorder or awarder side effect failed.
    #[error("persistence failed: {0}")]
    PersistenceFailed(String),

    /// Any other infrastructure failure (I/O, serialization).
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_story_not_found_message_names_the_story() {
        let err = DomainError::StoryNotFound("forest-friends".into());
        assert_eq!(err.to_string(), "story not found: forest-friends");
    }

    #[test]
    fn test_persistence_failed_message_includes_cause() {
        let err = DomainError::PersistenceFailed("disk full".into());
        assert_eq!(err.to_string(), "persistence failed: disk full");
    }
}
