//! Fablepath CLI error types.

use fablepath_content::application::command_handlers::PublishError;
use fablepath_core::error::DomainError;
use fablepath_narrative::domain::errors::SessionError;
use thiserror::Error;

/// Anything that makes a CLI run end with a non-zero exit code.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable or argument is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// A story file could not be read.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A malformed payload or a store failure.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The story failed to publish.
    #[error(transparent)]
    Publish(#[from] PublishError),

    /// A choice could not be played.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Output could not be serialized.
    #[error("output error: {0}")]
    Output(#[from] serde_json::Error),
}

impl AppError {
    /// Process exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Io(_) | Self::Output(_) => 3,
            Self::Domain(_) | Self::Publish(_) | Self::Session(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_exit_with_2() {
        assert_eq!(AppError::Config("bad".into()).exit_code(), 2);
    }

    #[test]
    fn test_session_errors_exit_with_1() {
        let err = AppError::from(SessionError::InvalidChoiceIndex {
            index: 4,
            available: 2,
        });

        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_domain_error_message_is_passed_through() {
        let err = AppError::from(DomainError::Validation("missing field `id`".into()));

        assert_eq!(err.to_string(), "validation error: missing field `id`");
    }
}
