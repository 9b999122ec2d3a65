//! Query handlers for the Narrative Playback context.

use fablepath_content::domain::story::EndingType;
use fablepath_core::aggregate::AggregateRoot;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::aggregates::{PathStep, PlayerSession, SessionStatus};

/// Read-only snapshot of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub story_id: String,
    pub story_version: String,
    pub current_node_id: String,
    pub accumulated_score: i64,
    pub status: SessionStatus,
    pub final_ending_type: Option<EndingType>,
    pub path: Vec<PathStep>,
    /// Current version (event count).
    pub version: i64,
}

/// Builds the snapshot view of a session.
#[must_use]
pub fn describe_session(session: &PlayerSession) -> SessionView {
    SessionView {
        session_id: session.id(),
        story_id: session.story().id().to_owned(),
        story_version: session.story().version_hash().to_owned(),
        current_node_id: session.current_node_id().to_owned(),
        accumulated_score: session.accumulated_score(),
        status: session.status(),
        final_ending_type: session.final_ending_type(),
        path: session.path().to_vec(),
        version: session.version(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use fablepath_test_support::{FixedClock, fixtures};

    use super::*;
    use crate::application::replay::replay;

    #[test]
    fn test_describe_session_reflects_state() {
        // Arrange
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap());
        let session = replay(fixtures::published_garden(), &[0], &clock).unwrap();

        // Act
        let view = describe_session(&session);

        // Assert
        assert_eq!(view.story_id, "garden");
        assert_eq!(view.current_node_id, "mid");
        assert_eq!(view.accumulated_score, 5);
        assert_eq!(view.status, SessionStatus::InProgress);
        assert_eq!(view.final_ending_type, None);
        assert_eq!(view.path.len(), 1);
        assert_eq!(view.version, 2);
    }

    #[test]
    fn test_session_view_serializes_status_in_snake_case() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap());
        let session = replay(fixtures::published_garden(), &[1], &clock).unwrap();

        let json = serde_json::to_value(describe_session(&session)).unwrap();

        assert_eq!(json["status"], "completed");
        assert_eq!(json["final_ending_type"], "bad");
    }
}
