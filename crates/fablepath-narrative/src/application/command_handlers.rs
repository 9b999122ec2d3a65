//! Command handlers for the Narrative Playback context.
//!
//! Sessions are explicit values owned by the caller; handlers never keep a
//! "current session" of their own.

use fablepath_content::domain::repository::StoryStore;
use fablepath_content::domain::story::StoryDefinition;
use fablepath_core::clock::Clock;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::domain::aggregates::{PlayerSession, Transition};
use crate::domain::commands::{MakeChoice, StartSession};
use crate::domain::errors::SessionError;

/// Handles the `StartSession` command: loads the published story and opens a
/// session on it.
///
/// # Errors
///
/// Returns `SessionError::Store` if the story cannot be loaded.
#[instrument(skip(command, store, clock), fields(story_id = %command.story_id, correlation_id = %command.correlation_id))]
pub async fn handle_start_session(
    command: &StartSession,
    store: &dyn StoryStore,
    clock: &dyn Clock,
) -> Result<PlayerSession, SessionError> {
    let story = store.load(&command.story_id).await?;
    let session = PlayerSession::start(story, command.correlation_id, clock);

    info!(
        session_id = %session.id(),
        story_version = %session.story().version_hash(),
        "session started"
    );

    Ok(session)
}

/// Opens a session directly on an authored definition, validating it first.
///
/// # Errors
///
/// Returns `SessionError::ValidationFailed` if the definition has fatal
/// structural errors.
pub fn start_session(
    definition: &StoryDefinition,
    clock: &dyn Clock,
) -> Result<PlayerSession, SessionError> {
    let session = PlayerSession::start_from_definition(definition, Uuid::new_v4(), clock)?;
    info!(session_id = %session.id(), story_id = %definition.id, "session started");
    Ok(session)
}

/// Handles the `MakeChoice` command against the caller's session.
///
/// # Errors
///
/// Returns `SessionError::SessionAlreadyTerminated` or
/// `SessionError::InvalidChoiceIndex`; the session is unchanged in both cases.
#[instrument(skip(command, session, clock), fields(session_id = %session.id(), correlation_id = %command.correlation_id))]
pub fn handle_make_choice(
    command: &MakeChoice,
    session: &mut PlayerSession,
    clock: &dyn Clock,
) -> Result<Transition, SessionError> {
    let transition = session.choose(command.choice_index, command.correlation_id, clock)?;

    debug!(
        from = %transition.step.node_id,
        to = %transition.node_id,
        choice_index = transition.step.choice_index,
        points = transition.step.points_awarded,
        score = session.accumulated_score(),
        "choice applied"
    );

    if transition.completed {
        info!(
            score = session.accumulated_score(),
            ending = ?session.final_ending_type(),
            "session completed"
        );
    }

    Ok(transition)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use fablepath_content::domain::story::EndingType;
    use fablepath_core::error::DomainError;
    use fablepath_test_support::{FixedClock, InMemoryStoryStore, fixtures};
    use uuid::Uuid;

    use super::*;

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn test_handle_start_session_loads_story_from_store() {
        // Arrange
        let store = InMemoryStoryStore::new();
        store.save(fixtures::published_garden()).await.unwrap();
        let command = StartSession {
            correlation_id: Uuid::new_v4(),
            story_id: "garden".into(),
        };

        // Act
        let session = handle_start_session(&command, &store, &clock()).await.unwrap();

        // Assert
        assert_eq!(session.story().id(), "garden");
        assert_eq!(session.current_node_id(), "start");
    }

    #[tokio::test]
    async fn test_handle_start_session_reports_missing_story() {
        let store = InMemoryStoryStore::new();
        let command = StartSession {
            correlation_id: Uuid::new_v4(),
            story_id: "nowhere".into(),
        };

        let result = handle_start_session(&command, &store, &clock()).await;

        match result {
            Err(SessionError::Store(DomainError::StoryNotFound(id))) => assert_eq!(id, "nowhere"),
            other => panic!("expected StoryNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_in_flight_session_keeps_its_story_version_after_republish() {
        // Arrange
        let store = InMemoryStoryStore::new();
        store.save(fixtures::published_garden()).await.unwrap();
        let command = StartSession {
            correlation_id: Uuid::new_v4(),
            story_id: "garden".into(),
        };
        let mut session = handle_start_session(&command, &store, &clock()).await.unwrap();

        let mut edited = fixtures::garden_story();
        edited.nodes.get_mut("start").unwrap().choices[0].points = 50;
        store.save(fixtures::publish(&edited)).await.unwrap();

        // Act
        session.choose(0, Uuid::new_v4(), &clock()).unwrap();

        // Assert
        assert_eq!(session.accumulated_score(), 5);
        let current = store.load("garden").await.unwrap();
        assert!(!Arc::ptr_eq(session.story(), &current));
    }

    #[test]
    fn test_start_session_accepts_story_with_unreachable_ending() {
        // Arrange
        let definition = fixtures::story_with_unreachable_node();

        // Act
        let session = start_session(&definition, &clock()).unwrap();

        // Assert
        assert_eq!(session.story().node_count(), 5);
        assert!(session.story().index_of("hidden_pond").is_some());
        assert_eq!(session.current_node_id(), "start");
    }

    #[test]
    fn test_start_session_rejects_invalid_definition() {
        let result = start_session(&fixtures::cyclic_story(), &clock());

        assert!(matches!(result, Err(SessionError::ValidationFailed { .. })));
    }

    #[test]
    fn test_handle_make_choice_applies_transition() {
        // Arrange
        let mut session = start_session(&fixtures::garden_story(), &clock()).unwrap();
        let command = MakeChoice {
            correlation_id: Uuid::new_v4(),
            choice_index: 1,
        };

        // Act
        let transition = handle_make_choice(&command, &mut session, &clock()).unwrap();

        // Assert
        assert!(transition.completed);
        assert_eq!(transition.node_id, "end_bad");
        assert_eq!(session.final_ending_type(), Some(EndingType::Bad));
    }
}
