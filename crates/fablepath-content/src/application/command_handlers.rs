//! Command handlers for the Story Authoring context.
//!
//! Handlers orchestrate domain logic: parse the payload, validate and compile
//! the graph, then hand the published story to the store.

use std::sync::Arc;

use fablepath_core::command::Command;
use fablepath_core::error::DomainError;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::domain::authoring::StoryPayload;
use crate::domain::commands::PublishStory;
use crate::domain::published::{PublishRejected, PublishedStory};
use crate::domain::repository::StoryStore;
use crate::domain::story::StoryDefinition;
use crate::domain::validation::Warning;

/// Result of a successful publication.
#[derive(Debug, Clone)]
pub struct PublishResult {
    /// The story as stored.
    pub story: Arc<PublishedStory>,
    /// Advisory validation warnings.
    pub warnings: Vec<Warning>,
}

/// Why a publication failed.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The payload was malformed or the store failed.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The story graph has fatal structural errors.
    #[error(transparent)]
    Rejected(#[from] PublishRejected),
}

/// Handles the `PublishStory` command: parses and validates the payload, then
/// saves the compiled story.
///
/// # Errors
///
/// Returns `PublishError::Domain` for malformed payloads or store failures and
/// `PublishError::Rejected` when validation finds fatal errors.
#[instrument(skip(command, store), fields(correlation_id = %command.correlation_id()))]
pub async fn handle_publish_story(
    command: &PublishStory,
    store: &dyn StoryStore,
) -> Result<PublishResult, PublishError> {
    let payload = StoryPayload::parse(&command.source, command.format)?;
    let definition = StoryDefinition::try_from(payload)?;

    let (story, warnings) = PublishedStory::publish(&definition).inspect_err(|rejected| {
        warn!(
            story_id = %rejected.story_id,
            errors = rejected.errors().len(),
            "story rejected at publish time"
        );
    })?;

    for warning in &warnings {
        warn!(story_id = %story.id(), %warning, "story published with warning");
    }

    let story = Arc::new(story);
    store.save(Arc::clone(&story)).await?;

    info!(
        story_id = %story.id(),
        version_hash = %story.version_hash(),
        nodes = story.node_count(),
        "story published"
    );

    Ok(PublishResult { story, warnings })
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::domain::authoring::PayloadFormat;
    use crate::domain::repository::InMemoryStoryStore;
    use crate::domain::validation::FatalError;

    const GARDEN: &str = r#"{
        "id": "garden",
        "title": "The Garden",
        "category": "nature",
        "moral": "Care for growing things.",
        "startingNode": "start",
        "nodes": [
            { "id": "start", "content": "A gate stands open.", "choices": [
                { "text": "Go in", "next_node": "end_good", "points": 5 }
            ] },
            { "id": "end_good", "content": "You water the flowers.", "is_ending": true, "ending_type": "good" },
            { "id": "shed", "content": "An old shed.", "is_ending": true, "ending_type": "bad" }
        ]
    }"#;

    fn command(source: &str) -> PublishStory {
        PublishStory {
            correlation_id: Uuid::new_v4(),
            source: source.to_owned(),
            format: PayloadFormat::Json,
        }
    }

    #[tokio::test]
    async fn test_handle_publish_story_saves_story_and_returns_warnings() {
        // Arrange
        let store = InMemoryStoryStore::new();

        // Act
        let result = handle_publish_story(&command(GARDEN), &store).await.unwrap();

        // Assert
        assert_eq!(result.story.id(), "garden");
        assert_eq!(
            result.warnings,
            vec![Warning::UnreachableNode {
                node_id: "shed".into()
            }]
        );
        let stored = store.load("garden").await.unwrap();
        assert_eq!(stored.version_hash(), result.story.version_hash());
    }

    #[tokio::test]
    async fn test_handle_publish_story_rejects_fatal_errors() {
        // Arrange
        let store = InMemoryStoryStore::new();
        let broken = GARDEN.replace("\"next_node\": \"end_good\"", "\"next_node\": \"pond\"");

        // Act
        let result = handle_publish_story(&command(&broken), &store).await;

        // Assert
        match result {
            Err(PublishError::Rejected(rejected)) => {
                assert!(rejected
                    .errors()
                    .contains(&FatalError::DanglingChoiceReference {
                        node_id: "start".into(),
                        choice_index: 0,
                        target: "pond".into(),
                    }));
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
        assert!(matches!(
            store.load("garden").await,
            Err(DomainError::StoryNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_handle_publish_story_reports_malformed_payload() {
        let store = InMemoryStoryStore::new();

        let result = handle_publish_story(&command("[]"), &store).await;

        assert!(matches!(
            result,
            Err(PublishError::Domain(DomainError::Validation(_)))
        ));
    }

    #[tokio::test]
    async fn test_republishing_keeps_previous_arc_intact() {
        // Arrange
        let store = InMemoryStoryStore::new();
        let first = handle_publish_story(&command(GARDEN), &store).await.unwrap();
        let edited = GARDEN.replace("\"points\": 5", "\"points\": 8");

        // Act
        let second = handle_publish_story(&command(&edited), &store).await.unwrap();

        // Assert
        assert_ne!(first.story.version_hash(), second.story.version_hash());
        let start = first.story.start();
        assert_eq!(first.story[start].choices()[0].points, 5);
        let current = store.load("garden").await.unwrap();
        assert_eq!(current.version_hash(), second.story.version_hash());
    }
}
