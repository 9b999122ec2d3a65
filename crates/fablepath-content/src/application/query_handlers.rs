//! Query handlers for the Story Authoring context.

use fablepath_core::error::DomainError;
use serde::Serialize;

use crate::domain::repository::StoryStore;

/// Read-only catalog view of a published story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorySummaryView {
    pub story_id: String,
    pub title: String,
    pub category: String,
    pub moral: String,
    pub version_hash: String,
    pub node_count: usize,
    /// Number of ending nodes in the story.
    pub ending_count: usize,
}

/// Retrieves the catalog view of a published story.
///
/// # Errors
///
/// Returns `DomainError::StoryNotFound` if the store has no such story.
pub async fn get_story(
    story_id: &str,
    store: &dyn StoryStore,
) -> Result<StorySummaryView, DomainError> {
    let story = store.load(story_id).await?;
    Ok(StorySummaryView {
        story_id: story.id().to_owned(),
        title: story.title().to_owned(),
        category: story.category().to_owned(),
        moral: story.moral().to_owned(),
        version_hash: story.version_hash().to_owned(),
        node_count: story.node_count(),
        ending_count: story
            .nodes()
            .filter(|node| node.ending_type().is_some())
            .count(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::published::PublishedStory;
    use crate::domain::repository::InMemoryStoryStore;
    use crate::domain::story::{Choice, EndingType, StoryDefinition, StoryNode};

    #[tokio::test]
    async fn test_get_story_returns_summary() {
        // Arrange
        let mut def = StoryDefinition::new("bridge", "The Bridge", "start")
            .with_node(StoryNode::branching(
                "start",
                "A wobbly bridge.",
                vec![Choice::new("Cross", "over", 3), Choice::new("Wait", "home", 0)],
            ))
            .with_node(StoryNode::ending("over", "Made it!", EndingType::Excellent))
            .with_node(StoryNode::ending("home", "Safe at home.", EndingType::Good));
        def.category = "courage".into();
        let (story, _) = PublishedStory::publish(&def).unwrap();
        let store = InMemoryStoryStore::new();
        store.save(Arc::new(story)).await.unwrap();

        // Act
        let view = get_story("bridge", &store).await.unwrap();

        // Assert
        assert_eq!(view.title, "The Bridge");
        assert_eq!(view.category, "courage");
        assert_eq!(view.node_count, 3);
        assert_eq!(view.ending_count, 2);
    }

    #[tokio::test]
    async fn test_get_story_returns_not_found() {
        let store = InMemoryStoryStore::new();

        let result = get_story("missing", &store).await;

        match result.unwrap_err() {
            DomainError::StoryNotFound(id) => assert_eq!(id, "missing"),
            other => panic!("expected StoryNotFound, got {other:?}"),
        }
    }
}
