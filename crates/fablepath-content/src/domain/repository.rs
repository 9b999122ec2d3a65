//! Story Definition Store abstraction.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use fablepath_core::error::DomainError;

use super::published::PublishedStory;

/// Repository of published stories.
///
/// Saving a story under an existing id replaces the stored version; sessions
/// already holding the previous `Arc` keep playing it.
#[async_trait]
pub trait StoryStore: Send + Sync {
    /// Stores a published story, replacing any previous version.
    async fn save(&self, story: Arc<PublishedStory>) -> Result<(), DomainError>;

    /// Loads the current version of a story.
    async fn load(&self, story_id: &str) -> Result<Arc<PublishedStory>, DomainError>;
}

/// Process-local `StoryStore`.
#[derive(Debug, Default)]
pub struct InMemoryStoryStore {
    stories: RwLock<HashMap<String, Arc<PublishedStory>>>,
}

impl InMemoryStoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoryStore for InMemoryStoryStore {
    async fn save(&self, story: Arc<PublishedStory>) -> Result<(), DomainError> {
        let mut stories = self
            .stories
            .write()
            .map_err(|_| DomainError::Infrastructure("story store lock poisoned".into()))?;
        stories.insert(story.id().to_owned(), story);
        Ok(())
    }

    async fn load(&self, story_id: &str) -> Result<Arc<PublishedStory>, DomainError> {
        let stories = self
            .stories
            .read()
            .map_err(|_| DomainError::Infrastructure("story store lock poisoned".into()))?;
        stories
            .get(story_id)
            .cloned()
            .ok_or_else(|| DomainError::StoryNotFound(story_id.to_owned()))
    }
}
