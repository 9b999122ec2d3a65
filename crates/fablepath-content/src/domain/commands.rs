//! Commands for the Story Authoring context.

use fablepath_core::command::Command;
use uuid::Uuid;

use super::authoring::PayloadFormat;

/// Command to publish a story from an authoring payload.
#[derive(Debug, Clone)]
pub struct PublishStory {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Raw payload document.
    pub source: String,
    /// Format of `source`.
    pub format: PayloadFormat,
}

impl Command for PublishStory {
    fn command_type(&self) -> &'static str {
        "content.publish_story"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
