//! Story definition model as authored, before validation.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Classification of an ending node, used to compute rewards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndingType {
    /// The best possible ending.
    Excellent,
    /// A very good ending.
    Great,
    /// A satisfactory ending.
    Good,
    /// An unhappy ending.
    Bad,
}

impl EndingType {
    /// All recognized ending types, best first.
    pub const ALL: [EndingType; 4] = [Self::Excellent, Self::Great, Self::Good, Self::Bad];

    /// Returns the lowercase authoring name of this ending type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Great => "great",
            Self::Good => "good",
            Self::Bad => "bad",
        }
    }
}

impl fmt::Display for EndingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an authored ending type is not one of the known values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized ending type: {0:?}")]
pub struct UnknownEndingType(pub String);

impl FromStr for EndingType {
    type Err = UnknownEndingType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|ending| ending.as_str() == normalized)
            .ok_or_else(|| UnknownEndingType(s.to_owned()))
    }
}

/// A labeled edge from a branching node to another node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Text shown to the player.
    pub text: String,
    /// Id of the node this choice leads to.
    pub next_node_id: String,
    /// Points awarded when the choice is taken. May be zero or negative.
    pub points: i32,
}

/// One narrative beat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryNode {
    /// Node identifier, unique within the story.
    pub id: String,
    /// Narrative text.
    pub content: String,
    /// Character speaking the content, if any.
    pub speaker: Option<String>,
    /// Illustration reference, if any.
    pub image_ref: Option<String>,
    /// Whether this node terminates the story.
    pub is_ending: bool,
    /// Ending classification as authored. Required on ending nodes.
    pub ending_type: Option<String>,
    /// Outgoing choices in presentation order. Empty on ending nodes.
    pub choices: Vec<Choice>,
}

impl StoryNode {
    /// Creates a branching node with the given choices.
    #[must_use]
    pub fn branching(id: &str, content: &str, choices: Vec<Choice>) -> Self {
        Self {
            id: id.to_owned(),
            content: content.to_owned(),
            speaker: None,
            image_ref: None,
            is_ending: false,
            ending_type: None,
            choices,
        }
    }

    /// Creates an ending node classified as `ending_type`.
    #[must_use]
    pub fn ending(id: &str, content: &str, ending_type: EndingType) -> Self {
        Self {
            id: id.to_owned(),
            content: content.to_owned(),
            speaker: None,
            image_ref: None,
            is_ending: true,
            ending_type: Some(ending_type.as_str().to_owned()),
            choices: Vec::new(),
        }
    }

    /// Sets the speaker of this node.
    #[must_use]
    pub fn with_speaker(mut self, speaker: &str) -> Self {
        self.speaker = Some(speaker.to_owned());
        self
    }
}

impl Choice {
    /// Creates a choice leading to `next_node_id`.
    #[must_use]
    pub fn new(text: &str, next_node_id: &str, points: i32) -> Self {
        Self {
            text: text.to_owned(),
            next_node_id: next_node_id.to_owned(),
            points,
        }
    }
}

/// An authored story graph. Nodes are keyed by id, which makes ids unique and
/// keeps iteration order stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryDefinition {
    /// Story identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Catalog category.
    pub category: String,
    /// Lesson the story teaches.
    pub moral: String,
    /// Id of the node a session starts on.
    pub starting_node_id: String,
    /// All nodes keyed by node id.
    pub nodes: BTreeMap<String, StoryNode>,
}

impl StoryDefinition {
    /// Creates an empty definition starting at `starting_node_id`.
    #[must_use]
    pub fn new(id: &str, title: &str, starting_node_id: &str) -> Self {
        Self {
            id: id.to_owned(),
            title: title.to_owned(),
            category: String::new(),
            moral: String::new(),
            starting_node_id: starting_node_id.to_owned(),
            nodes: BTreeMap::new(),
        }
    }

    /// Adds a node keyed by its own id, replacing any node with the same id.
    #[must_use]
    pub fn with_node(mut self, node: StoryNode) -> Self {
        self.nodes.insert(node.id.clone(), node);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ending_type_parses_case_insensitively() {
        assert_eq!("Excellent".parse::<EndingType>(), Ok(EndingType::Excellent));
        assert_eq!(" good ".parse::<EndingType>(), Ok(EndingType::Good));
        assert_eq!("BAD".parse::<EndingType>(), Ok(EndingType::Bad));
    }

    #[test]
    fn test_ending_type_rejects_unknown_value() {
        let err = "amazing".parse::<EndingType>().unwrap_err();
        assert_eq!(err, UnknownEndingType("amazing".to_owned()));
    }

    #[test]
    fn test_ending_type_serializes_lowercase() {
        let json = serde_json::to_string(&EndingType::Great).unwrap();
        assert_eq!(json, "\"great\"");
    }

    #[test]
    fn test_with_node_keys_by_node_id() {
        let def = StoryDefinition::new("s", "S", "a")
            .with_node(StoryNode::ending("a", "The end.", EndingType::Good));
        assert!(def.nodes.contains_key("a"));
        assert_eq!(def.nodes["a"].ending_type.as_deref(), Some("good"));
    }
}
