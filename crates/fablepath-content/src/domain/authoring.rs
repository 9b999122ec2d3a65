//! Authoring payload: the nested record shape stories arrive in.
//!
//! Nodes arrive as a flat list with string cross references. Conversion into
//! a [`StoryDefinition`] keys them by id and rejects duplicates; everything
//! else structural is left to the validator.

use std::collections::BTreeMap;

use fablepath_core::error::DomainError;
use serde::{Deserialize, Serialize};

use super::story::{Choice, StoryDefinition, StoryNode};

/// Serialization formats accepted for authoring payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    /// JSON document.
    Json,
    /// YAML document.
    Yaml,
}

impl PayloadFormat {
    /// Picks a format from a file extension. Anything that is not
    /// `yaml`/`yml` is treated as JSON.
    #[must_use]
    pub fn from_extension(extension: Option<&str>) -> Self {
        match extension.map(str::to_ascii_lowercase).as_deref() {
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// A choice as authored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoicePayload {
    /// Text shown to the player.
    pub text: String,
    /// Id of the node the choice leads to.
    pub next_node: String,
    /// Points carried by the choice. Defaults to 0.
    #[serde(default)]
    pub points: i32,
}

/// A node as authored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodePayload {
    /// Node id, unique within the story.
    pub id: String,
    /// Narrative text.
    #[serde(default)]
    pub content: String,
    /// Speaking character, becomes the node's speaker.
    #[serde(default)]
    pub character: Option<String>,
    /// Illustration reference, becomes the node's image ref.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Whether the node ends the story.
    #[serde(default)]
    pub is_ending: bool,
    /// Raw ending classification. Checked by the validator, not the parser.
    #[serde(default)]
    pub ending_type: Option<String>,
    /// Choices in presentation order.
    #[serde(default)]
    pub choices: Vec<ChoicePayload>,
}

/// A whole story as authored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryPayload {
    /// Story id.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Catalogue category.
    #[serde(default)]
    pub category: String,
    /// Lesson the story teaches.
    #[serde(default)]
    pub moral: String,
    /// Id of the node play starts on.
    #[serde(rename = "startingNode")]
    pub starting_node: String,
    /// Every node of the story, in authored order.
    pub nodes: Vec<NodePayload>,
}

impl StoryPayload {
    /// Parses a payload in the given format.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the document is malformed.
    pub fn parse(source: &str, format: PayloadFormat) -> Result<Self, DomainError> {
        match format {
            PayloadFormat::Json => serde_json::from_str(source)
                .map_err(|e| DomainError::Validation(format!("malformed JSON payload: {e}"))),
            PayloadFormat::Yaml => serde_yaml::from_str(source)
                .map_err(|e| DomainError::Validation(format!("malformed YAML payload: {e}"))),
        }
    }
}

impl From<ChoicePayload> for Choice {
    fn from(choice: ChoicePayload) -> Self {
        Self {
            text: choice.text,
            next_node_id: choice.next_node,
            points: choice.points,
        }
    }
}

impl From<NodePayload> for StoryNode {
    fn from(node: NodePayload) -> Self {
        Self {
            id: node.id,
            content: node.content,
            speaker: node.character,
            image_ref: node.image_url,
            is_ending: node.is_ending,
            ending_type: node.ending_type,
            choices: node.choices.into_iter().map(Choice::from).collect(),
        }
    }
}

impl TryFrom<StoryPayload> for StoryDefinition {
    type Error = DomainError;

    fn try_from(payload: StoryPayload) -> Result<Self, Self::Error> {
        let mut nodes = BTreeMap::new();
        for node in payload.nodes {
            if nodes.contains_key(&node.id) {
                return Err(DomainError::Validation(format!(
                    "duplicate node id {:?} in story {:?}",
                    node.id, payload.id
                )));
            }
            nodes.insert(node.id.clone(), StoryNode::from(node));
        }

        Ok(Self {
            id: payload.id,
            title: payload.title,
            category: payload.category,
            moral: payload.moral,
            starting_node_id: payload.starting_node,
            nodes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_JSON: &str = r#"{
        "id": "lost-kitten",
        "title": "The Lost Kitten",
        "category": "kindness",
        "moral": "Helping others feels good.",
        "startingNode": "start",
        "nodes": [
            {
                "id": "start",
                "content": "You hear a tiny meow.",
                "character": "Narrator",
                "image_url": "img/alley.png",
                "choices": [
                    { "text": "Look around", "next_node": "found", "points": 5 },
                    { "text": "Walk away", "next_node": "gone" }
                ]
            },
            { "id": "found", "content": "You found the kitten!", "is_ending": true, "ending_type": "great" },
            { "id": "gone", "content": "The meowing fades.", "is_ending": true, "ending_type": "bad" }
        ]
    }"#;

    #[test]
    fn test_parse_json_payload_maps_authoring_fields() {
        // Arrange
        let payload = StoryPayload::parse(SAMPLE_JSON, PayloadFormat::Json).unwrap();

        // Act
        let def = StoryDefinition::try_from(payload).unwrap();

        // Assert
        assert_eq!(def.starting_node_id, "start");
        assert_eq!(def.nodes.len(), 3);
        let start = &def.nodes["start"];
        assert_eq!(start.speaker.as_deref(), Some("Narrator"));
        assert_eq!(start.image_ref.as_deref(), Some("img/alley.png"));
        assert_eq!(start.choices[0].next_node_id, "found");
        assert_eq!(start.choices[1].points, 0);
        assert!(def.nodes["gone"].is_ending);
    }

    #[test]
    fn test_parse_yaml_payload() {
        let yaml = r"
id: tiny
title: Tiny
startingNode: only
nodes:
  - id: only
    content: Done already.
    is_ending: true
    ending_type: good
";
        let payload = StoryPayload::parse(yaml, PayloadFormat::Yaml).unwrap();
        let def = StoryDefinition::try_from(payload).unwrap();
        assert_eq!(def.nodes["only"].ending_type.as_deref(), Some("good"));
        assert!(def.category.is_empty());
    }

    #[test]
    fn test_duplicate_node_ids_are_rejected() {
        // Arrange
        let payload = StoryPayload {
            id: "dupes".into(),
            title: "Dupes".into(),
            category: String::new(),
            moral: String::new(),
            starting_node: "a".into(),
            nodes: vec![
                serde_json::from_str(r#"{"id":"a","is_ending":true,"ending_type":"good"}"#)
                    .unwrap(),
                serde_json::from_str(r#"{"id":"a","is_ending":true,"ending_type":"bad"}"#)
                    .unwrap(),
            ],
        };

        // Act
        let result = StoryDefinition::try_from(payload);

        // Assert
        match result {
            Err(DomainError::Validation(msg)) => assert!(msg.contains("duplicate node id")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_json_is_a_validation_error() {
        let result = StoryPayload::parse("{ not json", PayloadFormat::Json);
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(PayloadFormat::from_extension(Some("YML")), PayloadFormat::Yaml);
        assert_eq!(PayloadFormat::from_extension(Some("json")), PayloadFormat::Json);
        assert_eq!(PayloadFormat::from_extension(None), PayloadFormat::Json);
    }
}
