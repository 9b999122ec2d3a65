//! Published stories: the validated, immutable arena sessions play against.
//!
//! Every choice target is resolved to a [`NodeIndex`] at publish time, so a
//! published story cannot contain a dangling reference.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::story::{EndingType, StoryDefinition};
use super::validation::{FatalError, InvalidEndingReason, ValidationReport, Warning, validate};

/// Position of a node inside a [`PublishedStory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeIndex(usize);

impl NodeIndex {
    /// Arena position of the node.
    #[must_use]
    pub fn get(self) -> usize {
        self.0
    }
}

/// A choice whose target has been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledChoice {
    /// Text shown to the player.
    pub text: String,
    /// Node the choice leads to.
    pub next: NodeIndex,
    /// Points added to the session score when taken.
    pub points: i32,
}

/// Whether a node branches or ends the story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Offers at least one choice, in authored order.
    Branching { choices: Vec<CompiledChoice> },
    /// Terminates the story.
    Ending { ending_type: EndingType },
}

/// A validated node stored in the arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledNode {
    /// Authored node id.
    pub id: String,
    /// Narrative text.
    pub content: String,
    /// Character speaking the content, if any.
    pub speaker: Option<String>,
    /// Illustration reference, if any.
    pub image_ref: Option<String>,
    /// Branching or ending.
    pub kind: NodeKind,
}

impl CompiledNode {
    /// Returns the ending type if this is an ending node.
    #[must_use]
    pub fn ending_type(&self) -> Option<EndingType> {
        match self.kind {
            NodeKind::Ending { ending_type } => Some(ending_type),
            NodeKind::Branching { .. } => None,
        }
    }

    /// Returns the choices of a branching node, empty for endings.
    #[must_use]
    pub fn choices(&self) -> &[CompiledChoice] {
        match &self.kind {
            NodeKind::Branching { choices } => choices,
            NodeKind::Ending { .. } => &[],
        }
    }
}

/// Returned when a definition cannot be published.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("story {story_id:?} has {} fatal validation error(s)", .report.errors.len())]
pub struct PublishRejected {
    /// The rejected story.
    pub story_id: String,
    /// The full validation report, including warnings.
    pub report: ValidationReport,
}

impl PublishRejected {
    /// The fatal errors that caused the rejection.
    #[must_use]
    pub fn errors(&self) -> &[FatalError] {
        &self.report.errors
    }
}

/// A validated story in arena form. Immutable; share it through `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedStory {
    id: String,
    title: String,
    category: String,
    moral: String,
    version_hash: String,
    start: NodeIndex,
    nodes: Vec<CompiledNode>,
    index: HashMap<String, NodeIndex>,
}

impl PublishedStory {
    /// Validates and compiles a definition.
    ///
    /// On success the validation warnings are returned alongside the story.
    ///
    /// # Errors
    ///
    /// Returns `PublishRejected` if validation reports any fatal error.
    pub fn publish(definition: &StoryDefinition) -> Result<(Self, Vec<Warning>), PublishRejected> {
        let report = validate(definition);
        if !report.is_publishable() {
            return Err(PublishRejected {
                story_id: definition.id.clone(),
                report,
            });
        }

        let index: HashMap<String, NodeIndex> = definition
            .nodes
            .keys()
            .enumerate()
            .map(|(position, id)| (id.clone(), NodeIndex(position)))
            .collect();

        // Validation guarantees the lookups below succeed.
        let rejected = |error: FatalError| PublishRejected {
            story_id: definition.id.clone(),
            report: ValidationReport {
                errors: vec![error],
                warnings: Vec::new(),
            },
        };

        let mut nodes = Vec::with_capacity(definition.nodes.len());
        for (id, node) in &definition.nodes {
            let kind = if node.is_ending {
                let ending_type = node
                    .ending_type
                    .as_deref()
                    .and_then(|value| value.parse::<EndingType>().ok())
                    .ok_or_else(|| {
                        rejected(FatalError::InvalidEndingNode {
                            node_id: id.clone(),
                            reason: InvalidEndingReason::MissingEndingType,
                        })
                    })?;
                NodeKind::Ending { ending_type }
            } else {
                let mut choices = Vec::with_capacity(node.choices.len());
                for (choice_index, choice) in node.choices.iter().enumerate() {
                    let next = *index.get(&choice.next_node_id).ok_or_else(|| {
                        rejected(FatalError::DanglingChoiceReference {
                            node_id: id.clone(),
                            choice_index,
                            target: choice.next_node_id.clone(),
                        })
                    })?;
                    choices.push(CompiledChoice {
                        text: choice.text.clone(),
                        next,
                        points: choice.points,
                    });
                }
                NodeKind::Branching { choices }
            };

            nodes.push(CompiledNode {
                id: id.clone(),
                content: node.content.clone(),
                speaker: node.speaker.clone(),
                image_ref: node.image_ref.clone(),
                kind,
            });
        }

        let start = *index.get(&definition.starting_node_id).ok_or_else(|| {
            rejected(FatalError::MissingStartNode {
                starting_node_id: definition.starting_node_id.clone(),
            })
        })?;

        let story = Self {
            id: definition.id.clone(),
            title: definition.title.clone(),
            category: definition.category.clone(),
            moral: definition.moral.clone(),
            version_hash: version_hash(definition),
            start,
            nodes,
            index,
        };

        Ok((story, report.warnings))
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn moral(&self) -> &str {
        &self.moral
    }

    /// SHA-256 of the canonical JSON form of the definition this story was
    /// published from.
    #[must_use]
    pub fn version_hash(&self) -> &str {
        &self.version_hash
    }

    /// Index of the starting node.
    #[must_use]
    pub fn start(&self) -> NodeIndex {
        self.start
    }

    /// Returns the node at `index`.
    ///
    /// Indices handed out by this story are always in bounds; an index from
    /// another story may not be.
    #[must_use]
    pub fn node(&self, index: NodeIndex) -> Option<&CompiledNode> {
        self.nodes.get(index.0)
    }

    /// Looks up a node index by node id.
    #[must_use]
    pub fn index_of(&self, node_id: &str) -> Option<NodeIndex> {
        self.index.get(node_id).copied()
    }

    /// Number of nodes in the story.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterates nodes in arena order.
    pub fn nodes(&self) -> impl Iterator<Item = &CompiledNode> {
        self.nodes.iter()
    }
}

impl std::ops::Index<NodeIndex> for PublishedStory {
    type Output = CompiledNode;

    /// Panics on an index that did not come from this story.
    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index.0]
    }
}

fn version_hash(definition: &StoryDefinition) -> String {
    // Map keys are ordered, so the JSON form is canonical. Serializing a
    // string-keyed derived type to JSON is infallible.
    let canonical =
        serde_json::to_vec(definition).expect("StoryDefinition serialization is infallible");
    format!("{:x}", Sha256::digest(&canonical))
}
