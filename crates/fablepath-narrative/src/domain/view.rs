//! Read-only views of the node a session is on.

use fablepath_content::domain::published::{CompiledNode, NodeKind};
use fablepath_content::domain::story::EndingType;
use serde::Serialize;

/// A choice as presented to the player. Point values stay hidden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceView<'a> {
    /// Index to pass to `choose`.
    pub index: usize,
    /// Text shown to the player.
    pub text: &'a str,
}

/// What the player can do at the current node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeViewKind<'a> {
    /// The node offers choices.
    Choices {
        choices: Vec<ChoiceView<'a>>,
    },
    /// The node ends the story.
    Ending { ending_type: EndingType },
}

/// Read-only view of a story node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeView<'a> {
    /// Authored node id.
    pub node_id: &'a str,
    /// Narrative text.
    pub content: &'a str,
    /// Character speaking, if any.
    pub speaker: Option<&'a str>,
    /// Illustration reference, if any.
    pub image_ref: Option<&'a str>,
    /// Choices on offer, or the ending reached.
    pub kind: NodeViewKind<'a>,
}

impl<'a> NodeView<'a> {
    /// Builds the view of a compiled node.
    #[must_use]
    pub fn of(node: &'a CompiledNode) -> Self {
        let kind = match &node.kind {
            NodeKind::Branching { choices } => NodeViewKind::Choices {
                choices: choices
                    .iter()
                    .enumerate()
                    .map(|(index, choice)| ChoiceView {
                        index,
                        text: &choice.text,
                    })
                    .collect(),
            },
            NodeKind::Ending { ending_type } => NodeViewKind::Ending {
                ending_type: *ending_type,
            },
        };

        Self {
            node_id: &node.id,
            content: &node.content,
            speaker: node.speaker.as_deref(),
            image_ref: node.image_ref.as_deref(),
            kind,
        }
    }
}
