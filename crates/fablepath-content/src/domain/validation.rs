//! Structural validation of a story graph.
//!
//! Fatal errors block publication and session creation. Warnings are
//! authoring-quality hints and never block anything.

use std::collections::{BTreeSet, VecDeque};
use std::fmt;

use serde::Serialize;

use super::story::{EndingType, StoryDefinition};

/// Why an ending node is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidEndingReason {
    /// The ending node offers choices.
    HasChoices,
    /// The ending node has no ending type.
    MissingEndingType,
    /// The ending type is not one of the recognized values.
    UnrecognizedEndingType(String),
}

/// A structural defect that makes a story unplayable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FatalError {
    /// The starting node id does not name a node.
    MissingStartNode { starting_node_id: String },
    /// A node keyed under one id declares another.
    NodeIdMismatch { key: String, node_id: String },
    /// An ending node is malformed.
    InvalidEndingNode {
        node_id: String,
        reason: InvalidEndingReason,
    },
    /// A branching node has no choices.
    DeadEndNode { node_id: String },
    /// A choice points at a node that does not exist.
    DanglingChoiceReference {
        node_id: String,
        choice_index: usize,
        target: String,
    },
    /// No ending node can be reached from the start node.
    NoTerminalReachable,
}

/// A non-fatal authoring issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// The node can never be visited from the start node.
    UnreachableNode { node_id: String },
    /// A branching node carries an ending type, which is ignored.
    EndingTypeOnBranchingNode { node_id: String },
}

impl fmt::Display for FatalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingStartNode { starting_node_id } => {
                write!(f, "starting node {starting_node_id:?} does not exist")
            }
            Self::NodeIdMismatch { key, node_id } => {
                write!(f, "node keyed {key:?} declares id {node_id:?}")
            }
            Self::InvalidEndingNode { node_id, reason } => match reason {
                InvalidEndingReason::HasChoices => {
                    write!(f, "ending node {node_id:?} must not offer choices")
                }
                InvalidEndingReason::MissingEndingType => {
                    write!(f, "ending node {node_id:?} has no ending type")
                }
                InvalidEndingReason::UnrecognizedEndingType(value) => {
                    write!(f, "ending node {node_id:?} has unrecognized ending type {value:?}")
                }
            },
            Self::DeadEndNode { node_id } => {
                write!(f, "node {node_id:?} is not an ending but offers no choices")
            }
            Self::DanglingChoiceReference {
                node_id,
                choice_index,
                target,
            } => write!(
                f,
                "choice {choice_index} of node {node_id:?} points at missing node {target:?}"
            ),
            Self::NoTerminalReachable => {
                f.write_str("no ending node is reachable from the starting node")
            }
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnreachableNode { node_id } => {
                write!(f, "node {node_id:?} is unreachable from the starting node")
            }
            Self::EndingTypeOnBranchingNode { node_id } => {
                write!(f, "branching node {node_id:?} has an ending type; it is ignored")
            }
        }
    }
}

/// Outcome of validating a story definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Defects that block publication.
    pub errors: Vec<FatalError>,
    /// Advisory issues.
    pub warnings: Vec<Warning>,
}

impl ValidationReport {
    /// Returns `true` when the story has no fatal errors.
    #[must_use]
    pub fn is_publishable(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validates the structure of a story graph.
#[must_use]
pub fn validate(definition: &StoryDefinition) -> ValidationReport {
    let mut report = ValidationReport::default();

    for (key, node) in &definition.nodes {
        if *key != node.id {
            report.errors.push(FatalError::NodeIdMismatch {
                key: key.clone(),
                node_id: node.id.clone(),
            });
        }

        if node.is_ending {
            if !node.choices.is_empty() {
                report.errors.push(FatalError::InvalidEndingNode {
                    node_id: key.clone(),
                    reason: InvalidEndingReason::HasChoices,
                });
            }
            match node.ending_type.as_deref() {
                None => report.errors.push(FatalError::InvalidEndingNode {
                    node_id: key.clone(),
                    reason: InvalidEndingReason::MissingEndingType,
                }),
                Some(value) => {
                    if value.parse::<EndingType>().is_err() {
                        report.errors.push(FatalError::InvalidEndingNode {
                            node_id: key.clone(),
                            reason: InvalidEndingReason::UnrecognizedEndingType(value.to_owned()),
                        });
                    }
                }
            }
        } else {
            if node.choices.is_empty() {
                report
                    .errors
                    .push(FatalError::DeadEndNode { node_id: key.clone() });
            }
            if node.ending_type.is_some() {
                report
                    .warnings
                    .push(Warning::EndingTypeOnBranchingNode { node_id: key.clone() });
            }
        }

        for (choice_index, choice) in node.choices.iter().enumerate() {
            if !definition.nodes.contains_key(&choice.next_node_id) {
                report.errors.push(FatalError::DanglingChoiceReference {
                    node_id: key.clone(),
                    choice_index,
                    target: choice.next_node_id.clone(),
                });
            }
        }
    }

    if !definition.nodes.contains_key(&definition.starting_node_id) {
        report.errors.push(FatalError::MissingStartNode {
            starting_node_id: definition.starting_node_id.clone(),
        });
        return report;
    }

    let reachable = reachable_from_start(definition);

    if !reachable
        .iter()
        .any(|id| definition.nodes.get(*id).is_some_and(|node| node.is_ending))
    {
        report.errors.push(FatalError::NoTerminalReachable);
    }

    for key in definition.nodes.keys() {
        if !reachable.contains(key.as_str()) {
            report
                .warnings
                .push(Warning::UnreachableNode { node_id: key.clone() });
        }
    }

    report
}

/// Breadth-first walk from the start node over edges that resolve.
fn reachable_from_start(definition: &StoryDefinition) -> BTreeSet<&str> {
    let mut visited = BTreeSet::new();
    let mut queue = VecDeque::new();

    visited.insert(definition.starting_node_id.as_str());
    queue.push_back(definition.starting_node_id.as_str());

    while let Some(id) = queue.pop_front() {
        let Some(node) = definition.nodes.get(id) else {
            continue;
        };
        for choice in &node.choices {
            let target = choice.next_node_id.as_str();
            if definition.nodes.contains_key(target) && visited.insert(target) {
                queue.push_back(target);
            }
        }
    }

    visited
}
