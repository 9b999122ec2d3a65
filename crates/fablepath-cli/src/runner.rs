//! The `validate` and `play` subcommands, independent of argument parsing.

use std::path::Path;

use fablepath_content::application::command_handlers::handle_publish_story;
use fablepath_content::domain::authoring::{PayloadFormat, StoryPayload};
use fablepath_content::domain::commands::PublishStory;
use fablepath_content::domain::repository::InMemoryStoryStore;
use fablepath_content::domain::story::StoryDefinition;
use fablepath_content::domain::validation::{ValidationReport, Warning, validate};
use fablepath_core::aggregate::AggregateRoot;
use fablepath_core::clock::Clock;
use fablepath_core::event::DomainEvent;
use fablepath_narrative::application::command_handlers::handle_start_session;
use fablepath_narrative::domain::commands::StartSession;
use fablepath_progress::application::command_handlers::{
    Settlement, handle_play_choice, settle_completion,
};
use fablepath_progress::domain::commands::PlayChoice;
use fablepath_progress::domain::ports::{PointsAwarder, SessionRecorder};
use fablepath_progress::domain::rewards::RewardPolicy;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::AppError;

/// A story document loaded from disk.
#[derive(Debug, Clone)]
pub struct StoryFile {
    pub source: String,
    pub format: PayloadFormat,
}

impl StoryFile {
    /// Reads `path`, picking the payload format from its extension.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the file cannot be read.
    pub async fn read(path: &Path) -> Result<Self, AppError> {
        let source = tokio::fs::read_to_string(path).await?;
        let format = PayloadFormat::from_extension(path.extension().and_then(|ext| ext.to_str()));
        debug!(path = %path.display(), ?format, bytes = source.len(), "story file read");
        Ok(Self { source, format })
    }
}

/// Parses and validates a story document without publishing it.
///
/// # Errors
///
/// Returns `AppError::Domain` if the document is malformed or repeats a node
/// id. Structural defects are reported in the returned report instead.
pub fn validate_story(file: &StoryFile) -> Result<ValidationReport, AppError> {
    let payload = StoryPayload::parse(&file.source, file.format)?;
    let definition = StoryDefinition::try_from(payload)?;
    let report = validate(&definition);

    info!(
        story_id = %definition.id,
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "story validated"
    );
    Ok(report)
}

/// One played choice and the node it led to.
#[derive(Debug, Clone, Serialize)]
pub struct PlayedStep {
    pub choice_index: usize,
    /// Node the choice was taken on.
    pub from_node_id: String,
    pub points_awarded: i32,
    /// View of the node the choice led to.
    pub node: Value,
}

/// One entry of the session's event log.
#[derive(Debug, Clone, Serialize)]
pub struct RecordedEvent {
    pub sequence_number: i64,
    pub event_type: String,
    pub payload: Value,
}

/// Everything a `play` run produced.
#[derive(Debug, Clone, Serialize)]
pub struct PlayReport {
    pub session_id: Uuid,
    pub player_id: Uuid,
    pub story_id: String,
    pub story_version: String,
    /// Advisory warnings raised while publishing.
    pub warnings: Vec<Warning>,
    /// View of the starting node.
    pub start: Value,
    pub steps: Vec<PlayedStep>,
    /// Choices left unplayed because the session had already ended.
    pub ignored_choices: Vec<usize>,
    pub completed: bool,
    pub accumulated_score: i64,
    /// Present once the session reached an ending.
    pub settlement: Option<Settlement>,
    /// Events drained from the session, oldest first.
    pub events: Vec<RecordedEvent>,
}

/// Side-effect adapters a `play` run hands finished sessions to.
pub struct Collaborators<'a> {
    pub clock: &'a dyn Clock,
    pub policy: &'a RewardPolicy,
    pub recorder: &'a dyn SessionRecorder,
    pub awarder: &'a dyn PointsAwarder,
}

/// Publishes a story document and plays `choices` against it.
///
/// A session whose starting node is an ending is settled before any choice
/// is played. Choices after the session ends are not played; they are
/// returned in `ignored_choices` next to the settlement.
///
/// # Errors
///
/// Returns `AppError::Publish` if the story cannot be published and
/// `AppError::Session` if a choice is out of range. A settled session never
/// yields an error.
pub async fn play_story(
    file: &StoryFile,
    choices: &[usize],
    player_id: Uuid,
    deps: &Collaborators<'_>,
) -> Result<PlayReport, AppError> {
    let store = InMemoryStoryStore::new();
    let published = handle_publish_story(
        &PublishStory {
            correlation_id: Uuid::new_v4(),
            source: file.source.clone(),
            format: file.format,
        },
        &store,
    )
    .await?;

    let mut session = handle_start_session(
        &StartSession {
            correlation_id: Uuid::new_v4(),
            story_id: published.story.id().to_owned(),
        },
        &store,
        deps.clock,
    )
    .await?;
    let start = serde_json::to_value(session.current_node())?;

    let mut settlement = settle_completion(
        &mut session,
        player_id,
        deps.policy,
        deps.recorder,
        deps.awarder,
    )
    .await;

    let mut steps = Vec::with_capacity(choices.len());
    let mut ignored_choices = Vec::new();
    for (position, &choice_index) in choices.iter().enumerate() {
        if session.is_terminated() {
            ignored_choices = choices[position..].to_vec();
            warn!(
                session_id = %session.id(),
                ignored = ignored_choices.len(),
                "choices given after the session ended were not played"
            );
            break;
        }
        let command = PlayChoice {
            correlation_id: Uuid::new_v4(),
            player_id,
            choice_index,
        };
        let result = handle_play_choice(
            &command,
            &mut session,
            deps.clock,
            deps.policy,
            deps.recorder,
            deps.awarder,
        )
        .await?;

        steps.push(PlayedStep {
            choice_index,
            from_node_id: result.transition.step.node_id,
            points_awarded: result.transition.step.points_awarded,
            node: serde_json::to_value(session.current_node())?,
        });
        if result.settlement.is_some() {
            settlement = result.settlement;
        }
    }

    let events = session
        .take_uncommitted_events()
        .iter()
        .map(|event| RecordedEvent {
            sequence_number: event.metadata().sequence_number,
            event_type: event.event_type().to_owned(),
            payload: event.to_payload(),
        })
        .collect();

    Ok(PlayReport {
        session_id: session.id(),
        player_id,
        story_id: published.story.id().to_owned(),
        story_version: published.story.version_hash().to_owned(),
        warnings: published.warnings,
        start,
        steps,
        ignored_choices,
        completed: session.is_terminated(),
        accumulated_score: session.accumulated_score(),
        settlement,
        events,
    })
}
