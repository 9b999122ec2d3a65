//! Aggregate root for the Narrative Playback context.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use fablepath_content::domain::published::{NodeIndex, PublishedStory};
use fablepath_content::domain::story::{EndingType, StoryDefinition};
use fablepath_core::aggregate::AggregateRoot;
use fablepath_core::clock::Clock;
use fablepath_core::event::EventMetadata;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::SessionError;
use super::events::{
    ChoiceMade, SessionCompleted, SessionEvent, SessionEventKind, SessionStarted,
};
use super::view::NodeView;

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// The session is on a branching node.
    InProgress,
    /// The session has reached an ending.
    Completed,
}

/// One applied choice in a session's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    /// Node the choice was taken on.
    pub node_id: String,
    /// Index of the choice within that node.
    pub choice_index: usize,
    /// Points the choice carried.
    pub points_awarded: i32,
}

/// What a successful `choose` applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The step appended to the path.
    pub step: PathStep,
    /// Node the session moved to.
    pub node_id: String,
    /// Whether the move ended the session.
    pub completed: bool,
}

/// Score and ending of a terminated session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOutcome {
    /// Sum of the points of every choice taken.
    pub accumulated_score: i64,
    /// Classification of the ending reached.
    pub final_ending_type: EndingType,
}

/// Everything the session recorder needs about a finished session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeSummary {
    /// The session identifier.
    pub session_id: Uuid,
    /// The story that was played.
    pub story_id: String,
    /// Version hash of the published story.
    pub story_version: String,
    /// Every choice taken, in order.
    pub path: Vec<PathStep>,
    /// Final score.
    pub accumulated_score: i64,
    /// Classification of the ending reached.
    pub ending_type: EndingType,
    /// Timestamp of the completion event.
    pub completed_at: DateTime<Utc>,
}

/// One player's traversal of a published story.
///
/// The story is shared read-only; the session owns only its position, score
/// and append-only history.
///
/// Every event is queued in the uncommitted log until the caller drains it
/// with [`AggregateRoot::take_uncommitted_events`]. The session never drains
/// it itself.
#[derive(Debug)]
pub struct PlayerSession {
    /// Aggregate identifier.
    id: Uuid,
    story: Arc<PublishedStory>,
    /// Current version (event count).
    version: i64,
    current: NodeIndex,
    path: Vec<PathStep>,
    accumulated_score: i64,
    status: SessionStatus,
    final_ending_type: Option<EndingType>,
    completed_at: Option<DateTime<Utc>>,
    completion_taken: bool,
    /// Uncommitted events pending persistence.
    uncommitted_events: Vec<SessionEvent>,
}

impl PlayerSession {
    /// Opens a session on the story's starting node.
    ///
    /// A story whose starting node is itself an ending produces a session
    /// that is already completed with a score of zero.
    #[must_use]
    pub fn start(story: Arc<PublishedStory>, correlation_id: Uuid, clock: &dyn Clock) -> Self {
        let start = story.start();
        let mut session = Self {
            id: Uuid::new_v4(),
            current: start,
            story: Arc::clone(&story),
            version: 0,
            path: Vec::new(),
            accumulated_score: 0,
            status: SessionStatus::InProgress,
            final_ending_type: None,
            completed_at: None,
            completion_taken: false,
            uncommitted_events: Vec::new(),
        };

        let start_node = &story[start];
        session.record(
            SessionEventKind::SessionStarted(SessionStarted {
                session_id: session.id,
                story_id: story.id().to_owned(),
                story_version: story.version_hash().to_owned(),
                start,
                start_node_id: start_node.id.clone(),
            }),
            correlation_id,
            clock,
        );

        if let Some(ending_type) = start_node.ending_type() {
            session.record(
                SessionEventKind::SessionCompleted(SessionCompleted {
                    session_id: session.id,
                    ending_type,
                    final_score: 0,
                }),
                correlation_id,
                clock,
            );
        }

        session
    }

    /// Validates and publishes `definition`, then opens a session on it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ValidationFailed` if the definition has fatal
    /// structural errors.
    pub fn start_from_definition(
        definition: &StoryDefinition,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<Self, SessionError> {
        let (story, _warnings) =
            PublishedStory::publish(definition).map_err(|rejected| SessionError::ValidationFailed {
                story_id: rejected.story_id,
                errors: rejected.report.errors,
            })?;
        Ok(Self::start(Arc::new(story), correlation_id, clock))
    }

    /// Takes choice `choice_index` of the current node.
    ///
    /// All checks run before any state changes, so a failed call leaves the
    /// session exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SessionAlreadyTerminated` on a completed session
    /// and `SessionError::InvalidChoiceIndex` when the index is out of range.
    pub fn choose(
        &mut self,
        choice_index: usize,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<Transition, SessionError> {
        if self.status == SessionStatus::Completed {
            return Err(SessionError::SessionAlreadyTerminated {
                session_id: self.id,
            });
        }

        let story = Arc::clone(&self.story);
        let node = &story[self.current];
        let choices = node.choices();
        let Some(choice) = choices.get(choice_index) else {
            return Err(SessionError::InvalidChoiceIndex {
                index: choice_index,
                available: choices.len(),
            });
        };
        let next_node = &story[choice.next];

        self.record(
            SessionEventKind::ChoiceMade(ChoiceMade {
                session_id: self.id,
                node_id: node.id.clone(),
                choice_index,
                points_awarded: choice.points,
                next: choice.next,
                next_node_id: next_node.id.clone(),
            }),
            correlation_id,
            clock,
        );

        let completed = if let Some(ending_type) = next_node.ending_type() {
            self.record(
                SessionEventKind::SessionCompleted(SessionCompleted {
                    session_id: self.id,
                    ending_type,
                    final_score: self.accumulated_score,
                }),
                correlation_id,
                clock,
            );
            true
        } else {
            false
        };

        Ok(Transition {
            step: PathStep {
                node_id: node.id.clone(),
                choice_index,
                points_awarded: choice.points,
            },
            node_id: next_node.id.clone(),
            completed,
        })
    }

    /// Read-only view of the node the session is on.
    #[must_use]
    pub fn current_node(&self) -> NodeView<'_> {
        NodeView::of(&self.story[self.current])
    }

    /// Returns `true` once an ending has been reached.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.status == SessionStatus::Completed
    }

    /// Score and ending of a terminated session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SessionNotTerminated` while the session is still
    /// in progress.
    pub fn outcome(&self) -> Result<SessionOutcome, SessionError> {
        match (self.status, self.final_ending_type) {
            (SessionStatus::Completed, Some(final_ending_type)) => Ok(SessionOutcome {
                accumulated_score: self.accumulated_score,
                final_ending_type,
            }),
            _ => Err(SessionError::SessionNotTerminated {
                session_id: self.id,
            }),
        }
    }

    /// Hands out the completion summary exactly once.
    ///
    /// Returns `None` while the session is running and on every call after
    /// the first one that returned `Some`.
    pub fn take_completion(&mut self) -> Option<OutcomeSummary> {
        if self.completion_taken {
            return None;
        }
        let outcome = self.outcome().ok()?;
        let completed_at = self.completed_at?;
        self.completion_taken = true;
        Some(OutcomeSummary {
            session_id: self.id,
            story_id: self.story.id().to_owned(),
            story_version: self.story.version_hash().to_owned(),
            path: self.path.clone(),
            accumulated_score: outcome.accumulated_score,
            ending_type: outcome.final_ending_type,
            completed_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The story this session plays.
    #[must_use]
    pub fn story(&self) -> &Arc<PublishedStory> {
        &self.story
    }

    /// Id of the node the session is on.
    #[must_use]
    pub fn current_node_id(&self) -> &str {
        &self.story[self.current].id
    }

    /// Choices taken so far, oldest first.
    #[must_use]
    pub fn path(&self) -> &[PathStep] {
        &self.path
    }

    #[must_use]
    pub fn accumulated_score(&self) -> i64 {
        self.accumulated_score
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Set only once the session is completed.
    #[must_use]
    pub fn final_ending_type(&self) -> Option<EndingType> {
        self.final_ending_type
    }

    /// Builds an event, applies it and queues it for persistence.
    fn record(&mut self, kind: SessionEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        let metadata = EventMetadata::caused_by_command(
            kind.event_type(),
            self.id,
            self.version + 1,
            correlation_id,
            clock,
        );
        let event = SessionEvent { metadata, kind };
        self.apply(&event);
        self.uncommitted_events.push(event);
    }
}

impl AggregateRoot for PlayerSession {
    type Event = SessionEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            SessionEventKind::SessionStarted(payload) => {
                self.current = payload.start;
                self.status = SessionStatus::InProgress;
            }
            SessionEventKind::ChoiceMade(payload) => {
                self.path.push(PathStep {
                    node_id: payload.node_id.clone(),
                    choice_index: payload.choice_index,
                    points_awarded: payload.points_awarded,
                });
                self.accumulated_score = self
                    .accumulated_score
                    .saturating_add(i64::from(payload.points_awarded));
                self.current = payload.next;
            }
            SessionEventKind::SessionCompleted(payload) => {
                self.status = SessionStatus::Completed;
                self.final_ending_type = Some(payload.ending_type);
                self.completed_at = Some(event.metadata.occurred_at);
            }
        }
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn take_uncommitted_events(&mut self) -> Vec<Self::Event> {
        std::mem::take(&mut self.uncommitted_events)
    }
}
