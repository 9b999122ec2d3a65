//! Command handlers for the Session & Progress context.
//!
//! The outcome and reward are computed before any side effect runs, and side
//! effect failures are reported as warnings next to them. Nothing here can
//! change a value `outcome()` already returned.

use fablepath_core::clock::Clock;
use fablepath_core::command::Command;
use fablepath_narrative::domain::aggregates::{
    OutcomeSummary, PlayerSession, SessionOutcome, Transition,
};
use fablepath_narrative::domain::errors::SessionError;
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::commands::PlayChoice;
use crate::domain::ports::{PointsAwarder, SessionRecorder};
use crate::domain::rewards::{RewardDescriptor, RewardPolicy};

/// A side effect that failed during settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SettlementWarning {
    /// The session recorder could not save the session.
    RecordingFailed { message: String },
    /// The points awarder could not credit the player.
    AwardFailed { message: String },
}

/// Result of settling a finished session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settlement {
    /// Score and ending of the session.
    pub outcome: SessionOutcome,
    /// Summary handed to the recorder.
    pub summary: OutcomeSummary,
    /// Reward handed to the awarder.
    pub reward: RewardDescriptor,
    /// Side effects that failed. Empty when everything went through.
    pub warnings: Vec<SettlementWarning>,
}

/// Result of a played choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayResult {
    /// What the choice did to the session.
    pub transition: Transition,
    /// Present only for the choice that completed the session.
    pub settlement: Option<Settlement>,
}

/// Settles a completed session exactly once.
///
/// Returns `None` if the session is still running or was already settled.
/// Recorder and awarder failures are logged and returned as warnings.
#[instrument(skip_all, fields(session_id = %session.id(), player_id = %player_id))]
pub async fn settle_completion(
    session: &mut PlayerSession,
    player_id: Uuid,
    policy: &RewardPolicy,
    recorder: &dyn SessionRecorder,
    awarder: &dyn PointsAwarder,
) -> Option<Settlement> {
    let summary = session.take_completion()?;
    let outcome = SessionOutcome {
        accumulated_score: summary.accumulated_score,
        final_ending_type: summary.ending_type,
    };
    let reward = policy.classify(summary.ending_type, summary.accumulated_score);

    let mut warnings = Vec::new();

    if let Err(err) = recorder.save(&summary).await {
        warn!(error = %err, "session recording failed");
        warnings.push(SettlementWarning::RecordingFailed {
            message: err.to_string(),
        });
    }

    if let Err(err) = awarder.award(player_id, &reward).await {
        warn!(error = %err, "points award failed");
        warnings.push(SettlementWarning::AwardFailed {
            message: err.to_string(),
        });
    }

    info!(
        score = outcome.accumulated_score,
        ending = %outcome.final_ending_type,
        total_points = reward.total_points,
        badge = ?reward.badge,
        failed_side_effects = warnings.len(),
        "session settled"
    );

    Some(Settlement {
        outcome,
        summary,
        reward,
        warnings,
    })
}

/// Handles the `PlayChoice` command: applies the choice and, if it ends the
/// session, settles it.
///
/// # Errors
///
/// Returns the `SessionError` from `choose`; nothing is settled in that case.
#[instrument(skip_all, fields(session_id = %session.id(), correlation_id = %command.correlation_id()))]
pub async fn handle_play_choice(
    command: &PlayChoice,
    session: &mut PlayerSession,
    clock: &dyn Clock,
    policy: &RewardPolicy,
    recorder: &dyn SessionRecorder,
    awarder: &dyn PointsAwarder,
) -> Result<PlayResult, SessionError> {
    let transition = session.choose(command.choice_index, command.correlation_id, clock)?;

    let settlement = if transition.completed {
        settle_completion(session, command.player_id, policy, recorder, awarder).await
    } else {
        None
    };

    Ok(PlayResult {
        transition,
        settlement,
    })
}
