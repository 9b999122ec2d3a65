//! Outbound ports to the collaborators that act on a finished session.

use async_trait::async_trait;
use fablepath_core::error::DomainError;
use fablepath_narrative::domain::aggregates::OutcomeSummary;
use uuid::Uuid;

use super::rewards::RewardDescriptor;

/// Persists the path and outcome of a finished session.
#[async_trait]
pub trait SessionRecorder: Send + Sync {
    /// Saves a finished session.
    async fn save(&self, summary: &OutcomeSummary) -> Result<(), DomainError>;
}

/// Credits a player with what a finished session earned.
#[async_trait]
pub trait PointsAwarder: Send + Sync {
    /// Awards `reward` to `player_id`.
    async fn award(&self, player_id: Uuid, reward: &RewardDescriptor) -> Result<(), DomainError>;
}
