//! Adapters for the Session & Progress ports used by the CLI.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fablepath_core::error::DomainError;
use fablepath_narrative::domain::aggregates::OutcomeSummary;
use fablepath_progress::domain::ports::{PointsAwarder, SessionRecorder};
use fablepath_progress::domain::rewards::RewardDescriptor;
use tokio::io::AsyncWriteExt;
use tracing::info;
use uuid::Uuid;

/// Appends each finished session as one JSON line to a file.
#[derive(Debug, Clone)]
pub struct JsonlSessionRecorder {
    path: PathBuf,
}

impl JsonlSessionRecorder {
    /// Creates a recorder writing to `path`. The file is created on first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file sessions are appended to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionRecorder for JsonlSessionRecorder {
    async fn save(&self, summary: &OutcomeSummary) -> Result<(), DomainError> {
        let mut line = serde_json::to_string(summary)
            .map_err(|e| DomainError::Infrastructure(e.to_string()))?;
        line.push('\n');

        let failed = |e: std::io::Error| {
            DomainError::PersistenceFailed(format!("{}: {e}", self.path.display()))
        };

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(failed)?;
        file.write_all(line.as_bytes()).await.map_err(failed)?;
        file.flush().await.map_err(failed)?;

        info!(
            session_id = %summary.session_id,
            path = %self.path.display(),
            "session recorded"
        );
        Ok(())
    }
}

/// Records finished sessions to the log only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSessionRecorder;

#[async_trait]
impl SessionRecorder for LogSessionRecorder {
    async fn save(&self, summary: &OutcomeSummary) -> Result<(), DomainError> {
        info!(
            session_id = %summary.session_id,
            story_id = %summary.story_id,
            story_version = %summary.story_version,
            steps = summary.path.len(),
            score = summary.accumulated_score,
            ending = %summary.ending_type,
            "session finished"
        );
        Ok(())
    }
}

/// Logs awards instead of crediting an external ledger.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingPointsAwarder;

#[async_trait]
impl PointsAwarder for LoggingPointsAwarder {
    async fn award(&self, player_id: Uuid, reward: &RewardDescriptor) -> Result<(), DomainError> {
        info!(
            %player_id,
            points = reward.total_points,
            badge = reward.badge.as_deref().unwrap_or("none"),
            "points awarded"
        );
        Ok(())
    }
}
