//! Outcome classification: what a finished session is worth.
//!
//! Everything here is pure. Awarding the result is the job of a
//! [`PointsAwarder`](super::ports::PointsAwarder).

use fablepath_content::domain::story::EndingType;
use serde::{Deserialize, Serialize};

/// How one ending type is rewarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndingReward {
    /// Factor applied to the non-negative session score.
    pub multiplier: u32,
    /// Flat points for reaching the ending.
    pub completion_bonus: u32,
    /// Badge granted for reaching the ending, if any.
    pub badge: Option<String>,
}

/// Reward table keyed by ending type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardPolicy {
    /// Row for `excellent` endings.
    pub excellent: EndingReward,
    /// Row for `great` endings.
    pub great: EndingReward,
    /// Row for `good` endings.
    pub good: EndingReward,
    /// Row for `bad` endings.
    pub bad: EndingReward,
}

impl Default for RewardPolicy {
    fn default() -> Self {
        Self {
            excellent: EndingReward {
                multiplier: 3,
                completion_bonus: 20,
                badge: Some("story-champion".to_owned()),
            },
            great: EndingReward {
                multiplier: 2,
                completion_bonus: 10,
                badge: Some("story-explorer".to_owned()),
            },
            good: EndingReward {
                multiplier: 1,
                completion_bonus: 5,
                badge: None,
            },
            bad: EndingReward {
                multiplier: 1,
                completion_bonus: 0,
                badge: None,
            },
        }
    }
}

/// What a player earned from a finished session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardDescriptor {
    /// Ending the reward was computed for.
    pub ending_type: EndingType,
    /// Session score floored at zero.
    pub base_points: u64,
    /// Multiplier from the policy row.
    pub multiplier: u32,
    /// Completion bonus from the policy row.
    pub completion_bonus: u32,
    /// `base_points * multiplier + completion_bonus`, saturating.
    pub total_points: u64,
    /// Badge granted, if any.
    pub badge: Option<String>,
}

impl RewardPolicy {
    /// Returns the table row for `ending_type`.
    #[must_use]
    pub fn for_ending(&self, ending_type: EndingType) -> &EndingReward {
        match ending_type {
            EndingType::Excellent => &self.excellent,
            EndingType::Great => &self.great,
            EndingType::Good => &self.good,
            EndingType::Bad => &self.bad,
        }
    }

    /// Classifies a finished session under this policy.
    #[must_use]
    pub fn classify(&self, ending_type: EndingType, accumulated_score: i64) -> RewardDescriptor {
        let row = self.for_ending(ending_type);
        let base_points = u64::try_from(accumulated_score).unwrap_or(0);
        let total_points = base_points
            .saturating_mul(u64::from(row.multiplier))
            .saturating_add(u64::from(row.completion_bonus));

        RewardDescriptor {
            ending_type,
            base_points,
            multiplier: row.multiplier,
            completion_bonus: row.completion_bonus,
            total_points,
            badge: row.badge.clone(),
        }
    }
}

/// Classifies a finished session under the default policy.
#[must_use]
pub fn classify(ending_type: EndingType, accumulated_score: i64) -> RewardDescriptor {
    RewardPolicy::default().classify(ending_type, accumulated_score)
}
