use serde::{Deserialize, Serialize};

use crate::domain::PostRecord;

/// Weights applied to engagement counts when scoring a post.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EngagementWeights {
    pub comment_weight: u64,
    pub share_weight: u64,
    /// Multiplier turning an engagement score into an estimated reach
    pub reach_multiplier: u64,
}

impl Default for EngagementWeights {
    fn default() -> Self {
        Self {
            comment_weight: 2,
            share_weight: 3,
            reach_multiplier: 10,
        }
    }
}

/// likes + weighted comments + weighted shares. Saturates instead of
/// overflowing on adversarial counts.
pub fn engagement_score(post: &PostRecord, weights: &EngagementWeights) -> u64 {
    post.likes
        .saturating_add(weights.comment_weight.saturating_mul(post.comments))
        .saturating_add(weights.share_weight.saturating_mul(post.shares))
}

pub fn reach_estimate(score: u64, weights: &EngagementWeights) -> u64 {
    score.saturating_mul(weights.reach_multiplier)
}

/// Dataset-level engagement overview, as shown on the dashboard header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementSummary {
    pub total_posts: usize,
    pub total_engagement: u64,
    pub mean_engagement: f64,
    pub total_reach: u64,
}

pub fn summarize(records: &[PostRecord], weights: &EngagementWeights) -> EngagementSummary {
    let total_engagement: u64 = records
        .iter()
        .map(|r| engagement_score(r, weights))
        .fold(0, u64::saturating_add);
    let mean_engagement = if records.is_empty() {
        0.0
    } else {
        total_engagement as f64 / records.len() as f64
    };
    EngagementSummary {
        total_posts: records.len(),
        total_engagement,
        mean_engagement,
        total_reach: reach_estimate(total_engagement, weights),
    }
}

/// The `n` highest-scoring posts, best first. Ties keep dataset order.
pub fn top_posts<'a>(
    records: &'a [PostRecord],
    n: usize,
    weights: &EngagementWeights,
) -> Vec<(&'a PostRecord, u64)> {
    let mut scored: Vec<(&PostRecord, u64)> = records
        .iter()
        .map(|r| (r, engagement_score(r, weights)))
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.truncate(n);
    scored
}
