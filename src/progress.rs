// File: src/progress.rs
use crate::core::achievements::{ProgressStats, UnlockedSet};
use crate::core::types::Achievement;

pub const DEFAULT_SCORE_INCREMENT: u64 = 10;

/// Applies the outcome of user events to the score, streak and unlock state.
#[derive(Debug, Clone, Copy)]
pub struct ProgressTracker {
    score_increment: u64,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new(DEFAULT_SCORE_INCREMENT)
    }
}

impl ProgressTracker {
    pub fn new(score_increment: u64) -> Self {
        Self { score_increment }
    }

    pub fn record_translation(&self, stats: &mut ProgressStats) {
        stats.score = stats.score.saturating_add(self.score_increment);
        stats.streak = stats.streak.saturating_add(1);
    }

    pub fn record_share(&self, stats: &mut ProgressStats) {
        stats.share_count = stats.share_count.saturating_add(1);
    }

    pub fn reset_streak(&self, stats: &mut ProgressStats) {
        stats.streak = 0;
    }

    /// Unlocks `candidates` in order and awards their points. Returns the
    /// ones that were actually new.
    pub fn unlock(
        &self,
        stats: &mut ProgressStats,
        unlocked: &mut UnlockedSet,
        candidates: Vec<&'static Achievement>,
    ) -> Vec<&'static Achievement> {
        candidates
            .into_iter()
            .filter(|achievement| unlocked.insert(*achievement))
            .inspect(|achievement| {
                stats.score = stats.score.saturating_add(achievement.points);
                tracing::info!(
                    id = achievement.id,
                    points = achievement.points,
                    "Achievement unlocked"
                );
            })
            .collect()
    }
}
