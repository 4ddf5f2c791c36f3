use crate::core::achievements::{Evaluator, ProgressStats, UnlockedSet, CATALOG};
use crate::core::history::History;
use crate::core::translator::Translator;
use crate::core::types::{Achievement, Direction, TranslationRecord};
use crate::persistence::Storage;
use crate::progress::{ProgressTracker, DEFAULT_SCORE_INCREMENT};
use crate::share::{format_summary, share_with_fallback, ShareOutcome, ShareTarget, SHARE_TITLE};
use chrono::{DateTime, FixedOffset, Offset, TimeDelta, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const KEY_DARK_MODE: &str = "darkMode";
pub const KEY_SCORE: &str = "score";
pub const KEY_STREAK: &str = "streak";
pub const KEY_TRANSLATIONS: &str = "translations";
pub const KEY_UNLOCKED: &str = "unlockedAchievements";
pub const KEY_SHARE_COUNT: &str = "shareCount";

#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub score_increment: u64,
    pub day_offset: FixedOffset,
    pub flush_interval: TimeDelta,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            score_increment: DEFAULT_SCORE_INCREMENT,
            day_offset: Utc.fix(),
            flush_interval: TimeDelta::seconds(30),
        }
    }
}

/// What one submitted translation produced.
#[derive(Debug, Clone)]
pub struct TranslationOutcome {
    pub record: TranslationRecord,
    /// Newly unlocked achievements, to be announced one after another.
    pub unlocked: Vec<&'static Achievement>,
    pub score: u64,
    pub streak: u64,
}

/// Owns the user's state and drives the translator and evaluator for each
/// event. All storage writes are best-effort.
pub struct Session {
    translator: Translator,
    evaluator: Evaluator,
    tracker: ProgressTracker,
    history: History,
    unlocked: UnlockedSet,
    stats: ProgressStats,
    dark_mode: bool,
    storage: Box<dyn Storage>,
    flush_interval: TimeDelta,
    last_flush: Option<DateTime<Utc>>,
}

impl Session {
    /// Reads saved state from `storage`; anything missing or unparsable
    /// starts from its default.
    pub fn restore(storage: Box<dyn Storage>, translator: Translator, options: SessionOptions) -> Self {
        let dark_mode = read(storage.as_ref(), KEY_DARK_MODE);
        let history: History = read(storage.as_ref(), KEY_TRANSLATIONS);
        let unlocked: UnlockedSet = read(storage.as_ref(), KEY_UNLOCKED);
        let stats = ProgressStats {
            score: read(storage.as_ref(), KEY_SCORE),
            streak: read(storage.as_ref(), KEY_STREAK),
            share_count: read(storage.as_ref(), KEY_SHARE_COUNT),
        };

        tracing::debug!(
            history = history.len(),
            unlocked = unlocked.len(),
            score = stats.score,
            "Session restored"
        );

        Self {
            evaluator: Evaluator::new(translator.marker(), options.day_offset),
            tracker: ProgressTracker::new(options.score_increment),
            translator,
            history,
            unlocked,
            stats,
            dark_mode,
            storage,
            flush_interval: options.flush_interval,
            last_flush: None,
        }
    }

    /// Translates `input` and applies every consequence. Blank input is a
    /// no-op and returns `None`.
    pub fn submit(
        &mut self,
        input: &str,
        direction: Direction,
        now: DateTime<Utc>,
    ) -> Option<TranslationOutcome> {
        if input.trim().is_empty() {
            return None;
        }

        let output = self.translator.translate(input, direction);
        let now_ms = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let record = TranslationRecord {
            id: self.history.next_id(now_ms),
            input: input.to_string(),
            output,
            timestamp: now,
            direction,
        };

        let candidates = self.evaluator.evaluate(&self.history, &record, &self.unlocked, now);
        self.history.push(record.clone());
        self.tracker.record_translation(&mut self.stats);

        let mut unlocked = self.tracker.unlock(&mut self.stats, &mut self.unlocked, candidates);
        unlocked.extend(self.apply_progress_unlocks());

        tracing::debug!(id = record.id, ?direction, unlocked = unlocked.len(), "Translation recorded");

        store(self.storage.as_mut(), KEY_TRANSLATIONS, &self.history);
        self.store_progress();

        Some(TranslationOutcome {
            record,
            unlocked,
            score: self.stats.score,
            streak: self.stats.streak,
        })
    }

    /// Score can cross a threshold through the points just awarded, so keep
    /// going until nothing new qualifies.
    fn apply_progress_unlocks(&mut self) -> Vec<&'static Achievement> {
        let mut applied = Vec::new();
        loop {
            let candidates = self.evaluator.evaluate_progress(&self.stats, &self.unlocked);
            if candidates.is_empty() {
                return applied;
            }
            applied.extend(self.tracker.unlock(&mut self.stats, &mut self.unlocked, candidates));
        }
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.tracker.reset_streak(&mut self.stats);
        store(self.storage.as_mut(), KEY_TRANSLATIONS, &self.history);
        store(self.storage.as_mut(), KEY_STREAK, &self.stats.streak);
    }

    pub fn toggle_theme(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        store(self.storage.as_mut(), KEY_DARK_MODE, &self.dark_mode);
        self.dark_mode
    }

    /// Counts a successful share and returns anything it unlocked.
    pub fn record_share(&mut self) -> Vec<&'static Achievement> {
        self.tracker.record_share(&mut self.stats);
        let unlocked = self.apply_progress_unlocks();
        self.store_progress();
        unlocked
    }

    /// Publishes the summary through `native`, falling back to `clipboard`.
    pub fn share(
        &mut self,
        native: Option<&mut dyn ShareTarget>,
        clipboard: &mut dyn ShareTarget,
    ) -> (ShareOutcome, Vec<&'static Achievement>) {
        let outcome = share_with_fallback(native, clipboard, SHARE_TITLE, &self.share_summary());
        let unlocked = if outcome.succeeded() { self.record_share() } else { Vec::new() };
        (outcome, unlocked)
    }

    pub fn share_summary(&self) -> String {
        format_summary(self.stats.score, self.unlocked.len(), CATALOG.len())
    }

    /// Writes every key.
    pub fn flush(&mut self, now: DateTime<Utc>) {
        store(self.storage.as_mut(), KEY_DARK_MODE, &self.dark_mode);
        store(self.storage.as_mut(), KEY_TRANSLATIONS, &self.history);
        self.store_progress();
        self.last_flush = Some(now);
    }

    /// Flushes if the interval has passed since the last flush.
    pub fn flush_if_due(&mut self, now: DateTime<Utc>) -> bool {
        let due = match self.last_flush {
            Some(last) => now.signed_duration_since(last) >= self.flush_interval,
            None => true,
        };
        if due {
            self.flush(now);
        }
        due
    }

    fn store_progress(&mut self) {
        let storage = self.storage.as_mut();
        store(storage, KEY_SCORE, &self.stats.score);
        store(storage, KEY_STREAK, &self.stats.streak);
        store(storage, KEY_SHARE_COUNT, &self.stats.share_count);
        store(storage, KEY_UNLOCKED, &self.unlocked);
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn unlocked(&self) -> &UnlockedSet {
        &self.unlocked
    }

    /// Catalog entries still locked, hidden ones included.
    pub fn locked(&self) -> impl Iterator<Item = &'static Achievement> + '_ {
        CATALOG.iter().filter(|a| !self.unlocked.contains(a.id))
    }

    pub fn score(&self) -> u64 {
        self.stats.score
    }

    pub fn streak(&self) -> u64 {
        self.stats.streak
    }

    pub fn share_count(&self) -> u64 {
        self.stats.share_count
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }
}

fn read<T: DeserializeOwned + Default>(storage: &dyn Storage, key: &str) -> T {
    match storage.get(key) {
        Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(key, "Unparsable stored value, using default: {}", e);
            T::default()
        }),
        None => {
            tracing::debug!(key, "No stored value, using default");
            T::default()
        }
    }
}

fn store<T: Serialize + ?Sized>(storage: &mut dyn Storage, key: &str, value: &T) {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(key, "Failed to encode value: {}", e);
            return;
        }
    };
    if let Err(e) = storage.set(key, raw) {
        tracing::warn!(key, "Failed to persist value: {}", e);
    }
}
