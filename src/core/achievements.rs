// File: src/core/achievements.rs
use crate::core::history::History;
use crate::core::translator::strip_markers;
use crate::core::types::{Achievement, Rarity, TranslationRecord};
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const FIRST_TRANSLATION: &str = "first_translation";
pub const QUICK_START: &str = "quick_start";
pub const WORD_MASTER: &str = "word_master";
pub const TRANSLATION_STREAK: &str = "translation_streak";
pub const DICTIONARY_EXPLORER: &str = "dictionary_explorer";
pub const TRANSLATION_MASTER: &str = "translation_master";
pub const DAILY_DEDICATION: &str = "daily_dedication";
pub const SPEED_DEMON: &str = "speed_demon";
pub const PERFECT_COMBO: &str = "perfect_combo";
pub const SHARING_MASTER: &str = "sharing_master";

const QUICK_START_WINDOW_SECS: i64 = 120;
const QUICK_START_COUNT: usize = 4;
const SPEED_DEMON_WINDOW_SECS: i64 = 300;
const SPEED_DEMON_COUNT: usize = 10;
const WORD_MASTER_WORDS: usize = 50;
const DICTIONARY_EXPLORER_WORDS: usize = 100;
const DAILY_DEDICATION_DAYS: usize = 5;
const TRANSLATION_STREAK_LEN: u64 = 10;
const PERFECT_COMBO_LEN: u64 = 20;
const TRANSLATION_MASTER_SCORE: u64 = 1000;
const SHARING_MASTER_SHARES: u64 = 5;

/// Every achievement, in display and unlock order.
pub static CATALOG: [Achievement; 10] = [
    Achievement {
        id: FIRST_TRANSLATION,
        title: "צעדים ראשונים",
        description: "ביצעת את התרגום הראשון שלך",
        icon: "🎯",
        points: 50,
        rarity: Rarity::Common,
        hidden: false,
    },
    Achievement {
        id: QUICK_START,
        title: "זריז ומהיר",
        description: "ביצעת 4 תרגומים תוך 2 דקות",
        icon: "⚡",
        points: 100,
        rarity: Rarity::Uncommon,
        hidden: false,
    },
    Achievement {
        id: WORD_MASTER,
        title: "שולט במילים",
        description: "תרגמת 50 מילים ייחודיות",
        icon: "📚",
        points: 200,
        rarity: Rarity::Rare,
        hidden: false,
    },
    Achievement {
        id: TRANSLATION_STREAK,
        title: "רצף מושלם",
        description: "השלמת 10 תרגומים ברצף",
        icon: "🔥",
        points: 150,
        rarity: Rarity::Uncommon,
        hidden: false,
    },
    Achievement {
        id: DICTIONARY_EXPLORER,
        title: "חוקר המילון",
        description: "תרגמת 100 מילים ייחודיות",
        icon: "🗺️",
        points: 300,
        rarity: Rarity::Epic,
        hidden: true,
    },
    Achievement {
        id: TRANSLATION_MASTER,
        title: "מאסטר התרגום",
        description: "צברת 1000 נקודות",
        icon: "👑",
        points: 500,
        rarity: Rarity::Legendary,
        hidden: true,
    },
    Achievement {
        id: DAILY_DEDICATION,
        title: "מסירות יומית",
        description: "ביצעת תרגומים ב-5 ימים שונים",
        icon: "📅",
        points: 250,
        rarity: Rarity::Rare,
        hidden: false,
    },
    Achievement {
        id: SPEED_DEMON,
        title: "מהיר כמו שד",
        description: "ביצעת 10 תרגומים תוך 5 דקות",
        icon: "💨",
        points: 400,
        rarity: Rarity::Epic,
        hidden: true,
    },
    Achievement {
        id: PERFECT_COMBO,
        title: "קומבו מושלם",
        description: "ביצעת 20 תרגומים ברצף ללא הפסקה",
        icon: "⚡",
        points: 600,
        rarity: Rarity::Legendary,
        hidden: true,
    },
    Achievement {
        id: SHARING_MASTER,
        title: "מלך השיתופים",
        description: "שיתפת את התוצאות שלך 5 פעמים",
        icon: "🌟",
        points: 200,
        rarity: Rarity::Rare,
        hidden: false,
    },
];

pub fn by_id(id: &str) -> Option<&'static Achievement> {
    CATALOG.iter().find(|a| a.id == id)
}

/// Ids of unlocked achievements, in unlock order. Only grows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct UnlockedSet {
    ids: Vec<&'static str>,
}

impl UnlockedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps catalog ids only; unknown or repeated ids are dropped.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for id in ids {
            match by_id(id.as_ref()) {
                Some(achievement) => {
                    set.insert(achievement);
                }
                None => tracing::warn!(id = id.as_ref(), "Dropping unknown achievement id"),
            }
        }
        set
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|&known| known == id)
    }

    /// Returns false if it was already unlocked.
    pub fn insert(&mut self, achievement: &'static Achievement) -> bool {
        if self.contains(achievement.id) {
            return false;
        }
        self.ids.push(achievement.id);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static Achievement> + '_ {
        self.ids.iter().filter_map(|id| by_id(id))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl From<Vec<String>> for UnlockedSet {
    fn from(ids: Vec<String>) -> Self {
        Self::from_ids(ids)
    }
}

impl From<UnlockedSet> for Vec<String> {
    fn from(set: UnlockedSet) -> Self {
        set.ids.into_iter().map(str::to_string).collect()
    }
}

/// Counters that drive the non-history achievements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressStats {
    pub score: u64,
    pub streak: u64,
    pub share_count: u64,
}

/// Decides which locked achievements qualify after a translation.
/// Pure: the caller applies the result.
#[derive(Debug, Clone)]
pub struct Evaluator {
    marker: String,
    /// Offset used to turn timestamps into calendar days.
    day_offset: FixedOffset,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(crate::core::translator::DEFAULT_MARKER, Utc.fix())
    }
}

impl Evaluator {
    pub fn new(marker: impl Into<String>, day_offset: FixedOffset) -> Self {
        Self { marker: marker.into(), day_offset }
    }

    /// `history` is the state before `new_record` was appended. Returns the
    /// newly qualifying achievements in catalog order.
    pub fn evaluate(
        &self,
        history: &History,
        new_record: &TranslationRecord,
        unlocked: &UnlockedSet,
        now: DateTime<Utc>,
    ) -> Vec<&'static Achievement> {
        let records = || std::iter::once(new_record).chain(history.iter());

        let recent = |window_secs: i64| {
            let window = TimeDelta::seconds(window_secs);
            records()
                .filter(|r| now.signed_duration_since(r.timestamp) < window)
                .count()
        };

        let words: HashSet<String> = records()
            .flat_map(|r| r.output.split_whitespace())
            .map(|token| strip_markers(token, &self.marker).to_lowercase())
            .filter(|token| !token.is_empty())
            .collect();

        let days: HashSet<NaiveDate> = records()
            .map(|r| r.timestamp.with_timezone(&self.day_offset).date_naive())
            .collect();

        let qualifies = |achievement: &Achievement| match achievement.id {
            FIRST_TRANSLATION => history.is_empty(),
            QUICK_START => recent(QUICK_START_WINDOW_SECS) >= QUICK_START_COUNT,
            WORD_MASTER => words.len() >= WORD_MASTER_WORDS,
            DICTIONARY_EXPLORER => words.len() >= DICTIONARY_EXPLORER_WORDS,
            DAILY_DEDICATION => days.len() >= DAILY_DEDICATION_DAYS,
            SPEED_DEMON => recent(SPEED_DEMON_WINDOW_SECS) >= SPEED_DEMON_COUNT,
            _ => false,
        };

        self.select(unlocked, qualifies)
    }

    /// Counter-driven achievements: streak, score and sharing.
    pub fn evaluate_progress(
        &self,
        stats: &ProgressStats,
        unlocked: &UnlockedSet,
    ) -> Vec<&'static Achievement> {
        self.select(unlocked, |achievement| match achievement.id {
            TRANSLATION_STREAK => stats.streak >= TRANSLATION_STREAK_LEN,
            PERFECT_COMBO => stats.streak >= PERFECT_COMBO_LEN,
            TRANSLATION_MASTER => stats.score >= TRANSLATION_MASTER_SCORE,
            SHARING_MASTER => stats.share_count >= SHARING_MASTER_SHARES,
            _ => false,
        })
    }

    fn select(
        &self,
        unlocked: &UnlockedSet,
        qualifies: impl Fn(&Achievement) -> bool,
    ) -> Vec<&'static Achievement> {
        CATALOG
            .iter()
            .filter(|a| !unlocked.contains(a.id))
            .filter(|a| qualifies(*a))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Direction;
    use chrono::{Duration, TimeZone};
    use rstest::{fixture, rstest};

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn record_at(id: u64, output: &str, timestamp: DateTime<Utc>) -> TranslationRecord {
        TranslationRecord {
            id,
            input: "קלט".to_string(),
            output: output.to_string(),
            timestamp,
            direction: Direction::ToSigma,
        }
    }

    fn ids(found: &[&'static Achievement]) -> Vec<&'static str> {
        found.iter().map(|a| a.id).collect()
    }

    /// History whose outputs hold `count` distinct words, all 1 day old.
    fn history_with_words(count: usize, now: DateTime<Utc>) -> History {
        let old = now - Duration::days(1);
        History::from_records((0..count).map(|i| record_at(i as u64, &format!("✨w{i}✨"), old)))
    }

    #[rstest]
    fn catalog_ids_are_unique() {
        let unique: HashSet<&str> = CATALOG.iter().map(|a| a.id).collect();
        assert_eq!(unique.len(), CATALOG.len());
    }

    #[rstest]
    fn first_translation_only_on_empty_history(now: DateTime<Utc>) {
        let evaluator = Evaluator::default();
        let new = record_at(1, "יו", now);
        let found = evaluator.evaluate(&History::new(), &new, &UnlockedSet::new(), now);
        assert_eq!(ids(&found), vec![FIRST_TRANSLATION]);

        let mut history = History::new();
        history.push(record_at(0, "יו", now - Duration::days(3)));
        let found = evaluator.evaluate(&history, &new, &UnlockedSet::new(), now);
        assert!(!ids(&found).contains(&FIRST_TRANSLATION));
    }

    #[rstest]
    fn quick_start_counts_the_new_record(now: DateTime<Utc>) {
        let evaluator = Evaluator::default();
        let mut history = History::new();
        for (i, secs) in [90, 60, 30].into_iter().enumerate() {
            history.push(record_at(i as u64, "יו", now - Duration::seconds(secs)));
        }
        let new = record_at(9, "יו", now);
        let unlocked = UnlockedSet::from_ids([FIRST_TRANSLATION]);

        let found = evaluator.evaluate(&history, &new, &unlocked, now);
        assert_eq!(ids(&found).iter().filter(|&&id| id == QUICK_START).count(), 1);
    }

    #[rstest]
    fn quick_start_ignores_old_records(now: DateTime<Utc>) {
        let evaluator = Evaluator::default();
        let mut history = History::new();
        history.push(record_at(0, "יו", now - Duration::seconds(200)));
        history.push(record_at(1, "יו", now - Duration::seconds(60)));
        history.push(record_at(2, "יו", now - Duration::seconds(30)));
        let new = record_at(3, "יו", now);

        let found = evaluator.evaluate(&history, &new, &UnlockedSet::new(), now);
        assert!(!ids(&found).contains(&QUICK_START));
    }

    #[rstest]
    fn word_master_threshold_is_fifty(now: DateTime<Utc>) {
        let evaluator = Evaluator::default();
        let unlocked = UnlockedSet::new();

        let history = history_with_words(49, now);
        let repeat = record_at(100, "✨W0✨", now);
        let found = evaluator.evaluate(&history, &repeat, &unlocked, now);
        assert!(!ids(&found).contains(&WORD_MASTER), "49 distinct words must not qualify");

        let fresh = record_at(100, "w49 w0", now);
        let found = evaluator.evaluate(&history, &fresh, &unlocked, now);
        assert_eq!(ids(&found).iter().filter(|&&id| id == WORD_MASTER).count(), 1);

        let unlocked = UnlockedSet::from_ids([WORD_MASTER]);
        let found = evaluator.evaluate(&history, &fresh, &unlocked, now);
        assert!(!ids(&found).contains(&WORD_MASTER));
    }

    #[rstest]
    fn daily_dedication_needs_five_days(now: DateTime<Utc>) {
        let evaluator = Evaluator::default();
        let mut history = History::new();
        for day in 1..=3 {
            history.push(record_at(day, "יו", now - Duration::days(day as i64)));
        }
        // Same day as the newest entry does not add a new day.
        history.push(record_at(10, "יו", now - Duration::hours(1)));
        let new = record_at(11, "יו", now);
        let found = evaluator.evaluate(&history, &new, &UnlockedSet::new(), now);
        assert!(!ids(&found).contains(&DAILY_DEDICATION));

        history.push(record_at(12, "יו", now - Duration::days(4)));
        let found = evaluator.evaluate(&history, &new, &UnlockedSet::new(), now);
        assert!(ids(&found).contains(&DAILY_DEDICATION));
    }

    #[rstest]
    fn day_boundaries_follow_the_configured_offset() {
        // 22:30 and 23:30 UTC share a UTC day but not a +01:00 day.
        let late = Utc.with_ymd_and_hms(2024, 6, 5, 22, 30, 0).unwrap();
        let history = History::from_records(
            (1..=3)
                .map(|d| record_at(d, "יו", late - Duration::days(d as i64)))
                .chain(std::iter::once(record_at(9, "יו", late))),
        );
        let new = record_at(10, "יו", late + Duration::hours(1));
        let unlocked = UnlockedSet::new();

        let in_utc = Evaluator::default().evaluate(&history, &new, &unlocked, new.timestamp);
        assert!(!ids(&in_utc).contains(&DAILY_DEDICATION));

        let shifted = Evaluator::new("✨", FixedOffset::east_opt(3600).unwrap());
        let found = shifted.evaluate(&history, &new, &unlocked, new.timestamp);
        assert!(ids(&found).contains(&DAILY_DEDICATION));
    }

    #[rstest]
    fn speed_demon_needs_ten_in_five_minutes(now: DateTime<Utc>) {
        let evaluator = Evaluator::default();
        let history = History::from_records(
            (0..9).map(|i| record_at(i, "יו", now - Duration::seconds(20 * i as i64 + 10))),
        );
        let new = record_at(99, "יו", now);
        let found = evaluator.evaluate(&history, &new, &UnlockedSet::new(), now);
        assert!(ids(&found).contains(&SPEED_DEMON));
        assert!(ids(&found).contains(&QUICK_START));
    }

    #[rstest]
    fn evaluation_is_idempotent(now: DateTime<Utc>) {
        let evaluator = Evaluator::default();
        let history = history_with_words(60, now);
        let new = record_at(100, "חדש", now);
        let unlocked = UnlockedSet::from_ids([FIRST_TRANSLATION]);

        let first = evaluator.evaluate(&history, &new, &unlocked, now);
        let second = evaluator.evaluate(&history, &new, &unlocked, now);
        assert_eq!(ids(&first), ids(&second));
        assert_eq!(ids(&first), vec![WORD_MASTER]);
    }

    #[rstest]
    fn results_follow_catalog_order(now: DateTime<Utc>) {
        let evaluator = Evaluator::default();
        let history = History::from_records(
            (0..120).map(|i| record_at(i, &format!("t{i}"), now - Duration::seconds(5))),
        );
        let new = record_at(500, "t-new", now);
        let found = evaluator.evaluate(&history, &new, &UnlockedSet::new(), now);
        assert_eq!(ids(&found), vec![QUICK_START, WORD_MASTER, DICTIONARY_EXPLORER, SPEED_DEMON]);
    }

    #[rstest]
    #[case(ProgressStats { score: 0, streak: 9, share_count: 0 }, vec![])]
    #[case(ProgressStats { score: 0, streak: 10, share_count: 0 }, vec![TRANSLATION_STREAK])]
    #[case(ProgressStats { score: 0, streak: 20, share_count: 0 }, vec![TRANSLATION_STREAK, PERFECT_COMBO])]
    #[case(ProgressStats { score: 1000, streak: 0, share_count: 5 }, vec![TRANSLATION_MASTER, SHARING_MASTER])]
    fn progress_rules(#[case] stats: ProgressStats, #[case] expected: Vec<&'static str>) {
        let evaluator = Evaluator::default();
        let found = evaluator.evaluate_progress(&stats, &UnlockedSet::new());
        assert_eq!(ids(&found), expected);
    }

    #[rstest]
    fn unlocked_set_drops_unknown_and_repeated_ids() {
        let set = UnlockedSet::from_ids(["quick_start", "bogus", "quick_start", "word_master"]);
        assert_eq!(set.len(), 2);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["quick_start","word_master"]"#);
    }

    #[rstest]
    fn unlocked_set_never_re_adds() {
        let mut set = UnlockedSet::new();
        let achievement = by_id(FIRST_TRANSLATION).unwrap();
        assert!(set.insert(achievement));
        assert!(!set.insert(achievement));
        assert_eq!(set.len(), 1);
    }
}
