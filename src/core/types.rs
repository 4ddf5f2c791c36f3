// src/core/types.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which way a translation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    ToSigma,
    FromSigma,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Direction::ToSigma => Direction::FromSigma,
            Direction::FromSigma => Direction::ToSigma,
        }
    }
}

/// A (Hebrew, Sigma) pair. `source` is stored lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryEntry {
    pub source: String,
    pub target: String,
}

/// One completed translation. Immutable once created; owned by `History`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRecord {
    /// Unix milliseconds at creation, bumped so ids stay strictly increasing.
    pub id: u64,
    pub input: String,
    pub output: String,
    pub timestamp: DateTime<Utc>,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythic,
}

/// A static gamification milestone. The catalog lives in `achievements`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub points: u64,
    pub rarity: Rarity,
    pub hidden: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn direction_serializes_like_the_storage_format() {
        assert_eq!(serde_json::to_string(&Direction::ToSigma).unwrap(), "\"toSigma\"");
        assert_eq!(serde_json::to_string(&Direction::FromSigma).unwrap(), "\"fromSigma\"");
    }

    #[rstest]
    fn record_uses_camel_case_and_rfc3339() {
        let json = r#"{"id":1700000000000,"input":"אחי","output":"✨bro✨","timestamp":"2024-05-01T10:00:00Z","direction":"toSigma"}"#;
        let record: TranslationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 1_700_000_000_000);
        assert_eq!(record.direction, Direction::ToSigma);
        assert_eq!(record.timestamp.to_rfc3339(), "2024-05-01T10:00:00+00:00");
    }

    #[rstest]
    fn flipping_twice_is_identity() {
        assert_eq!(Direction::ToSigma.flipped().flipped(), Direction::ToSigma);
    }
}
