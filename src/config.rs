// File: src/config.rs
use crate::core::dictionary::Dictionary;
use crate::core::session::SessionOptions;
use crate::core::translator::DEFAULT_MARKER;
use crate::error::{ConfigError, DictionaryError};
use crate::progress::DEFAULT_SCORE_INCREMENT;
use chrono::{FixedOffset, Offset, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "SIGMA_CONFIG";
const CONFIG_FILE: &str = "sigma_translator.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Where the key-value state is kept.
    pub storage_path: PathBuf,
    /// Replaces the bundled dictionary when set.
    pub dictionary_path: Option<PathBuf>,
    pub marker: String,
    pub score_increment: u64,
    /// UTC offset, in minutes, used to split timestamps into calendar days.
    pub day_offset_minutes: i32,
    pub flush_interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("sigma_storage.json"),
            dictionary_path: None,
            marker: DEFAULT_MARKER.to_string(),
            score_increment: DEFAULT_SCORE_INCREMENT,
            day_offset_minutes: 0,
            flush_interval_secs: 30,
        }
    }
}

impl AppConfig {
    /// `$SIGMA_CONFIG`, or `sigma_translator.json` in the working directory.
    pub fn path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
    }

    /// `Ok(None)` when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            tracing::debug!("Configuration file not found: {:?}", path);
            return Ok(None);
        }

        tracing::debug!("Loading configuration from: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Never fails: a missing or broken file yields the defaults.
    pub fn load() -> Self {
        let path = Self::path();
        match Self::load_from(&path) {
            Ok(Some(config)) => config,
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!("Ignoring configuration {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Out-of-range offsets fall back to UTC.
    pub fn day_offset(&self) -> FixedOffset {
        self.day_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }

    pub fn load_dictionary(&self) -> Result<Dictionary, DictionaryError> {
        match &self.dictionary_path {
            Some(path) => Dictionary::from_path(path),
            None => Dictionary::bundled(),
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        let flush_secs = i64::try_from(self.flush_interval_secs)
            .unwrap_or(i64::MAX)
            .min(i64::MAX / 1000);
        SessionOptions {
            score_increment: self.score_increment,
            day_offset: self.day_offset(),
            flush_interval: TimeDelta::seconds(flush_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    #[rstest]
    fn missing_file_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let result = AppConfig::load_from(&temp_dir.path().join(CONFIG_FILE)).unwrap();
        assert!(result.is_none());
    }

    #[rstest]
    fn partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{"marker": "*", "dayOffsetMinutes": 120}"#).unwrap();

        let config = AppConfig::load_from(&path).unwrap().unwrap();
        assert_eq!(config.marker, "*");
        assert_eq!(config.score_increment, DEFAULT_SCORE_INCREMENT);
        assert_eq!(config.day_offset().local_minus_utc(), 7200);
    }

    #[rstest]
    fn broken_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&path, "{ nope").unwrap();
        assert!(matches!(AppConfig::load_from(&path), Err(ConfigError::Parse(_))));
    }

    #[rstest]
    #[case(0, 0)]
    #[case(-300, -18000)]
    #[case(100_000, 0)]
    fn day_offset_is_clamped_to_valid_offsets(#[case] minutes: i32, #[case] seconds: i32) {
        let config = AppConfig { day_offset_minutes: minutes, ..AppConfig::default() };
        assert_eq!(config.day_offset().local_minus_utc(), seconds);
    }

    #[rstest]
    fn dictionary_path_overrides_bundled() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dict.json");
        fs::write(&path, r#"{"שלום": "yo"}"#).unwrap();

        let config = AppConfig { dictionary_path: Some(path), ..AppConfig::default() };
        let dict = config.load_dictionary().unwrap();
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.get("שלום"), Some("yo"));
    }
}
