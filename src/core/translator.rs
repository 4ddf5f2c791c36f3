use crate::core::dictionary::Dictionary;
use crate::core::types::Direction;

pub const DEFAULT_MARKER: &str = "✨";

/// Dictionary-driven substitution between Hebrew and Sigma.
#[derive(Debug, Clone)]
pub struct Translator {
    dictionary: Dictionary,
    /// Cosmetic wrapper around substituted text. Empty disables wrapping.
    marker: String,
}

impl Translator {
    pub fn new(dictionary: Dictionary) -> Self {
        Self::with_marker(dictionary, DEFAULT_MARKER)
    }

    pub fn with_marker(dictionary: Dictionary, marker: impl Into<String>) -> Self {
        Self { dictionary, marker: marker.into() }
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Translates `text`. Callers skip blank input; for any non-empty input
    /// the result is non-empty.
    pub fn translate(&self, text: &str, direction: Direction) -> String {
        let result = match direction {
            Direction::ToSigma => self.to_sigma(text),
            Direction::FromSigma => self.from_sigma(text),
        };

        if result.is_empty() {
            text.to_string()
        } else {
            result
        }
    }

    fn to_sigma(&self, text: &str) -> String {
        let normalized = text.trim().to_lowercase();

        // 1. Whole input is a key.
        if let Some(target) = self.dictionary.get(&normalized) {
            return self.wrap(target);
        }

        // 2. First (longest) phrase found anywhere, one substitution only.
        for entry in self.dictionary.phrases() {
            if normalized.contains(entry.source.as_str()) {
                return normalized.replacen(entry.source.as_str(), &self.wrap(&entry.target), 1);
            }
        }

        // 3. Word by word; unknown tokens stay verbatim.
        text.split_whitespace()
            .map(|word| match self.dictionary.get(&word.to_lowercase()) {
                Some(target) => self.wrap(target),
                None => word.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn from_sigma(&self, text: &str) -> String {
        text.split_whitespace()
            .map(|word| {
                let clean = strip_markers(word, &self.marker);
                match self.dictionary.source_for(&clean) {
                    Some(source) => source.to_string(),
                    None => word.to_string(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn wrap(&self, target: &str) -> String {
        format!("{m}{target}{m}", m = self.marker)
    }
}

/// Removes every occurrence of `marker` from `text`.
pub fn strip_markers(text: &str, marker: &str) -> String {
    if marker.is_empty() {
        text.to_string()
    } else {
        text.replace(marker, "")
    }
}
