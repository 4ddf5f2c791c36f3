// --- File: src/core/dictionary.rs
use crate::core::types::DictionaryEntry;
use crate::error::DictionaryError;
use std::collections::HashMap;
use std::path::Path;

const BUNDLED_DICTIONARY: &str = include_str!("../../data/dictionary.json");

/// Immutable Hebrew -> Sigma mapping, loaded once at startup.
///
/// Keys are trimmed and lowercased on load. Entries keep the order of the
/// data source; that order decides reverse lookups when two keys share a
/// value.
#[derive(Debug, Clone)]
pub struct Dictionary {
    entries: Vec<DictionaryEntry>,
    by_source: HashMap<String, usize>,
    /// Lowercased target -> first entry carrying it.
    by_target: HashMap<String, usize>,
    /// Multi-word keys, longest first.
    phrases: Vec<usize>,
}

impl Dictionary {
    pub fn from_entries<I, S, T>(pairs: I) -> Result<Self, DictionaryError>
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: Into<String>,
    {
        let mut entries = Vec::new();
        let mut by_source = HashMap::new();
        let mut by_target = HashMap::new();

        for (source, target) in pairs {
            let source = normalize_key(source.as_ref());
            if source.is_empty() {
                return Err(DictionaryError::EmptyKey);
            }
            if by_source.contains_key(&source) {
                return Err(DictionaryError::DuplicateKey { key: source });
            }

            let target = target.into();
            let idx = entries.len();
            by_source.insert(source.clone(), idx);
            by_target.entry(normalize_key(&target)).or_insert(idx);
            entries.push(DictionaryEntry { source, target });
        }

        let mut phrases: Vec<usize> = entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.source.contains(' '))
            .map(|(idx, _)| idx)
            .collect();
        // Stable sort: equal lengths keep source order.
        phrases.sort_by_key(|&idx| std::cmp::Reverse(entries[idx].source.chars().count()));

        tracing::debug!(
            entries = entries.len(),
            phrases = phrases.len(),
            "Dictionary loaded"
        );

        Ok(Self { entries, by_source, by_target, phrases })
    }

    /// Parses `{ "hebrew phrase": "sigma phrase", ... }`.
    pub fn from_json_str(json: &str) -> Result<Self, DictionaryError> {
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
        let mut pairs = Vec::with_capacity(map.len());
        for (key, value) in map {
            match value {
                serde_json::Value::String(target) => pairs.push((key, target)),
                _ => return Err(DictionaryError::NonStringValue { key }),
            }
        }
        Self::from_entries(pairs)
    }

    pub fn from_path(path: &Path) -> Result<Self, DictionaryError> {
        tracing::debug!("Loading dictionary from: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// The dictionary shipped inside the binary.
    pub fn bundled() -> Result<Self, DictionaryError> {
        Self::from_json_str(BUNDLED_DICTIONARY)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[DictionaryEntry] {
        &self.entries
    }

    /// Exact lookup of an already-normalized key.
    pub fn get(&self, source: &str) -> Option<&str> {
        self.by_source
            .get(source)
            .map(|&idx| self.entries[idx].target.as_str())
    }

    /// Case-insensitive exact match on values; the first entry in source
    /// order wins.
    pub fn source_for(&self, target: &str) -> Option<&str> {
        self.by_target
            .get(&normalize_key(target))
            .map(|&idx| self.entries[idx].source.as_str())
    }

    /// Entries whose key or value contains `term`, ignoring case, in source
    /// order. A blank term matches everything.
    pub fn search<'a>(&'a self, term: &str) -> impl Iterator<Item = &'a DictionaryEntry> + 'a {
        let term = normalize_key(term);
        self.entries.iter().filter(move |entry| {
            term.is_empty()
                || entry.source.contains(&term)
                || entry.target.to_lowercase().contains(&term)
        })
    }

    /// Multi-word entries ordered by descending key length.
    pub fn phrases(&self) -> impl Iterator<Item = &DictionaryEntry> + '_ {
        self.phrases.iter().map(move |&idx| &self.entries[idx])
    }
}

fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}
