// File: src/error.rs
use thiserror::Error;

/// Errors raised while loading the bundled or user-supplied dictionary.
#[derive(Error, Debug)]
pub enum DictionaryError {
    #[error("Failed to read dictionary file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Dictionary is not a JSON object of strings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Dictionary value for '{key}' is not a string")]
    NonStringValue { key: String },
    #[error("Dictionary contains an empty key")]
    EmptyKey,
    #[error("Dictionary key '{key}' collides with another key after normalization")]
    DuplicateKey { key: String },
}

/// Errors from a key-value storage backend.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage file is not a JSON object of strings: {0}")]
    Format(#[from] serde_json::Error),
    #[error("Failed to replace storage file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Errors from a share or clipboard target.
#[derive(Error, Debug)]
pub enum ShareError {
    #[error("Sharing is not supported here")]
    Unsupported,
    #[error("Share target failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors while reading the application configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}
