// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod persistence;
pub mod progress;
pub mod share;
pub use crate::core::session::Session;
pub use crate::core::translator::Translator;
pub use crate::core::types::Direction;
