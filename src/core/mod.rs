// src/core/mod.rs

pub mod achievements;
pub mod dictionary;
pub mod history;
pub mod session;
pub mod translator;
pub mod types;
