//! Configuration module for snapkeep
//!
//! This module provides configuration management including:
//! - Project-local settings persistence (`.snapkeep.json`)
//! - Default exclusion patterns and retention policy

pub mod settings;

pub use settings::Settings;
