//! Error types for externally supplied layouts and configuration.
//!
//! Operations reachable through normal interaction never fail: they return
//! `bool` or `Option` and treat invalid preconditions as no-ops. These
//! errors only describe input that arrives from outside the engine.

use crate::item::ItemId;
use thiserror::Error;

/// A layout that violates the item invariants.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Duplicate item id: {0}")]
    DuplicateId(ItemId),
    #[error("Folder has no children: {0}")]
    EmptyFolder(ItemId),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for layout loading.
pub type LayoutResult<T> = Result<T, LayoutError>;

/// A configuration value outside its valid range.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Failure to build an engine from external input.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid layout: {0}")]
    Layout(#[from] LayoutError),
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for engine construction.
pub type EngineResult<T> = Result<T, EngineError>;
