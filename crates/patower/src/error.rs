//! Error types for the tower generator.

use thiserror::Error;

/// Errors that can occur during tower generation.
#[derive(Error, Debug)]
pub enum TowerError {
    /// Invalid generation settings.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

/// Result type for generator operations.
pub type Result<T> = std::result::Result<T, TowerError>;
