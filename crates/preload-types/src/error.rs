//! Error types for the session preload system.

use thiserror::Error;

/// Error raised while loading or validating settings.
#[derive(Debug, Error)]
pub enum PreloadError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
