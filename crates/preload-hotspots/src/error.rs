//! Hotspot error types.

use thiserror::Error;

/// Errors that can occur while tracking session hotspots.
#[derive(Debug, Error)]
pub enum HotspotError {
    /// Reading or writing the state file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The state file could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid tracker configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
