//! Planner error types.

use thiserror::Error;

use preload_hotspots::HotspotError;

/// Errors that can occur while planning or searching.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// Hotspot tracker error
    #[error("Hotspot error: {0}")]
    Hotspot(#[from] HotspotError),

    /// Document search error
    #[error("Search error: {0}")]
    Search(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
