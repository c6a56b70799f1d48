//! # preload-types
//!
//! Shared configuration and error types for the session preload system.
//!
//! - [`Settings`]: layered configuration (defaults -> file -> env -> CLI)
//! - [`HotspotConfig`]: window, threshold, decay and cap for hotspot tracking
//! - [`SemanticConfig`]: request parameters handed to the semantic search tool
//! - [`TopicTables`]: the static keyword table and topic -> resource paths table

pub mod config;
pub mod error;

pub use config::{HotspotConfig, SemanticConfig, Settings, TopicTables};
pub use error::PreloadError;
