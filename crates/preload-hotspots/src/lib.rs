//! # preload-hotspots
//!
//! Session topic hotspot tracking for the preload planner.
//!
//! Incoming messages are tagged with coarse topics from a static keyword
//! table. Each topic carries a time-decayed "heat" so that topics mentioned
//! recently and repeatedly outrank topics mentioned once long ago. State is a
//! small JSON snapshot reloaded on every invocation and rewritten after every
//! update.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use preload_hotspots::{HotspotStore, HotspotTracker};
//! use preload_types::{HotspotConfig, TopicTables};
//!
//! let store = HotspotStore::new("/tmp/.session-hotspots.json");
//! let mut tracker =
//!     HotspotTracker::open(store, HotspotConfig::default(), &TopicTables::default())?;
//!
//! tracker.update("let's push this to github");
//! for topic in tracker.hot_topics() {
//!     println!("{}: {} mentions, heat={:.2}", topic.topic, topic.mention_count, topic.heat);
//! }
//! # Ok::<(), preload_hotspots::HotspotError>(())
//! ```

pub mod error;
pub mod extractor;
pub mod heat;
pub mod store;
pub mod tracker;
pub mod types;

pub use error::HotspotError;
pub use extractor::TopicExtractor;
pub use heat::{HeatScorer, StepSummary};
pub use store::HotspotStore;
pub use tracker::{HotspotTracker, UpdateOutcome};
pub use types::{HistoryEntry, TopicRecord, TopicTag, TrackerState, STATE_VERSION};
