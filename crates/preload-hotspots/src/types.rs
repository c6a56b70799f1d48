//! Hotspot data types.
//!
//! The JSON field names (`count`, `lastSeen`, `lastUpdate`, millisecond
//! timestamps) match the state files written by the earlier preload scripts,
//! so an existing `.session-hotspots.json` keeps working.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A coarse topic label such as `github` or `security`.
pub type TopicTag = String;

/// Current on-disk snapshot version.
pub const STATE_VERSION: u32 = 1;

/// Tracking record for one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicRecord {
    /// Topic identifier; mirrors the key in [`TrackerState::topics`]
    #[serde(default)]
    pub topic: TopicTag,
    /// Number of messages the topic was detected in
    #[serde(rename = "count")]
    pub mention_count: u32,
    /// Most recent detection
    #[serde(rename = "lastSeen", with = "chrono::serde::ts_milliseconds")]
    pub last_seen_at: DateTime<Utc>,
    /// Time-decayed relevance score, never negative
    pub heat: f64,
}

impl TopicRecord {
    /// Create an unmentioned record.
    pub fn new(topic: impl Into<TopicTag>, now: DateTime<Utc>) -> Self {
        Self {
            topic: topic.into(),
            mention_count: 0,
            last_seen_at: now,
            heat: 0.0,
        }
    }

    /// Whole minutes since the topic was last seen, for reports.
    pub fn minutes_since_seen(&self, now: DateTime<Utc>) -> i64 {
        now.signed_duration_since(self.last_seen_at)
            .num_minutes()
            .max(0)
    }
}

/// One ingested message, kept for introspection only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Raw message text
    pub message: String,
    /// Topics detected in the message
    #[serde(default)]
    pub topics: BTreeSet<TopicTag>,
    /// Ingestion time
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

/// Full persisted tracker state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerState {
    /// Snapshot format version
    #[serde(default = "default_version")]
    pub version: u32,
    /// Tracked topics keyed by tag
    #[serde(default)]
    pub topics: BTreeMap<TopicTag, TopicRecord>,
    /// Bounded message history, oldest first
    #[serde(default)]
    pub history: VecDeque<HistoryEntry>,
    /// Time of the most recent update
    #[serde(
        default,
        rename = "lastUpdate",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub last_update_at: Option<DateTime<Utc>>,
}

fn default_version() -> u32 {
    STATE_VERSION
}

impl Default for TrackerState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            topics: BTreeMap::new(),
            history: VecDeque::new(),
            last_update_at: None,
        }
    }
}

impl TrackerState {
    /// Repair fields that older snapshots leave implicit.
    ///
    /// Record tags are filled from their map keys and negative or
    /// non-finite heat is clamped to zero.
    pub fn normalize(&mut self) {
        for (tag, record) in self.topics.iter_mut() {
            if record.topic != *tag {
                record.topic = tag.clone();
            }
            if !record.heat.is_finite() || record.heat < 0.0 {
                record.heat = 0.0;
            }
        }
        self.version = STATE_VERSION;
    }

    /// Whether nothing has been tracked yet.
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty() && self.history.is_empty() && self.last_update_at.is_none()
    }

    /// The last `n` history entries, oldest first.
    pub fn recent_history(&self, n: usize) -> impl Iterator<Item = &HistoryEntry> {
        self.history
            .iter()
            .skip(self.history.len().saturating_sub(n))
    }
}
