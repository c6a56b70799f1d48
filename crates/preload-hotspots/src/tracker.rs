//! Session hotspot tracker.
//!
//! Owns the in-memory [`TrackerState`] for one process invocation. State is
//! loaded once when the tracker is opened and written back after every
//! update. Persistence problems are reported but never stop the tracker: the
//! in-memory result of an update stays valid for the rest of the process.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use preload_types::{HotspotConfig, TopicTables};
use tracing::{info, instrument, warn};

use crate::error::HotspotError;
use crate::extractor::TopicExtractor;
use crate::heat::{HeatScorer, StepSummary};
use crate::store::HotspotStore;
use crate::types::{TopicRecord, TopicTag, TrackerState};

/// Result of a single [`HotspotTracker::update`].
#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    /// What the scoring step changed
    pub step: StepSummary,
    /// Set when the state could not be written back
    pub persist_warning: Option<String>,
}

impl UpdateOutcome {
    /// Topics detected in the message.
    pub fn topics(&self) -> &BTreeSet<TopicTag> {
        &self.step.mentioned
    }

    /// Whether the new state reached durable storage.
    pub fn persisted(&self) -> bool {
        self.persist_warning.is_none()
    }
}

/// Tracks topic heat across the messages of a session.
pub struct HotspotTracker {
    store: HotspotStore,
    extractor: TopicExtractor,
    scorer: HeatScorer,
    topic_paths: BTreeMap<TopicTag, Vec<String>>,
    state: TrackerState,
}

impl HotspotTracker {
    /// Open a tracker, loading any existing state from `store`.
    pub fn open(
        store: HotspotStore,
        config: HotspotConfig,
        tables: &TopicTables,
    ) -> Result<Self, HotspotError> {
        config.validate().map_err(HotspotError::InvalidConfig)?;
        let state = store.load_or_default();

        Ok(Self {
            store,
            extractor: TopicExtractor::new(&tables.keywords),
            scorer: HeatScorer::new(config),
            topic_paths: tables.paths.clone(),
            state,
        })
    }

    /// Record a message received now.
    pub fn update(&mut self, message: &str) -> UpdateOutcome {
        self.update_at(message, Utc::now())
    }

    /// Record a message received at `now`.
    ///
    /// Timestamps are truncated to milliseconds, the precision of the
    /// state file, so reloaded state scores identically.
    #[instrument(skip(self, message), fields(len = message.len()))]
    pub fn update_at(&mut self, message: &str, now: DateTime<Utc>) -> UpdateOutcome {
        let now = truncate_to_millis(now);
        let topics = self.extractor.extract(message);
        let step = self.scorer.apply(&mut self.state, message, &topics, now);

        let persist_warning = match self.store.save(&self.state) {
            Ok(()) => None,
            Err(e) => {
                warn!(path = ?self.store.path(), error = %e, "Failed to save session cache");
                Some(format!("Failed to save session cache: {}", e))
            }
        };

        UpdateOutcome {
            step,
            persist_warning,
        }
    }

    /// Current hot topics, hottest first.
    pub fn hot_topics(&self) -> Vec<TopicRecord> {
        self.scorer.hot_topics(&self.state)
    }

    /// Curated resource paths for the current hot topics.
    ///
    /// Paths follow hot-topic order and appear once, at their first occurrence.
    pub fn hot_memory_paths(&self) -> Vec<String> {
        self.hot_topic_paths()
            .into_iter()
            .flat_map(|(_, paths)| paths)
            .collect()
    }

    /// Each hot topic with the curated paths it introduces.
    ///
    /// A path shared by several hot topics is attributed to the hottest one
    /// only; topics without curated paths get an empty list.
    pub fn hot_topic_paths(&self) -> Vec<(TopicRecord, Vec<String>)> {
        let mut seen = BTreeSet::new();

        self.hot_topics()
            .into_iter()
            .map(|record| {
                let paths = self
                    .topic_paths
                    .get(&record.topic)
                    .map(|paths| {
                        paths
                            .iter()
                            .filter(|p| seen.insert(p.as_str()))
                            .cloned()
                            .collect()
                    })
                    .unwrap_or_default();
                (record, paths)
            })
            .collect()
    }

    /// Delete the durable state and clear the in-memory copy.
    ///
    /// Returns whether a state file existed.
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> Result<bool, HotspotError> {
        let existed = self.store.reset()?;
        self.state = TrackerState::default();
        info!(existed, "Session hotspot tracker reset");
        Ok(existed)
    }

    /// Current state snapshot.
    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    /// Backing store.
    pub fn store(&self) -> &HotspotStore {
        &self.store
    }

    /// Topic extractor built from the keyword table.
    pub fn extractor(&self) -> &TopicExtractor {
        &self.extractor
    }

    /// Active scoring configuration.
    pub fn config(&self) -> &HotspotConfig {
        self.scorer.config()
    }
}

fn truncate_to_millis(now: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}
