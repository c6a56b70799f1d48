//! Time-decayed heat scoring for session topics.
//!
//! Heat decays multiplicatively per minute: `heat * D^minutes`. Scoring is a
//! pure transformation of a [`TrackerState`]; persistence is handled by the
//! store so this module can be tested with fixed timestamps.
//!
//! One update step:
//! 1. Append the message to history, evicting the oldest entry past the window.
//! 2. Mentioned topics: bump `mention_count`, set `last_seen_at = now` and
//!    recompute `heat = mention_count * D^(minutes since the previous sighting)`.
//! 3. Every other topic decays in place: `heat *= D^(minutes since last_seen_at)`.
//! 4. Topics below the heat floor are removed, including ones mentioned in
//!    this step whose previous sighting is too old.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use preload_types::HotspotConfig;
use tracing::debug;

use crate::types::{HistoryEntry, TopicRecord, TopicTag, TrackerState};

const MILLIS_PER_MINUTE: f64 = 60_000.0;

/// Changes made to the state by a single update step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepSummary {
    /// Topics detected in the message
    pub mentioned: BTreeSet<TopicTag>,
    /// Topics removed because their heat fell below the floor
    pub pruned: Vec<TopicTag>,
    /// History entries evicted to respect the window
    pub evicted: usize,
}

/// Applies update steps and ranks hot topics.
#[derive(Debug, Clone)]
pub struct HeatScorer {
    config: HotspotConfig,
}

impl HeatScorer {
    /// Create a scorer with the given configuration.
    pub fn new(config: HotspotConfig) -> Self {
        Self { config }
    }

    /// Get the active configuration.
    pub fn config(&self) -> &HotspotConfig {
        &self.config
    }

    /// Decay multiplier after `minutes` without a mention.
    ///
    /// Negative intervals (clock skew) are treated as zero.
    pub fn decay(&self, minutes: f64) -> f64 {
        self.config.decay_factor.powf(minutes.max(0.0))
    }

    /// Heat of a topic with `mention_count` mentions, `minutes` after the
    /// previous sighting.
    pub fn heat_for(&self, mention_count: u32, minutes: f64) -> f64 {
        f64::from(mention_count) * self.decay(minutes)
    }

    /// Apply one update step for `message` with its detected `topics`.
    pub fn apply(
        &self,
        state: &mut TrackerState,
        message: &str,
        topics: &BTreeSet<TopicTag>,
        now: DateTime<Utc>,
    ) -> StepSummary {
        let mut summary = StepSummary {
            mentioned: topics.clone(),
            ..StepSummary::default()
        };

        state.history.push_back(HistoryEntry {
            message: message.to_string(),
            topics: topics.clone(),
            timestamp: now,
        });
        while state.history.len() > self.config.window_size {
            state.history.pop_front();
            summary.evicted += 1;
        }

        for topic in topics {
            let record = state
                .topics
                .entry(topic.clone())
                .or_insert_with(|| TopicRecord::new(topic.clone(), now));

            let previous_seen = record.last_seen_at;
            record.mention_count += 1;
            record.last_seen_at = now;
            record.heat = self.heat_for(record.mention_count, minutes_between(previous_seen, now));
        }

        for (tag, record) in state.topics.iter_mut() {
            if topics.contains(tag) {
                continue;
            }
            record.heat *= self.decay(minutes_between(record.last_seen_at, now));
        }

        let epsilon = self.config.heat_epsilon;
        state.topics.retain(|tag, record| {
            let keep = record.heat >= epsilon;
            if !keep {
                summary.pruned.push(tag.clone());
            }
            keep
        });

        state.last_update_at = Some(now);

        debug!(
            mentioned = summary.mentioned.len(),
            pruned = summary.pruned.len(),
            tracked = state.topics.len(),
            "Applied hotspot update"
        );

        summary
    }

    /// Hot topics: top `max_hotspots` by heat, then filtered to those with at
    /// least `threshold_count` mentions.
    ///
    /// Ties break by more recent `last_seen_at`, then by topic tag.
    pub fn hot_topics(&self, state: &TrackerState) -> Vec<TopicRecord> {
        let mut ranked: Vec<&TopicRecord> = state.topics.values().collect();
        ranked.sort_by(|a, b| compare_heat(a, b));

        ranked
            .into_iter()
            .take(self.config.max_hotspots)
            .filter(|r| r.mention_count >= self.config.threshold_count)
            .cloned()
            .collect()
    }
}

impl Default for HeatScorer {
    fn default() -> Self {
        Self::new(HotspotConfig::default())
    }
}

/// Descending heat, then most recent sighting, then tag.
fn compare_heat(a: &TopicRecord, b: &TopicRecord) -> Ordering {
    b.heat
        .total_cmp(&a.heat)
        .then_with(|| b.last_seen_at.cmp(&a.last_seen_at))
        .then_with(|| a.topic.cmp(&b.topic))
}

fn minutes_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let millis = to.signed_duration_since(from).num_milliseconds();
    (millis as f64 / MILLIS_PER_MINUTE).max(0.0)
}
