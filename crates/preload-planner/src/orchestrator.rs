//! Preload orchestration.
//!
//! Composes the three preload tiers for a user message. The orchestrator
//! holds no state of its own beyond the hotspot tracker it delegates to.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use preload_hotspots::{HotspotStore, HotspotTracker};
use preload_types::{SemanticConfig, Settings};

use crate::error::PlannerError;
use crate::plan::{preview, resource_file, HotspotReason, PreloadPlan, SemanticSearchRequest};

/// Characters of the message quoted in the Tier B rationale.
const RATIONALE_PREVIEW_CHARS: usize = 50;

/// Builds preload plans from the fixed file list, a semantic search request
/// and the session's hotspots.
pub struct PreloadOrchestrator {
    always_load: Vec<String>,
    semantic: SemanticConfig,
    tracker: HotspotTracker,
}

/// Tier C resources with the hot topics that produced them.
struct HotspotTier {
    paths: Vec<String>,
    reasons: Vec<HotspotReason>,
    skipped: Vec<String>,
}

impl PreloadOrchestrator {
    /// Create an orchestrator around an open tracker.
    pub fn new(
        always_load: Vec<String>,
        semantic: SemanticConfig,
        tracker: HotspotTracker,
    ) -> Self {
        Self {
            always_load,
            semantic,
            tracker,
        }
    }

    /// Open the tracker described by `settings` and wrap it.
    pub fn from_settings(settings: &Settings) -> Result<Self, PlannerError> {
        let store = HotspotStore::new(settings.resolved_state_path());
        let tracker = HotspotTracker::open(store, settings.hotspot.clone(), &settings.topics)?;
        Ok(Self::new(
            settings.always_load.clone(),
            settings.semantic.clone(),
            tracker,
        ))
    }

    /// Plan preloads for a message received now.
    pub fn plan(&mut self, message: &str) -> PreloadPlan {
        self.plan_at(message, Utc::now())
    }

    /// Plan preloads for a message received at `now`.
    ///
    /// Records the message with the hotspot tracker before reading hotspots,
    /// so the current message counts toward Tier C.
    pub fn plan_at(&mut self, message: &str, now: DateTime<Utc>) -> PreloadPlan {
        let mut rationale = Vec::new();
        let mut warnings = Vec::new();

        let tier_a = self.always_load.clone();
        rationale.push(format!(
            "Tier A: always-load core files ({})",
            tier_a.join(", ")
        ));

        let tier_b =
            SemanticSearchRequest::new(message, self.semantic.max_results, self.semantic.min_score);
        rationale.push(format!(
            "Tier B: semantic search for \"{}\"",
            preview(message, RATIONALE_PREVIEW_CHARS)
        ));
        rationale.push(format!(
            "   -> Use {}({{query: \"{}\", maxResults: {}, minScore: {:.2}}})",
            tier_b.action, tier_b.query, tier_b.max_results, tier_b.min_score
        ));
        if !self.semantic.sources.is_empty() {
            rationale.push(format!(
                "   -> Sources: {}",
                self.semantic.sources.join(", ")
            ));
        }

        let outcome = self.tracker.update_at(message, now);
        if let Some(warning) = outcome.persist_warning {
            warnings.push(warning);
        }

        let tier_c = self.hotspot_tier(&tier_a, message);

        if tier_c.reasons.is_empty() {
            rationale.push("Tier C: no session hotspots yet".to_string());
        } else {
            rationale.push("Tier C: session hotspots detected".to_string());
            for hot in &tier_c.reasons {
                let mut line = format!(
                    "   - {}: {} mentions, heat={:.2}",
                    hot.topic, hot.mention_count, hot.heat
                );
                if !hot.keywords.is_empty() {
                    line.push_str(&format!(" (matched: {})", hot.keywords.join(", ")));
                }
                rationale.push(line);
            }
            for path in &tier_c.skipped {
                rationale.push(format!("   - skipped {} (already loaded in Tier A)", path));
            }
        }

        info!(
            tier_a = tier_a.len(),
            tier_c = tier_c.paths.len(),
            hotspots = tier_c.reasons.len(),
            "Built preload plan"
        );

        PreloadPlan {
            message: message.to_string(),
            tier_a,
            tier_b,
            tier_c: tier_c.paths,
            hotspots: tier_c.reasons,
            rationale,
            warnings,
        }
    }

    /// Hotspot-derived resources that are not already covered by Tier A.
    ///
    /// A resource is covered when Tier A lists the same identifier or the
    /// whole file it points into.
    fn hotspot_tier(&self, tier_a: &[String], message: &str) -> HotspotTier {
        let loaded: HashSet<&str> = tier_a.iter().map(String::as_str).collect();
        let mut tier = HotspotTier {
            paths: Vec::new(),
            reasons: Vec::new(),
            skipped: Vec::new(),
        };

        for (record, paths) in self.tracker.hot_topic_paths() {
            let mut introduced = Vec::new();
            for path in paths {
                if loaded.contains(path.as_str()) || loaded.contains(resource_file(&path)) {
                    debug!(path = %path, topic = %record.topic, "Hotspot path already in Tier A");
                    tier.skipped.push(path);
                } else {
                    tier.paths.push(path.clone());
                    introduced.push(path);
                }
            }
            let keywords = self
                .tracker
                .extractor()
                .matched_keywords(&record.topic, message);
            tier.reasons.push(HotspotReason::new(&record, introduced, keywords));
        }

        tier
    }
}
