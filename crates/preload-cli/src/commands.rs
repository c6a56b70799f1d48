//! Command implementations for session-preload.
//!
//! Each invocation loads settings, applies CLI overrides, then opens the
//! hotspot state from disk. Reports are built as strings so they can be
//! checked without capturing stdout.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use preload_hotspots::{HotspotStore, HotspotTracker};
use preload_planner::{
    preview, DocumentSearcher, KeywordSearcher, PreloadOrchestrator, SearchHit,
    SemanticSearchRequest,
};
use preload_types::Settings;

use crate::cli::Cli;

/// History entries shown by `status`.
const STATUS_HISTORY_ENTRIES: usize = 5;

/// Characters of each history message shown by `status`.
const STATUS_PREVIEW_CHARS: usize = 60;

/// Load configuration and apply the global CLI flags on top of it.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings =
        Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // CLI flags win over every other source
    if let Some(log_level) = &cli.log_level {
        settings.log_level = log_level.clone();
    }
    if let Some(workspace) = &cli.workspace {
        settings.workspace_dir = workspace.clone();
    }
    if let Some(state_path) = &cli.state_path {
        settings.state_path = Some(state_path.clone());
    }

    settings.validate().context("Invalid configuration")?;
    Ok(settings)
}

/// Install the global tracing subscriber.
///
/// Logs go to stderr so plan output on stdout stays machine-readable.
pub fn init_logging(settings: &Settings) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level)),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

fn open_tracker(settings: &Settings) -> Result<HotspotTracker> {
    let store = HotspotStore::new(settings.resolved_state_path());
    HotspotTracker::open(store, settings.hotspot.clone(), &settings.topics)
        .context("Failed to open hotspot tracker")
}

/// Handle `plan`: record the message and print the preload plan.
pub fn handle_plan(settings: &Settings, message: &str, json: bool) -> Result<()> {
    let output = plan_output(settings, message, json, Utc::now())?;
    println!("{}", output);
    Ok(())
}

/// Build the `plan` output for a message received at `now`.
pub fn plan_output(
    settings: &Settings,
    message: &str,
    json: bool,
    now: DateTime<Utc>,
) -> Result<String> {
    let mut orchestrator = PreloadOrchestrator::from_settings(settings)
        .context("Failed to create preload orchestrator")?;
    let plan = orchestrator.plan_at(message, now);

    if json {
        serde_json::to_string_pretty(&plan).context("Failed to serialize plan")
    } else {
        Ok(plan.to_report())
    }
}

/// Handle `status`: print current hotspots without recording anything.
pub fn show_status(settings: &Settings) -> Result<()> {
    let tracker = open_tracker(settings)?;
    println!("{}", status_report(&tracker, Utc::now()));
    Ok(())
}

/// Render the hotspot status report as of `now`.
pub fn status_report(tracker: &HotspotTracker, now: DateTime<Utc>) -> String {
    let mut lines = vec!["Session Hotspots".to_string(), String::new()];

    let hot = tracker.hot_topics();
    if hot.is_empty() {
        lines.push("No hot topics detected yet.".to_string());
    } else {
        lines.push("Hot Topics:".to_string());
        for record in &hot {
            lines.push(format!(
                "  - {}: {} mentions, heat {:.2} (last seen {} min ago)",
                record.topic,
                record.mention_count,
                record.heat,
                record.minutes_since_seen(now)
            ));
        }

        lines.push(String::new());
        lines.push("Recommended Memory Paths:".to_string());
        let paths = tracker.hot_memory_paths();
        if paths.is_empty() {
            lines.push("  (none configured)".to_string());
        }
        for path in paths {
            lines.push(format!("  - {}", path));
        }
    }

    let history: Vec<_> = tracker
        .state()
        .recent_history(STATUS_HISTORY_ENTRIES)
        .collect();
    if !history.is_empty() {
        lines.push(String::new());
        lines.push(format!("Recent Messages (last {}):", history.len()));
        for entry in history {
            let topics = if entry.topics.is_empty() {
                "-".to_string()
            } else {
                entry.topics.iter().cloned().collect::<Vec<_>>().join(", ")
            };
            lines.push(format!(
                "  - \"{}\" [{}]",
                preview(&entry.message, STATUS_PREVIEW_CHARS),
                topics
            ));
        }
    }

    lines.join("\n")
}

/// Handle `reset`: delete the state file.
pub fn handle_reset(settings: &Settings) -> Result<()> {
    let mut tracker = open_tracker(settings)?;
    let existed = tracker.reset().context("Failed to reset hotspot state")?;
    info!(path = ?tracker.store().path(), existed, "Hotspot state reset");
    println!("{}", reset_report(existed, tracker.store()));
    Ok(())
}

/// One-line outcome of a reset.
pub fn reset_report(existed: bool, store: &HotspotStore) -> String {
    if existed {
        format!("Session hotspots reset ({})", store.path().display())
    } else {
        "No session cache to reset".to_string()
    }
}

/// Handle `search`: keyword search over the workspace.
pub fn handle_search(settings: &Settings, query: &str) -> Result<()> {
    let root = settings.expanded_workspace_dir();
    debug!(root = ?root, query, "Searching workspace");
    let hits = KeywordSearcher::new()
        .search(query, &root)
        .context("Keyword search failed")?;
    println!("{}", search_report(settings, query, &hits));
    Ok(())
}

/// Render keyword hits plus the equivalent semantic search request.
pub fn search_report(settings: &Settings, query: &str, hits: &[SearchHit]) -> String {
    let mut lines = Vec::new();

    if hits.is_empty() {
        lines.push(format!("No matches for \"{}\"", query));
    } else {
        lines.push(format!("{} match(es) for \"{}\":", hits.len(), query));
        for hit in hits {
            lines.push(format!(
                "  {}:{}: {}",
                hit.path.display(),
                hit.line_number,
                hit.snippet
            ));
        }
    }

    let request = SemanticSearchRequest::new(
        query,
        settings.semantic.max_results,
        settings.semantic.min_score,
    );
    lines.push(String::new());
    lines.push(format!(
        "For semantic recall use: {}({{query: \"{}\", maxResults: {}}})",
        request.action, request.query, request.max_results
    ));

    lines.join("\n")
}
