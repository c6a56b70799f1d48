//! End-to-end planning tests.
//!
//! Each plan call opens a fresh orchestrator from settings, the way every CLI
//! invocation does, so hotspot state only survives through the state file.

use chrono::{DateTime, Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use preload_planner::{LoadCommand, PreloadOrchestrator, PreloadPlan};
use preload_types::Settings;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
}

fn settings(dir: &TempDir) -> Settings {
    Settings {
        workspace_dir: dir.path().to_string_lossy().to_string(),
        ..Settings::default()
    }
}

fn plan_once(settings: &Settings, message: &str, now: DateTime<Utc>) -> PreloadPlan {
    let mut orchestrator =
        PreloadOrchestrator::from_settings(settings).expect("Failed to open orchestrator");
    orchestrator.plan_at(message, now)
}

#[test]
fn test_github_session_builds_hotspot_tier() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);

    let messages = [
        "when does the GitHub token expire?",
        "push the fix to github",
        "open a github issue for it",
    ];
    let mut plan = None;
    for (i, message) in messages.iter().enumerate() {
        plan = Some(plan_once(&settings, message, t0() + Duration::seconds(i as i64 * 20)));
    }
    let plan = plan.unwrap();

    let hot: Vec<&str> = plan.hotspots.iter().map(|h| h.topic.as_str()).collect();
    assert!(hot.contains(&"github"));
    assert!(hot.contains(&"git"));

    // git and github tie on heat and recency, so git ranks first by name;
    // github then only adds the path git does not share.
    assert_eq!(hot[..2].to_vec(), vec!["git", "github"]);
    assert_eq!(
        plan.tier_c,
        vec![
            "MEMORY.md#GitHub Account".to_string(),
            ".credentials-info.md".to_string(),
            "workflow-analysis.md".to_string(),
            "TOOLS.md".to_string(),
        ]
    );
    assert_eq!(plan.hotspots[1].paths, vec!["TOOLS.md".to_string()]);

    let commands: Vec<String> = plan.load_commands().iter().map(|c| c.to_string()).collect();
    assert_eq!(commands[0], "read(\"SOUL.md\")");
    assert_eq!(
        commands[3],
        "memory_search({query: \"open a github issue for it\", maxResults: 5})"
    );
    assert_eq!(commands[4], "read(\"MEMORY.md\") // focus: GitHub Account");
    assert_eq!(commands.len(), 3 + 1 + 4);
}

#[test]
fn test_state_file_lands_in_workspace() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);

    plan_once(&settings, "check my wallet", t0());
    assert!(dir.path().join(".session-hotspots.json").exists());
}

#[test]
fn test_plan_serializes_to_json() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);

    let plan = plan_once(&settings, "swap eth", t0());
    let json = serde_json::to_value(&plan).unwrap();

    assert_eq!(json["tier_a"][0], "SOUL.md");
    assert_eq!(json["tier_b"]["query"], "swap eth");
    assert_eq!(json["tier_b"]["minScore"], serde_json::json!(0.6_f32));
    assert!(json.get("warnings").is_none());

    let parsed: PreloadPlan = serde_json::from_value(json).unwrap();
    assert_eq!(parsed, plan);
}

#[test]
fn test_idle_session_cools_down() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);

    for i in 0..3 {
        plan_once(&settings, "swap usdc", t0() + Duration::seconds(i));
    }
    let hot_plan = plan_once(&settings, "swap usdc", t0() + Duration::seconds(3));
    assert!(!hot_plan.tier_c.is_empty());

    // An hour later defi has decayed away; the new message starts it over.
    let cold_plan = plan_once(&settings, "swap usdc", t0() + Duration::minutes(60));
    assert!(cold_plan.tier_c.is_empty());
    assert!(cold_plan.hotspots.is_empty());
}

#[test]
fn test_persist_failure_is_reported_not_fatal() {
    let dir = TempDir::new().unwrap();
    let blocked = dir.path().join("blocked");
    std::fs::create_dir(&blocked).unwrap();
    let settings = Settings {
        state_path: Some(blocked.to_string_lossy().to_string()),
        ..settings(&dir)
    };

    let plan = plan_once(&settings, "github", t0());
    assert_eq!(plan.warnings.len(), 1);
    assert!(matches!(
        plan.load_commands().first(),
        Some(LoadCommand::Read { .. })
    ));
}
