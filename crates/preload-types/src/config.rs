//! Configuration loading for session-preload.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at `<config_dir>/session-preload/config.toml`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use config::{Config, Environment, File};
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};

use crate::error::PreloadError;

/// File name of the hotspot state snapshot inside the workspace.
pub const STATE_FILE_NAME: &str = ".session-hotspots.json";

/// Session hotspot tracking parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotspotConfig {
    /// Number of recent messages kept in history (W).
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Minimum mention count for a topic to be reported as hot (T).
    #[serde(default = "default_threshold_count")]
    pub threshold_count: u32,

    /// Per-minute multiplicative heat decay (D), strictly between 0 and 1.
    #[serde(default = "default_decay_factor")]
    pub decay_factor: f64,

    /// Topics whose heat falls below this floor are dropped.
    #[serde(default = "default_heat_epsilon")]
    pub heat_epsilon: f64,

    /// Maximum number of hot topics reported (K).
    #[serde(default = "default_max_hotspots")]
    pub max_hotspots: usize,
}

fn default_window_size() -> usize {
    10
}
fn default_threshold_count() -> u32 {
    3
}
fn default_decay_factor() -> f64 {
    0.8
}
fn default_heat_epsilon() -> f64 {
    0.1
}
fn default_max_hotspots() -> usize {
    5
}

impl Default for HotspotConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            threshold_count: default_threshold_count(),
            decay_factor: default_decay_factor(),
            heat_epsilon: default_heat_epsilon(),
            max_hotspots: default_max_hotspots(),
        }
    }
}

impl HotspotConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.decay_factor > 0.0 && self.decay_factor < 1.0) {
            return Err(format!(
                "decay_factor must be in (0.0, 1.0), got {}",
                self.decay_factor
            ));
        }
        if self.window_size == 0 {
            return Err("window_size must be > 0".to_string());
        }
        if self.max_hotspots == 0 {
            return Err("max_hotspots must be > 0".to_string());
        }
        if !self.heat_epsilon.is_finite() || self.heat_epsilon < 0.0 {
            return Err(format!(
                "heat_epsilon must be a non-negative number, got {}",
                self.heat_epsilon
            ));
        }
        Ok(())
    }
}

/// Parameters for the semantic search request (Tier B).
///
/// The request is only described here; executing it is up to the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticConfig {
    /// Maximum number of matches requested
    #[serde(default = "default_max_results")]
    pub max_results: u32,

    /// Minimum similarity score requested
    #[serde(default = "default_min_score")]
    pub min_score: f32,

    /// Document globs the search is expected to cover
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,
}

fn default_max_results() -> u32 {
    5
}
fn default_min_score() -> f32 {
    0.6
}
fn default_sources() -> Vec<String> {
    to_strings(&[
        "MEMORY.md",
        "TOOLS.md",
        "LESSONS.md",
        "memory/*.md",
        "skills/*/SKILL.md",
    ])
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            min_score: default_min_score(),
            sources: default_sources(),
        }
    }
}

/// Static topic tables: keyword detection and curated resource paths.
///
/// Both are plain data. Overriding a table in a config file replaces it
/// wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicTables {
    /// Topic -> substrings that indicate it (matched case-insensitively)
    #[serde(default = "default_keywords")]
    pub keywords: BTreeMap<String, Vec<String>>,

    /// Topic -> resource paths to preload when the topic is hot
    #[serde(default = "default_paths")]
    pub paths: BTreeMap<String, Vec<String>>,
}

fn default_keywords() -> BTreeMap<String, Vec<String>> {
    table(&[
        ("github", &["github", "repo", "git", "commit", "pr", "issue"]),
        (
            "defi",
            &["defi", "swap", "uniswap", "wallet", "eth", "usdc", "token"],
        ),
        (
            "model_router",
            &["model", "router", "deepseek", "claude", "gemini", "openrouter"],
        ),
        ("memory", &["memory", "记忆", "compression", "token", "memos"]),
        (
            "browser",
            &["browser", "actionbook", "automation", "screenshot"],
        ),
        ("email", &["email", "protonmail", "mail", "邮件"]),
        ("twitter", &["twitter", "x.com", "tweet", "bird"]),
        (
            "coding",
            &["code", "代码", "debug", "bug", "programming", "function"],
        ),
        (
            "git",
            &[
                "git", "github", "push", "pull", "commit", "clone", "merge", "branch",
            ],
        ),
        (
            "file_ops",
            &["file", "encrypt", "decrypt", "save", "文件", "保存", "加密"],
        ),
        (
            "security",
            &["password", "passphrase", "encrypt", "decrypt", "credential"],
        ),
    ])
}

fn default_paths() -> BTreeMap<String, Vec<String>> {
    table(&[
        (
            "github",
            &["MEMORY.md#GitHub Account", ".credentials-info.md", "TOOLS.md"],
        ),
        (
            "defi",
            &["MEMORY.md#DeFi Operations", ".tony-wallet-info.md"],
        ),
        (
            "model_router",
            &["MODEL-ROUTER-USAGE.md", "MEMORY.md#OpenRouter"],
        ),
        (
            "memory",
            &["OPENCLAW-MEMORY-SYSTEM.md", "TOOLS.md#token-compressor"],
        ),
        ("browser", &["TOOLS.md#actionbook", "TOOLS.md#Browser"]),
        ("email", &["MEMORY.md#Email", ".credentials-info.md"]),
        (
            "git",
            &[
                "MEMORY.md#GitHub Account",
                ".credentials-info.md",
                "workflow-analysis.md",
            ],
        ),
        ("file_ops", &["TOOLS.md", "LESSONS.md#文件操作"]),
        ("coding", &["LESSONS.md", "AGENTS.md#Working Principles"]),
    ])
}

impl Default for TopicTables {
    fn default() -> Self {
        Self {
            keywords: default_keywords(),
            paths: default_paths(),
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn table(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(topic, values)| (topic.to_string(), to_strings(values)))
        .collect()
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Root of the agent's document tree (`~` is expanded)
    #[serde(default = "default_workspace_dir")]
    pub workspace_dir: String,

    /// Hotspot state file; defaults to `<workspace_dir>/.session-hotspots.json`
    #[serde(default)]
    pub state_path: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Resources loaded on every plan (Tier A)
    #[serde(default = "default_always_load")]
    pub always_load: Vec<String>,

    /// Semantic search request parameters (Tier B)
    #[serde(default)]
    pub semantic: SemanticConfig,

    /// Hotspot tracking parameters (Tier C)
    #[serde(default)]
    pub hotspot: HotspotConfig,

    /// Keyword and resource tables
    #[serde(default)]
    pub topics: TopicTables,
}

fn default_workspace_dir() -> String {
    "~/.openclaw/workspace".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_always_load() -> Vec<String> {
    to_strings(&["SOUL.md", "USER.md", "AGENTS.md"])
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            workspace_dir: default_workspace_dir(),
            state_path: None,
            log_level: default_log_level(),
            always_load: default_always_load(),
            semantic: SemanticConfig::default(),
            hotspot: HotspotConfig::default(),
            topics: TopicTables::default(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (<config_dir>/session-preload/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (PRELOAD_*, `__` between nested keys)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, PreloadError> {
        let config_dir = ProjectDirs::from("", "", "session-preload")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("workspace_dir", default_workspace_dir())
            .map_err(|e| PreloadError::Config(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| PreloadError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Format: PRELOAD_LOG_LEVEL, PRELOAD_HOTSPOT__DECAY_FACTOR, etc.
        builder = builder.add_source(
            Environment::with_prefix("PRELOAD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| PreloadError::Config(e.to_string()))?;

        let settings: Settings = config
            .try_deserialize()
            .map_err(|e| PreloadError::Config(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Check cross-field invariants.
    pub fn validate(&self) -> Result<(), PreloadError> {
        self.hotspot.validate().map_err(PreloadError::Config)?;
        if !(0.0..=1.0).contains(&self.semantic.min_score) {
            return Err(PreloadError::Config(format!(
                "semantic.min_score must be 0.0-1.0, got {}",
                self.semantic.min_score
            )));
        }
        Ok(())
    }

    /// Workspace directory with `~` expanded.
    pub fn expanded_workspace_dir(&self) -> PathBuf {
        expand_home(&self.workspace_dir)
    }

    /// Resolved location of the hotspot state file.
    pub fn resolved_state_path(&self) -> PathBuf {
        match &self.state_path {
            Some(path) => expand_home(path),
            None => self.expanded_workspace_dir().join(STATE_FILE_NAME),
        }
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(dirs) = BaseDirs::new() {
            return dirs.home_dir().join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_hotspot_defaults() {
        let config = HotspotConfig::default();
        assert_eq!(config.window_size, 10);
        assert_eq!(config.threshold_count, 3);
        assert!((config.decay_factor - 0.8).abs() < f64::EPSILON);
        assert!((config.heat_epsilon - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.max_hotspots, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_hotspot_validation() {
        let mut config = HotspotConfig::default();

        config.decay_factor = 1.0;
        assert!(config.validate().is_err());

        config.decay_factor = 0.0;
        assert!(config.validate().is_err());

        config.decay_factor = 0.5;
        config.window_size = 0;
        assert!(config.validate().is_err());

        config.window_size = 3;
        config.max_hotspots = 0;
        assert!(config.validate().is_err());

        config.max_hotspots = 2;
        config.heat_epsilon = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_semantic_defaults() {
        let config = SemanticConfig::default();
        assert_eq!(config.max_results, 5);
        assert!((config.min_score - 0.6).abs() < f32::EPSILON);
        assert!(config.sources.contains(&"memory/*.md".to_string()));
    }

    #[test]
    fn test_default_tables() {
        let tables = TopicTables::default();
        assert!(tables.keywords["github"].contains(&"commit".to_string()));
        assert!(tables.keywords.contains_key("security"));
        // security has no curated paths
        assert!(!tables.paths.contains_key("security"));
        assert_eq!(tables.paths["defi"].len(), 2);
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.always_load, vec!["SOUL.md", "USER.md", "AGENTS.md"]);
        assert_eq!(settings.log_level, "warn");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_state_path_defaults_into_workspace() {
        let settings = Settings {
            workspace_dir: "/tmp/ws".to_string(),
            ..Settings::default()
        };
        assert_eq!(
            settings.resolved_state_path(),
            PathBuf::from("/tmp/ws").join(STATE_FILE_NAME)
        );

        let settings = Settings {
            state_path: Some("/var/tmp/hot.json".to_string()),
            ..settings
        };
        assert_eq!(
            settings.resolved_state_path(),
            PathBuf::from("/var/tmp/hot.json")
        );
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/abs/path"), PathBuf::from("/abs/path"));
        if let Some(dirs) = BaseDirs::new() {
            assert_eq!(expand_home("~/ws"), dirs.home_dir().join("ws"));
        }
    }

    #[test]
    fn test_load_from_cli_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("preload.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "workspace_dir = \"/tmp/agent\"\n\n[hotspot]\ndecay_factor = 0.5\nmax_hotspots = 2"
        )
        .unwrap();

        let settings = Settings::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(settings.workspace_dir, "/tmp/agent");
        assert!((settings.hotspot.decay_factor - 0.5).abs() < f64::EPSILON);
        assert_eq!(settings.hotspot.max_hotspots, 2);
        // untouched fields keep their defaults
        assert_eq!(settings.hotspot.window_size, 10);
        assert!(settings.topics.keywords.contains_key("github"));
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[hotspot]\ndecay_factor = 1.5\n").unwrap();

        let err = Settings::load(Some(path.to_str().unwrap())).unwrap_err();
        assert!(err.to_string().contains("decay_factor"));
    }

    #[test]
    fn test_settings_serialization() {
        let settings = Settings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let parsed: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.hotspot.window_size, settings.hotspot.window_size);
        assert_eq!(parsed.topics.paths, settings.topics.paths);
    }
}
