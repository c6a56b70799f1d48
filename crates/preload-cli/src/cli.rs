//! CLI argument parsing for session-preload.
//!
//! CLI flags override every other configuration source.

use clap::{Parser, Subcommand};

/// Session Preload
///
/// Decides which background files a conversational agent should load for
/// the current message.
#[derive(Parser, Debug)]
#[command(name = "session-preload")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default <config_dir>/session-preload/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Override the hotspot state file
    #[arg(long, global = true)]
    pub state_path: Option<String>,

    /// Override the workspace directory
    #[arg(short, long, global = true)]
    pub workspace: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Preload commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a preload plan for a user message
    Plan {
        /// The user message (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show current session hotspots
    Status,

    /// Forget all tracked session hotspots
    Reset,

    /// Keyword search over workspace markdown files
    Search {
        /// Text to look for (case-insensitive)
        query: String,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

impl Commands {
    /// Joined message text for `plan`.
    pub fn message_text(message: &[String]) -> String {
        message.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_plan_joins_words() {
        let cli = Cli::parse_from(["session-preload", "plan", "swap", "some", "eth"]);
        match cli.command {
            Commands::Plan { message, json } => {
                assert_eq!(Commands::message_text(&message), "swap some eth");
                assert!(!json);
            }
            _ => panic!("Expected Plan command"),
        }
    }

    #[test]
    fn test_cli_plan_json() {
        let cli = Cli::parse_from(["session-preload", "plan", "--json", "hello"]);
        match cli.command {
            Commands::Plan { json, .. } => assert!(json),
            _ => panic!("Expected Plan command"),
        }
    }

    #[test]
    fn test_cli_plan_requires_message() {
        let result = Cli::try_parse_from(["session-preload", "plan"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_search_requires_query() {
        assert!(Cli::try_parse_from(["session-preload", "search"]).is_err());

        let cli = Cli::parse_from(["session-preload", "search", "GitHub config"]);
        match cli.command {
            Commands::Search { query } => assert_eq!(query, "GitHub config"),
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_cli_status_and_reset() {
        let cli = Cli::parse_from(["session-preload", "status"]);
        assert!(matches!(cli.command, Commands::Status));

        let cli = Cli::parse_from(["session-preload", "reset"]);
        assert!(matches!(cli.command, Commands::Reset));
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::parse_from([
            "session-preload",
            "status",
            "--state-path",
            "/tmp/hot.json",
            "--workspace",
            "/tmp/ws",
            "--log-level",
            "debug",
        ]);
        assert_eq!(cli.state_path.as_deref(), Some("/tmp/hot.json"));
        assert_eq!(cli.workspace.as_deref(), Some("/tmp/ws"));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["session-preload"]).is_err());
    }
}
