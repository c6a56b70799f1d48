//! Session Preload
//!
//! Plans which background files a conversational agent loads each turn.
//!
//! # Usage
//!
//! ```bash
//! session-preload plan "when does the GitHub token expire?" [--json]
//! session-preload status
//! session-preload reset
//! session-preload search "GitHub Account"
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (<config_dir>/session-preload/config.toml)
//! 3. Environment variables (PRELOAD_*)
//! 4. CLI flags

use anyhow::Result;

use preload_cli::{
    handle_plan, handle_reset, handle_search, init_logging, load_settings, show_status, Cli,
    Commands,
};

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    let settings = load_settings(&cli)?;
    init_logging(&settings)?;

    match cli.command {
        Commands::Plan { message, json } => {
            handle_plan(&settings, &Commands::message_text(&message), json)?;
        }
        Commands::Status => {
            show_status(&settings)?;
        }
        Commands::Reset => {
            handle_reset(&settings)?;
        }
        Commands::Search { query } => {
            handle_search(&settings, &query)?;
        }
    }

    Ok(())
}
