//! Session preload CLI library.
//!
//! Exposes argument parsing and command handlers so they can be tested
//! without spawning the binary.

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands};
pub use commands::{
    handle_plan, handle_reset, handle_search, init_logging, load_settings, plan_output,
    reset_report, search_report, show_status, status_report,
};
