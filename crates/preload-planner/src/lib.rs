//! # preload-planner
//!
//! Tiered preload planning for a conversational agent.
//!
//! For each user message the planner decides which background resources the
//! agent should load:
//!
//! - **Tier A**: a fixed list of core files, loaded every turn
//! - **Tier B**: a semantic search request, executed by the agent's own tool
//! - **Tier C**: curated files for the session's current topic hotspots
//!
//! It also offers a plain keyword search over the workspace for ad-hoc
//! lookups.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use preload_planner::PreloadOrchestrator;
//! use preload_types::Settings;
//!
//! let settings = Settings::load(None)?;
//! let mut orchestrator = PreloadOrchestrator::from_settings(&settings)?;
//! let plan = orchestrator.plan("when does the GitHub token expire?");
//! for command in plan.load_commands() {
//!     println!("{}", command);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod orchestrator;
pub mod plan;
pub mod search;

pub use error::PlannerError;
pub use orchestrator::PreloadOrchestrator;
pub use plan::{
    preview, resource_file, HotspotReason, LoadCommand, PreloadPlan, SemanticSearchRequest,
    SEMANTIC_SEARCH_ACTION,
};
pub use search::{DocumentSearcher, KeywordSearcher, SearchHit};
