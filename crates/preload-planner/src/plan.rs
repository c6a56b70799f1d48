//! Preload plan types and load-command rendering.
//!
//! A plan groups resources into three tiers:
//! - Tier A: files loaded on every turn
//! - Tier B: a semantic search request for the agent's search tool
//! - Tier C: curated files for the session's current hotspots
//!
//! Plans also carry a rationale trail so the agent can see why each item
//! was included.

use std::fmt;

use serde::{Deserialize, Serialize};

use preload_hotspots::TopicRecord;

/// Name of the agent-side semantic search tool.
pub const SEMANTIC_SEARCH_ACTION: &str = "memory_search";

/// Semantic search request handed to the agent (Tier B).
///
/// Field names follow the search tool's own argument names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticSearchRequest {
    /// Tool to invoke
    pub action: String,
    /// Query text, the raw user message
    pub query: String,
    /// Maximum number of matches
    pub max_results: u32,
    /// Minimum similarity score
    pub min_score: f32,
}

impl SemanticSearchRequest {
    /// Build a request for `query`.
    pub fn new(query: impl Into<String>, max_results: u32, min_score: f32) -> Self {
        Self {
            action: SEMANTIC_SEARCH_ACTION.to_string(),
            query: query.into(),
            max_results,
            min_score,
        }
    }
}

/// Why a hot topic contributed to Tier C.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotspotReason {
    /// Topic tag
    pub topic: String,
    /// Mentions so far this session
    pub mention_count: u32,
    /// Current heat
    pub heat: f64,
    /// Tier C resources this topic introduced
    pub paths: Vec<String>,
    /// Keywords of this topic found in the current message
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

impl HotspotReason {
    /// Reason for `record` with the resources it introduced and the
    /// keywords that matched it in the current message.
    pub fn new(record: &TopicRecord, paths: Vec<String>, keywords: Vec<String>) -> Self {
        Self {
            topic: record.topic.clone(),
            mention_count: record.mention_count,
            heat: record.heat,
            paths,
            keywords,
        }
    }
}

/// Ranked preload instructions for one user message.
///
/// Plan fields are snake_case. `tier_b` is the argument payload of the
/// agent's `memory_search` tool and keeps that tool's camelCase names, so
/// it can be passed through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreloadPlan {
    /// Message the plan was built for
    pub message: String,
    /// Always-load resources
    pub tier_a: Vec<String>,
    /// Semantic search request, in the search tool's argument format
    pub tier_b: SemanticSearchRequest,
    /// Hotspot-derived resources, never repeating a Tier A item
    pub tier_c: Vec<String>,
    /// Hot topics behind Tier C, hottest first
    pub hotspots: Vec<HotspotReason>,
    /// Human-readable explanation of each tier
    pub rationale: Vec<String>,
    /// Non-fatal problems hit while planning
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl PreloadPlan {
    /// Render the plan as executable agent instructions.
    pub fn load_commands(&self) -> Vec<LoadCommand> {
        let mut commands: Vec<LoadCommand> =
            self.tier_a.iter().map(|p| LoadCommand::read(p)).collect();

        commands.push(LoadCommand::MemorySearch {
            query: self.tier_b.query.clone(),
            max_results: self.tier_b.max_results,
        });

        commands.extend(self.tier_c.iter().map(|p| LoadCommand::read(p)));
        commands
    }

    /// Convert to a user-facing report.
    pub fn to_report(&self) -> String {
        let mut lines = Vec::new();

        lines.push("Smart Preload Report".to_string());
        lines.push(String::new());
        lines.push("Loading Strategy:".to_string());
        for line in &self.rationale {
            lines.push(format!("  {}", line));
        }

        lines.push(String::new());
        lines.push("Commands to Execute:".to_string());
        for (i, command) in self.load_commands().iter().enumerate() {
            lines.push(format!("  {}. {}", i + 1, command));
        }

        lines.push(String::new());
        lines.push("Session Context:".to_string());
        if self.hotspots.is_empty() {
            lines.push("  (no hot topics yet)".to_string());
        } else {
            for hot in &self.hotspots {
                lines.push(format!(
                    "  - {}: {} mentions (heat: {:.2})",
                    hot.topic, hot.mention_count, hot.heat
                ));
            }
        }

        if !self.warnings.is_empty() {
            lines.push(String::new());
            lines.push("Warnings:".to_string());
            for warning in &self.warnings {
                lines.push(format!("  ! {}", warning));
            }
        }

        lines.join("\n")
    }
}

/// One instruction for the agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadCommand {
    /// Read a file, optionally focusing on one section
    Read {
        /// File path relative to the workspace
        path: String,
        /// Section anchor taken from a `file#section` identifier
        focus: Option<String>,
    },
    /// Run the semantic search tool
    MemorySearch {
        /// Query text
        query: String,
        /// Maximum number of matches
        max_results: u32,
    },
}

impl LoadCommand {
    /// Read command for a resource identifier, splitting any `#section` anchor.
    pub fn read(resource: &str) -> Self {
        match resource.split_once('#') {
            Some((path, section)) => LoadCommand::Read {
                path: path.to_string(),
                focus: Some(section.to_string()),
            },
            None => LoadCommand::Read {
                path: resource.to_string(),
                focus: None,
            },
        }
    }
}

impl fmt::Display for LoadCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadCommand::Read { path, focus: None } => write!(f, "read(\"{}\")", path),
            LoadCommand::Read {
                path,
                focus: Some(section),
            } => write!(f, "read(\"{}\") // focus: {}", path, section),
            LoadCommand::MemorySearch { query, max_results } => write!(
                f,
                "{}({{query: \"{}\", maxResults: {}}})",
                SEMANTIC_SEARCH_ACTION, query, max_results
            ),
        }
    }
}

/// File part of a resource identifier (`TOOLS.md#Browser` -> `TOOLS.md`).
pub fn resource_file(resource: &str) -> &str {
    resource.split_once('#').map_or(resource, |(file, _)| file)
}

/// First `max_chars` characters of `text`, with `...` appended when cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
