//! Keyword search over the workspace document tree.
//!
//! Used for ad-hoc lookups outside the hotspot path: a case-insensitive
//! substring match over markdown files, returning the first hits in path
//! order.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::PlannerError;
use crate::plan::preview;

/// One matching line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// File path relative to the search root
    pub path: PathBuf,
    /// 1-based line number
    pub line_number: usize,
    /// Trimmed, possibly truncated line text
    pub snippet: String,
}

/// Searches a document tree for a query string.
pub trait DocumentSearcher {
    /// Find lines under `root` matching `query`.
    fn search(&self, query: &str, root: &Path) -> Result<Vec<SearchHit>, PlannerError>;
}

/// Case-insensitive substring search over files with given extensions.
#[derive(Debug, Clone)]
pub struct KeywordSearcher {
    extensions: Vec<String>,
    max_hits: usize,
    snippet_chars: usize,
}

impl Default for KeywordSearcher {
    fn default() -> Self {
        Self {
            extensions: vec!["md".to_string()],
            max_hits: 20,
            snippet_chars: 80,
        }
    }
}

impl KeywordSearcher {
    /// Create a searcher for markdown files with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of hits returned.
    pub fn with_max_hits(mut self, max_hits: usize) -> Self {
        self.max_hits = max_hits;
        self
    }

    /// Set the file extensions searched.
    pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions = extensions.iter().map(|e| e.to_string()).collect();
        self
    }

    fn wants(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }
}

impl DocumentSearcher for KeywordSearcher {
    fn search(&self, query: &str, root: &Path) -> Result<Vec<SearchHit>, PlannerError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Err(PlannerError::InvalidInput("search query is empty".to_string()));
        }
        if !root.is_dir() {
            return Err(PlannerError::Search(format!(
                "workspace not found: {}",
                root.display()
            )));
        }

        let mut hits = Vec::new();
        let entries = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!(error = %e, "Skipping unreadable entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && self.wants(entry.path()));

        for entry in entries {
            let content = match fs::read_to_string(entry.path()) {
                Ok(content) => content,
                Err(e) => {
                    debug!(path = ?entry.path(), error = %e, "Skipping unreadable file");
                    continue;
                }
            };

            let relative = entry
                .path()
                .strip_prefix(root)
                .unwrap_or(entry.path())
                .to_path_buf();

            for (idx, line) in content.lines().enumerate() {
                if !line.to_lowercase().contains(&needle) {
                    continue;
                }
                hits.push(SearchHit {
                    path: relative.clone(),
                    line_number: idx + 1,
                    snippet: preview(line.trim(), self.snippet_chars),
                });
                if hits.len() >= self.max_hits {
                    return Ok(hits);
                }
            }
        }

        Ok(hits)
    }
}
