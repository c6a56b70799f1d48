//! Keyword-based topic extraction.
//!
//! Topics come from a fixed table of `topic -> keywords`. A message matches a
//! topic when any of its keywords occurs as a substring of the lower-cased
//! message. Extraction is pure and never fails: empty or unrecognized text
//! yields an empty set.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::types::TopicTag;

/// Maps messages to topic tags using a static keyword table.
#[derive(Debug, Clone)]
pub struct TopicExtractor {
    /// Topic tag with its lower-cased, non-empty keywords
    table: Vec<(TopicTag, Vec<String>)>,
}

impl TopicExtractor {
    /// Build an extractor from a keyword table.
    ///
    /// Keywords are lower-cased once here; empty keywords are dropped since
    /// they would match every message.
    pub fn new(keywords: &BTreeMap<TopicTag, Vec<String>>) -> Self {
        let table = keywords
            .iter()
            .map(|(topic, words)| {
                let words = words
                    .iter()
                    .map(|w| w.trim().to_lowercase())
                    .filter(|w| !w.is_empty())
                    .collect();
                (topic.clone(), words)
            })
            .collect();

        Self { table }
    }

    /// Extract the set of topics mentioned in `message`.
    pub fn extract(&self, message: &str) -> BTreeSet<TopicTag> {
        let text = message.to_lowercase();

        let topics: BTreeSet<TopicTag> = self
            .table
            .iter()
            .filter(|(_, words)| words.iter().any(|w| text.contains(w.as_str())))
            .map(|(topic, _)| topic.clone())
            .collect();

        debug!(topics = ?topics, "Extracted topics");
        topics
    }

    /// Keywords of `topic` that occur in `message`, for explanations.
    pub fn matched_keywords(&self, topic: &str, message: &str) -> Vec<String> {
        let text = message.to_lowercase();
        self.table
            .iter()
            .find(|(t, _)| t == topic)
            .map(|(_, words)| {
                words
                    .iter()
                    .filter(|w| text.contains(w.as_str()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use preload_types::TopicTables;

    fn github_only() -> TopicExtractor {
        let mut keywords = BTreeMap::new();
        keywords.insert(
            "github".to_string(),
            vec![
                "github".to_string(),
                "repo".to_string(),
                "git".to_string(),
                "commit".to_string(),
            ],
        );
        TopicExtractor::new(&keywords)
    }

    fn set(items: &[&str]) -> BTreeSet<TopicTag> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_extract_single_topic() {
        let extractor = github_only();
        assert_eq!(
            extractor.extract("let's push this to github"),
            set(&["github"])
        );
    }

    #[test]
    fn test_extract_is_case_insensitive() {
        let extractor = github_only();
        assert_eq!(extractor.extract("Check the REPO"), set(&["github"]));
    }

    #[test]
    fn test_extract_empty_and_unmatched() {
        let extractor = github_only();
        assert!(extractor.extract("").is_empty());
        assert!(extractor.extract("what's for lunch?").is_empty());
    }

    #[test]
    fn test_keywords_lowercased_at_build() {
        let mut keywords = BTreeMap::new();
        keywords.insert("memory".to_string(), vec!["memOS".to_string()]);
        let extractor = TopicExtractor::new(&keywords);
        assert_eq!(extractor.extract("MemOS design"), set(&["memory"]));
    }

    #[test]
    fn test_empty_keyword_never_matches() {
        let mut keywords = BTreeMap::new();
        keywords.insert("noise".to_string(), vec!["".to_string(), "  ".to_string()]);
        let extractor = TopicExtractor::new(&keywords);
        assert!(extractor.extract("anything at all").is_empty());
    }

    #[test]
    fn test_default_table_multiple_topics() {
        let extractor = TopicExtractor::new(&TopicTables::default().keywords);
        let topics = extractor.extract("Encrypt the wallet password file");

        assert!(topics.contains("defi"));
        assert!(topics.contains("security"));
        assert!(topics.contains("file_ops"));
    }

    #[test]
    fn test_default_table_non_ascii_keywords() {
        let extractor = TopicExtractor::new(&TopicTables::default().keywords);
        assert!(extractor.extract("帮我整理记忆").contains("memory"));
    }

    #[test]
    fn test_matched_keywords() {
        let extractor = github_only();
        let mut matched = extractor.matched_keywords("github", "commit to the github repo");
        matched.sort();
        assert_eq!(matched, vec!["commit", "git", "github", "repo"]);
        assert!(extractor.matched_keywords("unknown", "github").is_empty());
    }
}
