//! Data models for curated articles and generated weekly issues.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Article`]: One curated article record pulled from the Notion database
//! - [`Importance`]: The curator's importance rating for an article
//! - [`WeeklyIssue`]: Collection of articles selected for a single issue
//!
//! The serde renames on [`Importance`] match the select values used by the
//! articles database.

use serde::{Deserialize, Serialize};

/// The curator's importance rating for an article.
///
/// Drives the tool-section star rating and the Pick of the Week selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Importance {
    #[serde(rename = "High")]
    High,
    #[serde(rename = "Medium")]
    Medium,
    #[serde(rename = "Low")]
    Low,
}

impl Importance {
    /// Parse a database select value, defaulting to `Low` for anything
    /// unrecognized (including an unset select).
    pub fn from_select(value: &str) -> Self {
        match value {
            "High" => Importance::High,
            "Medium" => Importance::Medium,
            _ => Importance::Low,
        }
    }
}

/// One curated article as stored in the articles database.
///
/// Records arrive with the curator's summary already written; this
/// application only selects, classifies, and renders them.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Article {
    /// The article title.
    pub title: String,
    /// The curator's summary of the article.
    pub summary: String,
    /// Link to the original article.
    pub url: String,
    /// The curator's own category label, if any (e.g. "AI", "Design").
    pub category: String,
    /// Importance rating from the database select.
    pub importance: Importance,
    /// The date the article was archived, in `YYYY-MM-DD` format.
    pub archived_date: String,
    /// Topic tags from the database multi-select.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Article {
    /// Extract the host of the source URL for compact attribution.
    /// For example: "https://www.revenuecat.com/blog/..." -> "www.revenuecat.com"
    pub fn source_domain(&self) -> Option<String> {
        url::Url::parse(&self.url)
            .ok()
            .and_then(|parsed| parsed.host_str().map(|h| h.to_string()))
    }
}

/// The set of articles selected for one weekly issue.
///
/// Each pipeline run produces one `WeeklyIssue`, which is rendered to
/// Markdown and serialized to a JSON snapshot next to it.
#[derive(Debug, Deserialize, Serialize)]
pub struct WeeklyIssue {
    /// ISO week number of the issue.
    pub week_number: u32,
    /// The date the issue was generated, in `YYYY-MM-DD` format.
    pub local_date: String,
    /// The articles included in this issue.
    pub articles: Vec<Article>,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_article(title: &str, importance: Importance) -> Article {
        Article {
            title: title.to_string(),
            summary: "A summary.".to_string(),
            url: "https://example.com/post".to_string(),
            category: String::new(),
            importance,
            archived_date: "2025-05-23".to_string(),
            tags: vec![],
        }
    }

    #[test]
    fn test_importance_from_select() {
        assert_eq!(Importance::from_select("High"), Importance::High);
        assert_eq!(Importance::from_select("Medium"), Importance::Medium);
        assert_eq!(Importance::from_select("Low"), Importance::Low);
        assert_eq!(Importance::from_select(""), Importance::Low);
        assert_eq!(Importance::from_select("urgent"), Importance::Low);
    }

    #[test]
    fn test_source_domain() {
        let article = sample_article("Test", Importance::High);
        assert_eq!(article.source_domain(), Some("example.com".to_string()));
    }

    #[test]
    fn test_source_domain_invalid_url() {
        let mut article = sample_article("Test", Importance::Low);
        article.url = "not a url".to_string();
        assert_eq!(article.source_domain(), None);
    }

    #[test]
    fn test_issue_serialization_round_trip() {
        let issue = WeeklyIssue {
            week_number: 21,
            local_date: "2025-05-23".to_string(),
            articles: vec![sample_article("Test", Importance::Medium)],
        };

        let json = serde_json::to_string(&issue).unwrap();
        assert!(json.contains("2025-05-23"));
        assert!(json.contains("\"Medium\""));

        let back: WeeklyIssue = serde_json::from_str(&json).unwrap();
        assert_eq!(back.week_number, 21);
        assert_eq!(back.articles.len(), 1);
        assert_eq!(back.articles[0].title, "Test");
    }
}
