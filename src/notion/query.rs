//! Archived-article queries against the articles database.
//!
//! One query pulls every page whose status select is "Archived" and whose
//! added-date falls inside a Monday–Sunday range, following cursor
//! pagination to exhaustion. Pages are mapped into [`Article`] records;
//! pages without a title are logged and skipped rather than failing the
//! batch.

use crate::models::{Article, Importance};
use crate::notion::client::NotionClient;
use crate::notion::{
    PROP_ADDED, PROP_CATEGORY, PROP_IMPORTANCE, PROP_STATUS, PROP_SUMMARY, PROP_TAGS, PROP_TITLE,
    PROP_URL, STATUS_ARCHIVED,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::error::Error;
use tracing::{debug, info, instrument, warn};

/// Filter body selecting archived articles added within `start..=end`.
pub(crate) fn archived_filter(start: NaiveDate, end: NaiveDate) -> Value {
    json!({
        "and": [
            {
                "property": PROP_STATUS,
                "select": { "equals": STATUS_ARCHIVED }
            },
            {
                "property": PROP_ADDED,
                "date": { "on_or_after": start.to_string() }
            },
            {
                "property": PROP_ADDED,
                "date": { "on_or_before": end.to_string() }
            }
        ]
    })
}

/// Fetch all archived articles added in the given date range.
///
/// Follows `start_cursor` pagination until the API reports no more
/// results, so the caller sees the complete week regardless of page size.
#[instrument(level = "info", skip(client), fields(%database_id, %start, %end))]
pub async fn archived_articles_between(
    client: &NotionClient,
    database_id: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Article>, Box<dyn Error>> {
    let path = format!("databases/{}/query", database_id);
    let mut articles = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let mut body = json!({
            "filter": archived_filter(start, end),
            "page_size": 100
        });
        if let Some(c) = &cursor {
            body["start_cursor"] = json!(c);
        }

        let response = client.post(&path, &body).await?;
        let results = response["results"].as_array().cloned().unwrap_or_default();
        debug!(page_results = results.len(), "Query page received");

        for page in &results {
            match article_from_page(page) {
                Some(article) => articles.push(article),
                None => {
                    warn!(
                        page_id = page["id"].as_str().unwrap_or("<unknown>"),
                        "Page has no title; skipping"
                    );
                }
            }
        }

        if response["has_more"].as_bool().unwrap_or(false) {
            cursor = response["next_cursor"].as_str().map(str::to_string);
            if cursor.is_none() {
                break;
            }
        } else {
            break;
        }
    }

    info!(count = articles.len(), "Fetched archived articles");
    Ok(articles)
}

/// Map one database page into an [`Article`].
///
/// Returns `None` when the page carries no title; every other property
/// falls back to an empty value.
fn article_from_page(page: &Value) -> Option<Article> {
    let props = page.get("properties")?;

    let title = fragment_text(props.get(PROP_TITLE)?, "title")?;
    let summary = props
        .get(PROP_SUMMARY)
        .and_then(|p| fragment_text(p, "rich_text"))
        .unwrap_or_default();
    let url = props
        .get(PROP_URL)
        .and_then(|p| p["url"].as_str())
        .unwrap_or_default()
        .to_string();
    let category = props
        .get(PROP_CATEGORY)
        .and_then(|p| p["multi_select"][0]["name"].as_str())
        .unwrap_or_default()
        .to_string();
    let importance = props
        .get(PROP_IMPORTANCE)
        .and_then(|p| p["select"]["name"].as_str())
        .map(Importance::from_select)
        .unwrap_or(Importance::Low);
    // Date properties carry full timestamps; only the date part matters.
    let archived_date = props
        .get(PROP_ADDED)
        .and_then(|p| p["date"]["start"].as_str())
        .map(|s| s.chars().take(10).collect())
        .unwrap_or_default();
    let tags = props
        .get(PROP_TAGS)
        .and_then(|p| p["multi_select"].as_array())
        .map(|entries| {
            entries
                .iter()
                .filter_map(|e| e["name"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    Some(Article {
        title,
        summary,
        url,
        category,
        importance,
        archived_date,
        tags,
    })
}

/// First fragment's text content from a title or rich-text property.
fn fragment_text(prop: &Value, key: &str) -> Option<String> {
    prop.get(key)?
        .as_array()?
        .first()?
        .pointer("/text/content")?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_page() -> Value {
        json!({
            "id": "page-1",
            "properties": {
                "Title": {
                    "type": "title",
                    "title": [ { "text": { "content": "Churn postmortem" } } ]
                },
                "Summary": {
                    "type": "rich_text",
                    "rich_text": [ { "text": { "content": "Why users cancel." } } ]
                },
                "URL": { "type": "url", "url": "https://example.com/churn" },
                "Category": {
                    "type": "multi_select",
                    "multi_select": [ { "name": "Growth" } ]
                },
                "Importance": {
                    "type": "select",
                    "select": { "name": "High" }
                },
                "Added": {
                    "type": "date",
                    "date": { "start": "2025-05-21T10:30:00.000Z" }
                },
                "Tags": {
                    "type": "multi_select",
                    "multi_select": [ { "name": "retention" }, { "name": "subscriptions" } ]
                }
            }
        })
    }

    #[test]
    fn test_article_from_page() {
        let article = article_from_page(&sample_page()).unwrap();
        assert_eq!(article.title, "Churn postmortem");
        assert_eq!(article.summary, "Why users cancel.");
        assert_eq!(article.url, "https://example.com/churn");
        assert_eq!(article.category, "Growth");
        assert_eq!(article.importance, Importance::High);
        assert_eq!(article.archived_date, "2025-05-21");
        assert_eq!(article.tags, vec!["retention", "subscriptions"]);
    }

    #[test]
    fn test_untitled_page_is_skipped() {
        let mut page = sample_page();
        page["properties"]["Title"]["title"] = json!([]);
        assert!(article_from_page(&page).is_none());
    }

    #[test]
    fn test_missing_optional_properties_default() {
        let page = json!({
            "id": "page-2",
            "properties": {
                "Title": {
                    "type": "title",
                    "title": [ { "text": { "content": "Bare page" } } ]
                }
            }
        });

        let article = article_from_page(&page).unwrap();
        assert_eq!(article.title, "Bare page");
        assert_eq!(article.summary, "");
        assert_eq!(article.url, "");
        assert_eq!(article.category, "");
        assert_eq!(article.importance, Importance::Low);
        assert_eq!(article.archived_date, "");
        assert!(article.tags.is_empty());
    }

    #[test]
    fn test_archived_filter_shape() {
        let start = NaiveDate::from_ymd_opt(2025, 5, 19).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 5, 25).unwrap();
        let filter = archived_filter(start, end);

        let conditions = filter["and"].as_array().unwrap();
        assert_eq!(conditions.len(), 3);
        assert_eq!(conditions[0]["select"]["equals"], "Archived");
        assert_eq!(conditions[1]["date"]["on_or_after"], "2025-05-19");
        assert_eq!(conditions[2]["date"]["on_or_before"], "2025-05-25");
    }
}
