//! Configuration file handling.
//!
//! The application reads and writes a single JSON config file
//! (`notion_config.json` by default) holding the Notion API token, a
//! registry of known databases keyed by alias, the quick-access default
//! database, and a history of published issues. The same file is updated in
//! place when a publish succeeds, so repeated runs accumulate their history.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::Path;
use tracing::{info, instrument};

/// Default config file path, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "notion_config.json";

/// Alias of the database registry entry used for published issues.
pub const PUBLISH_DB_ALIAS: &str = "weekly_publish";

/// Top-level config file structure.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub notion: NotionSettings,
}

/// Everything under the `notion` key.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotionSettings {
    /// Integration token used as the bearer token on every API call.
    pub api_token: String,
    /// Known databases keyed by alias.
    #[serde(default)]
    pub databases: BTreeMap<String, DatabaseEntry>,
    pub quick_access: QuickAccess,
    /// Records of past issue publications, newest last.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub publish_history: Vec<PublishRecord>,
}

/// One registered database.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    /// Timestamp of the most recent publish into this database.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_publish: Option<String>,
}

/// Shortcuts resolved before the database registry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuickAccess {
    /// Database id returned for the `articles`/`default` aliases.
    pub default_database: String,
}

/// One published issue, as recorded in the config file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PublishRecord {
    pub database_id: String,
    pub page_title: String,
    pub page_id: String,
    pub published_time: String,
    #[serde(default)]
    pub url: String,
}

impl Config {
    /// Load the config file from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or not valid JSON for this
    /// schema.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Config, Box<dyn Error>> {
        let raw = fs::read_to_string(path.as_ref())?;
        let config: Config = serde_json::from_str(&raw)?;
        info!(
            databases = config.notion.databases.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Write the config back to `path`, pretty-printed.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn Error>> {
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), raw)?;
        info!("Saved configuration");
        Ok(())
    }

    pub fn api_token(&self) -> &str {
        &self.notion.api_token
    }

    /// Resolve a database alias to its id.
    ///
    /// The aliases `articles` and `default` resolve to the quick-access
    /// default; anything else is looked up as a registry key first, then as
    /// a display name.
    pub fn database_id(&self, alias: &str) -> Option<&str> {
        if alias == "articles" || alias == "default" {
            return Some(&self.notion.quick_access.default_database);
        }
        self.notion
            .databases
            .get(alias)
            .or_else(|| {
                self.notion
                    .databases
                    .values()
                    .find(|entry| entry.name == alias)
            })
            .map(|entry| entry.id.as_str())
    }

    /// Register (or replace) a database under an alias.
    pub fn register_database(&mut self, alias: &str, entry: DatabaseEntry) {
        self.notion.databases.insert(alias.to_string(), entry);
    }

    /// Record a successful publish: append to the history and stamp the
    /// publish database entry.
    pub fn record_publish(&mut self, record: PublishRecord) {
        let entry = self
            .notion
            .databases
            .entry(PUBLISH_DB_ALIAS.to_string())
            .or_insert_with(|| DatabaseEntry {
                id: record.database_id.clone(),
                name: "Weekly publish database".to_string(),
                description: "Target database for published weekly issues".to_string(),
                created_date: None,
                last_updated: None,
                last_publish: None,
            });
        entry.last_publish = Some(record.published_time.clone());
        self.notion.publish_history.push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> Config {
        serde_json::from_str(
            r#"{
                "notion": {
                    "api_token": "secret-token",
                    "databases": {
                        "articles": {
                            "id": "db-articles",
                            "name": "Article archive",
                            "description": "Curated articles"
                        },
                        "weekly_publish": {
                            "id": "db-publish",
                            "name": "Weekly issues"
                        }
                    },
                    "quick_access": {
                        "default_database": "db-articles"
                    }
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_default_alias_resolution() {
        let config = sample_config();
        assert_eq!(config.database_id("articles"), Some("db-articles"));
        assert_eq!(config.database_id("default"), Some("db-articles"));
    }

    #[test]
    fn test_alias_by_key_and_name() {
        let config = sample_config();
        assert_eq!(config.database_id("weekly_publish"), Some("db-publish"));
        assert_eq!(config.database_id("Weekly issues"), Some("db-publish"));
        assert_eq!(config.database_id("missing"), None);
    }

    #[test]
    fn test_record_publish_appends_history_and_stamps_entry() {
        let mut config = sample_config();
        config.record_publish(PublishRecord {
            database_id: "db-publish".to_string(),
            page_title: "Solo Builder Weekly #21".to_string(),
            page_id: "page-1".to_string(),
            published_time: "2025-05-23T09:00:00Z".to_string(),
            url: "https://notion.so/page-1".to_string(),
        });

        assert_eq!(config.notion.publish_history.len(), 1);
        let entry = &config.notion.databases[PUBLISH_DB_ALIAS];
        assert_eq!(
            entry.last_publish.as_deref(),
            Some("2025-05-23T09:00:00Z")
        );
    }

    #[test]
    fn test_record_publish_creates_missing_entry() {
        let mut config = sample_config();
        config.notion.databases.remove(PUBLISH_DB_ALIAS);

        config.record_publish(PublishRecord {
            database_id: "db-new".to_string(),
            page_title: "Solo Builder Weekly #22".to_string(),
            page_id: "page-2".to_string(),
            published_time: "2025-05-30T09:00:00Z".to_string(),
            url: String::new(),
        });

        assert_eq!(config.notion.databases[PUBLISH_DB_ALIAS].id, "db-new");
    }

    #[test]
    fn test_serialization_round_trip() {
        let config = sample_config();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.api_token(), "secret-token");
        assert_eq!(back.database_id("articles"), Some("db-articles"));
    }

    #[test]
    fn test_save_and_load_file() {
        let mut path = std::env::temp_dir();
        path.push(format!("notion_weekly_config_test_{}.json", std::process::id()));

        let config = sample_config();
        config.save(&path).unwrap();
        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.api_token(), "secret-token");

        let _ = std::fs::remove_file(&path);
    }
}
