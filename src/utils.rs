//! Utility functions for week arithmetic, string formatting, and file
//! system checks.
//!
//! This module provides helper functions used throughout the application:
//! - ISO week numbers and Monday–Sunday week bounds for article queries
//! - Issue filename and star-rating formatting
//! - String truncation for logging
//! - File system validation for output directories

use crate::models::Importance;
use chrono::{Datelike, Duration, NaiveDate};
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// ISO week number of a date (1–53).
pub fn iso_week_number(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

/// Monday and Sunday of the week containing `date`.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    (monday, monday + Duration::days(6))
}

/// Monday and Sunday of the week before the one containing `date`.
pub fn last_week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let (monday, _) = week_bounds(date);
    let last_monday = monday - Duration::days(7);
    (last_monday, last_monday + Duration::days(6))
}

/// Filename for a generated issue, e.g.
/// `solo_builder_weekly_21_20250523.md`.
pub fn issue_filename(week_number: u32, date: NaiveDate) -> String {
    format!(
        "solo_builder_weekly_{:02}_{}.md",
        week_number,
        date.format("%Y%m%d")
    )
}

/// Star rating rendered in the tools section: high 5, medium 4, low 3.
pub fn star_rating(importance: Importance) -> String {
    let count = match importance {
        Importance::High => 5,
        Importance::Medium => 4,
        Importance::Low => 3,
    };
    "⭐".repeat(count)
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut at `max` characters with an ellipsis and byte count
/// indicator appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max).collect();
        format!("{}…(+{} bytes)", cut, s.len() - cut.len())
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if missing, then performs a write test by creating
/// and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or is not writable
/// (permission denied, read-only filesystem, etc.).
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    // Small sync write using std fs (simpler error surface).
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
