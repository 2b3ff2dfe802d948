//! Weekly scheduler.
//!
//! Sleeps until the next Sunday 09:00 local time, runs the generate-and-
//! publish pipeline, logs a completion notification, and repeats. A failed
//! run is logged and the loop carries on to the next tick; the process
//! only exits on an outside signal.

use crate::cli::Cli;
use chrono::{Datelike, Duration, Local, NaiveDateTime, NaiveTime, Weekday};
use std::error::Error;
use tokio::time::sleep;
use tracing::{error, info, instrument};

/// Day the issue goes out.
pub const RUN_WEEKDAY: Weekday = Weekday::Sun;
/// Local hour (24h) the issue goes out.
pub const RUN_HOUR: u32 = 9;

/// The next Sunday 09:00 strictly after `now`, in naive local time.
pub fn next_run(now: NaiveDateTime) -> NaiveDateTime {
    let run_time = NaiveTime::from_hms_opt(RUN_HOUR, 0, 0).unwrap();
    let days_ahead = (RUN_WEEKDAY.num_days_from_monday() + 7
        - now.weekday().num_days_from_monday())
        % 7;
    let mut candidate = (now.date() + Duration::days(days_ahead as i64)).and_time(run_time);
    if candidate <= now {
        candidate += Duration::days(7);
    }
    candidate
}

/// Run the scheduler loop forever.
#[instrument(level = "info", skip_all)]
pub async fn run(args: &Cli) -> Result<(), Box<dyn Error>> {
    info!(weekday = ?RUN_WEEKDAY, hour = RUN_HOUR, "Scheduler started");

    loop {
        let now = Local::now().naive_local();
        let next = next_run(now);
        let wait = (next - now).to_std().unwrap_or_default();
        info!(next = %next, wait_secs = wait.as_secs(), "Sleeping until next issue");
        sleep(wait).await;

        match crate::generate_issue(args, None, true).await {
            Ok(outcome) => {
                info!(
                    file = %outcome.markdown_path,
                    articles = outcome.article_count,
                    page_url = outcome
                        .published
                        .as_ref()
                        .map(|p| p.url.as_str())
                        .unwrap_or(""),
                    finished_at = %Local::now().format("%Y-%m-%d %H:%M:%S"),
                    "Weekly issue generated"
                );
            }
            Err(e) => {
                error!(error = %e, "Scheduled run failed; will retry next week");
            }
        }
    }
}
