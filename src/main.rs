//! # Notion Weekly
//!
//! An automation pipeline that turns a week of curated, archived articles
//! from a Notion database into a published weekly digest: articles are
//! pulled for the current week, bucketed into themed sections by keyword
//! matching, rendered as a Markdown issue, converted into Notion block
//! objects, and pushed back into Notion as a new page.
//!
//! ## Features
//!
//! - Queries archived articles for the current week (falling back to the
//!   previous week when the archive is empty)
//! - Buckets articles into six themed sections via a keyword table
//! - Renders a Markdown issue plus a JSON snapshot of the selection
//! - Converts the Markdown subset into typed Notion blocks with inline
//!   link and bold spans
//! - Publishes the block sequence as a page, batching past the API's
//!   100-block limit
//! - Optional scheduler that fires every Sunday at 09:00 local time
//!
//! ## Usage
//!
//! ```sh
//! notion_weekly -o ./issues generate --publish
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Query**: Fetch the week's archived articles from Notion
//! 2. **Classify**: Bucket articles into themed sections
//! 3. **Render**: Generate the Markdown issue
//! 4. **Convert**: Turn the Markdown into typed blocks
//! 5. **Publish**: Create the Notion page from the block sequence

use chrono::Local;
use clap::Parser;
use itertools::Itertools;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod blocks;
mod classify;
mod cli;
mod config;
mod generator;
mod models;
mod notion;
mod scheduler;
mod utils;

use blocks::markdown_to_blocks;
use cli::{Cli, Command};
use config::{Config, PublishRecord};
use generator::{page_title, render_issue};
use models::{Article, WeeklyIssue};
use notion::client::NotionClient;
use notion::publish::{publish_issue, PublishedPage};
use notion::query::archived_articles_between;
use utils::{
    ensure_writable_dir, iso_week_number, issue_filename, last_week_bounds, truncate_for_log,
    week_bounds,
};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("notion_weekly starting up");

    let args = Cli::parse();
    debug!(?args.config, ?args.output_dir, "Parsed CLI arguments");

    match &args.command {
        Command::Generate { week, publish } => {
            let outcome = generate_issue(&args, *week, *publish).await?;
            info!(
                file = %outcome.markdown_path,
                articles = outcome.article_count,
                "Issue generated"
            );
            if let Some(page) = &outcome.published {
                info!(url = %page.url, title = %page.title, "Issue published");
            }
        }
        Command::Preview => preview_articles(&args).await?,
        Command::Publish { file, week } => publish_file(&args, file, *week).await?,
        Command::Schedule => scheduler::run(&args).await?,
        Command::Databases => list_databases(&args)?,
        Command::AddDatabase {
            name,
            id,
            description,
            alias,
        } => add_database(&args, name, id, description, alias.as_deref())?,
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}

/// What one generate run produced.
pub(crate) struct GenerateOutcome {
    pub markdown_path: String,
    pub article_count: usize,
    pub published: Option<PublishedPage>,
}

/// Run the full generate pipeline: query, dedupe, classify, render, write,
/// and optionally publish.
///
/// A publish failure is logged and swallowed so the locally written issue
/// files always survive; every earlier failure aborts the run.
#[instrument(level = "info", skip_all, fields(publish = publish))]
pub(crate) async fn generate_issue(
    args: &Cli,
    week_override: Option<u32>,
    publish: bool,
) -> Result<GenerateOutcome, Box<dyn Error>> {
    let mut config = Config::load(&args.config)?;

    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let articles = fetch_week_articles(args, &config).await?;
    if articles.is_empty() {
        return Err("no archived articles found for this week or last".into());
    }

    let before = articles.len();
    let articles: Vec<Article> = articles
        .into_iter()
        .unique_by(|a| a.url.clone())
        .collect();
    if articles.len() < before {
        info!(
            dropped = before - articles.len(),
            "Dropped articles with duplicate URLs"
        );
    }

    let today = Local::now().date_naive();
    let week_number = week_override.unwrap_or_else(|| iso_week_number(today));
    let issue = WeeklyIssue {
        week_number,
        local_date: today.to_string(),
        articles,
    };
    info!(
        week = issue.week_number,
        count = issue.articles.len(),
        "Weekly issue assembled"
    );

    let md = render_issue(&issue);
    let markdown_path = format!(
        "{}/{}",
        args.output_dir.trim_end_matches('/'),
        issue_filename(issue.week_number, today)
    );
    tokio::fs::write(&markdown_path, &md).await?;
    info!(path = %markdown_path, "Wrote issue Markdown");

    // JSON snapshot of the selection next to the Markdown; losing it is
    // not worth failing the run over.
    let snapshot_path = format!("{}.json", markdown_path.trim_end_matches(".md"));
    match serde_json::to_string(&issue) {
        Ok(json) => {
            if let Err(e) = tokio::fs::write(&snapshot_path, json).await {
                error!(path = %snapshot_path, error = %e, "Failed to write issue snapshot");
            } else {
                info!(path = %snapshot_path, "Wrote issue snapshot");
            }
        }
        Err(e) => error!(error = %e, "Failed to serialize issue snapshot"),
    }

    let published = if publish {
        match publish_rendered(args, &mut config, &md, issue.week_number).await {
            Ok(page) => Some(page),
            Err(e) => {
                error!(error = %e, "Publish failed; the local issue files are intact");
                None
            }
        }
    } else {
        None
    };

    Ok(GenerateOutcome {
        markdown_path,
        article_count: issue.articles.len(),
        published,
    })
}

/// Fetch this week's archived articles, falling back to last week when the
/// current week is empty.
#[instrument(level = "info", skip_all)]
async fn fetch_week_articles(args: &Cli, config: &Config) -> Result<Vec<Article>, Box<dyn Error>> {
    let database_id = config
        .database_id(&args.database)
        .ok_or_else(|| format!("unknown database alias: {}", args.database))?;
    let client = NotionClient::new(config.api_token());

    let today = Local::now().date_naive();
    let (start, end) = week_bounds(today);
    let articles = archived_articles_between(&client, database_id, start, end).await?;
    if !articles.is_empty() {
        return Ok(articles);
    }

    warn!("No archived articles this week; falling back to last week");
    let (start, end) = last_week_bounds(today);
    archived_articles_between(&client, database_id, start, end).await
}

/// Convert rendered Markdown to blocks, create the page, and record the
/// publication in the config file.
#[instrument(level = "info", skip_all, fields(week_number = week_number))]
async fn publish_rendered(
    args: &Cli,
    config: &mut Config,
    markdown: &str,
    week_number: u32,
) -> Result<PublishedPage, Box<dyn Error>> {
    let database_id = config
        .database_id(&args.publish_database)
        .ok_or_else(|| format!("unknown publish database alias: {}", args.publish_database))?
        .to_string();
    let client = NotionClient::new(config.api_token());

    let blocks = markdown_to_blocks(markdown);
    info!(blocks = blocks.len(), "Converted issue Markdown to blocks");

    let title = page_title(week_number);
    let page = publish_issue(&client, &database_id, &title, &blocks).await?;

    config.record_publish(PublishRecord {
        database_id,
        page_title: page.title.clone(),
        page_id: page.page_id.clone(),
        published_time: Local::now().to_rfc3339(),
        url: page.url.clone(),
    });
    if let Err(e) = config.save(&args.config) {
        warn!(error = %e, "Failed to record publish history in config");
    }

    Ok(page)
}

/// Publish a previously generated Markdown issue file.
#[instrument(level = "info", skip_all, fields(%file))]
async fn publish_file(args: &Cli, file: &str, week_override: Option<u32>) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load(&args.config)?;
    let markdown = tokio::fs::read_to_string(file).await?;
    let week_number =
        week_override.unwrap_or_else(|| iso_week_number(Local::now().date_naive()));

    let page = publish_rendered(args, &mut config, &markdown, week_number).await?;
    info!(url = %page.url, title = %page.title, "Published issue from file");
    Ok(())
}

/// Print the database registry from the config file.
fn list_databases(args: &Cli) -> Result<(), Box<dyn Error>> {
    let config = Config::load(&args.config)?;

    println!("Configured databases:");
    for (alias, entry) in &config.notion.databases {
        println!("  {} - {} ({})", alias, entry.name, entry.id);
        if !entry.description.is_empty() {
            println!("      {}", entry.description);
        }
    }
    println!("default: {}", config.notion.quick_access.default_database);
    Ok(())
}

/// Register a database under an alias and save the config.
fn add_database(
    args: &Cli,
    name: &str,
    id: &str,
    description: &str,
    alias: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load(&args.config)?;

    let alias = alias
        .map(str::to_string)
        .unwrap_or_else(|| name.to_lowercase().replace(' ', "_"));
    let today = Local::now().date_naive().to_string();
    config.register_database(
        &alias,
        config::DatabaseEntry {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            created_date: Some(today.clone()),
            last_updated: Some(today),
            last_publish: None,
        },
    );
    config.save(&args.config)?;

    info!(%alias, %id, "Registered database");
    Ok(())
}

/// Print this week's archived articles with their classified sections.
async fn preview_articles(args: &Cli) -> Result<(), Box<dyn Error>> {
    let config = Config::load(&args.config)?;
    let articles = fetch_week_articles(args, &config).await?;

    if articles.is_empty() {
        println!("No archived articles found for this week or last.");
        return Ok(());
    }

    println!("Archived articles ({}):", articles.len());
    for (i, article) in articles.iter().enumerate() {
        let section = classify::section_for(article);
        let domain = article
            .source_domain()
            .unwrap_or_else(|| "unknown source".to_string());
        println!(
            "{:>2}. [{} {}] {} ({})",
            i + 1,
            section.icon(),
            section.title(),
            article.title,
            domain
        );
        println!("    {}", truncate_for_log(&article.summary, 100));
    }
    Ok(())
}
