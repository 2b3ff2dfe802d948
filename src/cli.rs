//! Command-line interface definitions.
//!
//! This module defines the CLI arguments and subcommands using the `clap`
//! crate. Global options cover the config file and output locations; each
//! pipeline entry point is a subcommand.

use crate::config::DEFAULT_CONFIG_PATH;
use clap::{Parser, Subcommand};

/// Command-line arguments for the weekly digest pipeline.
///
/// # Examples
///
/// ```sh
/// # Generate this week's issue into ./issues
/// notion_weekly -o ./issues generate
///
/// # Generate and publish in one go
/// notion_weekly generate --publish
///
/// # Publish a previously generated file
/// notion_weekly publish issues/solo_builder_weekly_21_20250523.md
///
/// # Run the Sunday 09:00 scheduler
/// notion_weekly schedule
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the JSON config file
    #[arg(short, long, env = "NOTION_WEEKLY_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Output directory for generated issue files
    #[arg(short, long, default_value = ".")]
    pub output_dir: String,

    /// Alias of the articles database in the config registry
    #[arg(long, default_value = "articles")]
    pub database: String,

    /// Alias of the database issues are published into
    #[arg(long, default_value = "weekly_publish")]
    pub publish_database: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate this week's issue from archived articles
    Generate {
        /// Override the ISO week number used in titles
        #[arg(short, long)]
        week: Option<u32>,

        /// Also publish the generated issue to Notion
        #[arg(short, long)]
        publish: bool,
    },

    /// List this week's archived articles with their sections
    Preview,

    /// Convert an existing Markdown issue file and publish it
    Publish {
        /// Path to the Markdown issue file
        file: String,

        /// Override the ISO week number used in the page title
        #[arg(short, long)]
        week: Option<u32>,
    },

    /// Run the weekly scheduler (every Sunday at 09:00 local time)
    Schedule,

    /// List the databases registered in the config file
    Databases,

    /// Register a database in the config registry
    AddDatabase {
        /// Display name of the database
        name: String,

        /// Database id
        id: String,

        /// Description stored alongside the entry
        #[arg(short, long, default_value = "")]
        description: String,

        /// Registry alias; defaults to the lowercased name with underscores
        #[arg(short, long)]
        alias: Option<String>,
    },
}
