//! Weekly issue rendering.
//!
//! Turns a [`WeeklyIssue`] into the Markdown document that later gets
//! converted into Notion blocks. The output sticks to the subset the block
//! converter understands: headings, a tagline quote, bullet items, bold
//! runs, inline links, and dividers.

use crate::classify::{categorize, Section};
use crate::models::{Article, Importance, WeeklyIssue};
use crate::utils::star_rating;
use std::fmt::Write;

/// Newsletter masthead used in page titles and the issue heading.
pub const NEWSLETTER_NAME: &str = "Solo Builder Weekly";

const TAGLINE: &str = "Become the one-person team that ships.";

/// Title of the published Notion page for a given issue.
pub fn page_title(week_number: u32) -> String {
    format!("{} #{:02}", NEWSLETTER_NAME, week_number)
}

/// Render the full Markdown document for one issue.
pub fn render_issue(issue: &WeeklyIssue) -> String {
    let mut md = String::new();

    writeln!(md, "# {} #{:02}", NEWSLETTER_NAME, issue.week_number).unwrap();
    writeln!(md, "> {}", TAGLINE).unwrap();
    writeln!(md).unwrap();

    writeln!(md, "## 🎯 This Week's Briefing").unwrap();
    writeln!(md).unwrap();
    writeln!(md, "Hello again! Another week, another digest.").unwrap();
    writeln!(md).unwrap();
    writeln!(
        md,
        "I pulled {} articles worth your time out of the archive this week. \
         Putting these together always teaches me something, and this issue ranges \
         from AI news to tools to a few ideas that made me stop and think.",
        issue.articles.len()
    )
    .unwrap();
    writeln!(md).unwrap();
    writeln!(md, "Let's get into it.").unwrap();
    writeln!(md).unwrap();

    for (section, articles) in categorize(&issue.articles) {
        if articles.is_empty() {
            continue;
        }
        render_section(&mut md, section, &articles);
    }

    if let Some(pick) = issue
        .articles
        .iter()
        .find(|a| a.importance == Importance::High)
    {
        render_pick(&mut md, pick);
    }

    render_closing(&mut md, issue);
    md
}

fn render_section(md: &mut String, section: Section, articles: &[&Article]) {
    writeln!(md, "## {} {}", section.icon(), section.title()).unwrap();
    writeln!(md).unwrap();

    for (i, article) in articles.iter().enumerate() {
        if i == 0 {
            writeln!(
                md,
                "{}First up: \"{}\".",
                section.lead_in(),
                article.title
            )
            .unwrap();
        } else {
            writeln!(md, "Also worth a look: \"{}\".", article.title).unwrap();
        }
        writeln!(md).unwrap();
        writeln!(md, "{}", article.summary).unwrap();
        writeln!(md).unwrap();

        if section == Section::AiTools {
            writeln!(md, "- **Rating**: {}", star_rating(article.importance)).unwrap();
        }
        writeln!(md, "- **Source**: [{}]({})", article.title, article.url).unwrap();
        writeln!(md).unwrap();
    }
}

fn render_pick(md: &mut String, pick: &Article) {
    writeln!(md, "## 📚 Pick of the Week").unwrap();
    writeln!(md).unwrap();
    writeln!(
        md,
        "**If you only read one thing**, make it \"{}\".",
        pick.title
    )
    .unwrap();
    writeln!(md).unwrap();
    writeln!(
        md,
        "Why? {}... That kind of thinking goes straight into your own work.",
        excerpt(&pick.summary, 50)
    )
    .unwrap();
    writeln!(md).unwrap();
}

fn render_closing(md: &mut String, issue: &WeeklyIssue) {
    writeln!(md, "## 🎉 Closing Notes").unwrap();
    writeln!(md).unwrap();
    writeln!(
        md,
        "That's issue {:02}. Each one feels a little sharper than the last.",
        issue.week_number
    )
    .unwrap();
    writeln!(md).unwrap();
    writeln!(
        md,
        "A question I keep coming back to: with this much to read, what actually \
         matters? Not the impressive-sounding theory, but the insight you can act \
         on this week."
    )
    .unwrap();
    writeln!(md).unwrap();
    writeln!(
        md,
        "Hope something in here sparked an idea. Hit reply and tell me what you're \
         building."
    )
    .unwrap();
    writeln!(md).unwrap();
    writeln!(md, "---").unwrap();
    writeln!(md, "💌 If this was useful, pass it along to a friend").unwrap();
    writeln!(md).unwrap();
    writeln!(md, "**Thanks for reading!**").unwrap();
    writeln!(md).unwrap();
    writeln!(md, "---").unwrap();
    writeln!(md, "*{} - published every Sunday*", NEWSLETTER_NAME).unwrap();
    writeln!(
        md,
        "*Issue {:02} | {}*",
        issue.week_number, issue.local_date
    )
    .unwrap();
}

/// First `max` characters of a summary, char-boundary safe.
fn excerpt(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
