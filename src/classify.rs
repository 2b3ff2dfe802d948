//! Keyword-based bucketing of articles into the digest's themed sections.
//!
//! Classification is a flat table lookup: each [`Section`] carries a keyword
//! list, and an article lands in the section whose keywords score the most
//! hits against its lowercased title and summary. The curator's own category
//! label, when it maps cleanly onto a section, wins over keyword scoring.
//! Articles nothing matches fall into [`Section::SoloInsights`].

use crate::models::Article;
use once_cell::sync::Lazy;

/// The themed sections of an issue, in the order they are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    AiFrontier,
    AiTools,
    ProductCraft,
    GrowthOps,
    DesignPicks,
    SoloInsights,
}

impl Section {
    /// Every section in render priority order.
    pub const ALL: [Section; 6] = [
        Section::AiFrontier,
        Section::AiTools,
        Section::ProductCraft,
        Section::GrowthOps,
        Section::DesignPicks,
        Section::SoloInsights,
    ];

    /// Display title used in section headings.
    pub fn title(self) -> &'static str {
        match self {
            Section::AiFrontier => "AI Frontier",
            Section::AiTools => "AI Tools of the Week",
            Section::ProductCraft => "Product Craft",
            Section::GrowthOps => "Growth & Ops",
            Section::DesignPicks => "Design Picks",
            Section::SoloInsights => "Solo Insights",
        }
    }

    /// Emoji icon rendered in front of the section title.
    pub fn icon(self) -> &'static str {
        match self {
            Section::AiFrontier => "🤖",
            Section::AiTools => "🛠️",
            Section::ProductCraft => "🚀",
            Section::GrowthOps => "📈",
            Section::DesignPicks => "🎨",
            Section::SoloInsights => "💡",
        }
    }

    /// Conversational lead-in that opens the section body.
    pub fn lead_in(self) -> &'static str {
        match self {
            Section::AiFrontier => "The AI world kept moving this week. ",
            Section::AiTools => "A few tools caught my eye. ",
            Section::ProductCraft => "On the product side, ",
            Section::GrowthOps => "On growth and operations, ",
            Section::DesignPicks => "What stood out in design: ",
            Section::SoloInsights => "And finally, on working for yourself: ",
        }
    }
}

/// Keyword table backing [`classify`]. Scored case-insensitively against
/// title + summary; keywords are stored lowercased.
static KEYWORDS: Lazy<Vec<(Section, Vec<&'static str>)>> = Lazy::new(|| {
    vec![
        (
            Section::AiFrontier,
            vec![
                "artificial intelligence",
                "ai",
                "machine learning",
                "deep learning",
                "foundation model",
                "gpt",
                "claude",
                "agent",
                "llm",
                "neural network",
                "algorithm",
                "model",
                "training",
                "inference",
            ],
        ),
        (
            Section::AiTools,
            vec![
                "tool",
                "software",
                "app",
                "platform",
                "plugin",
                "extension",
                "productivity",
                "automation",
                "workflow",
                "assistant",
                "bot",
                "api",
                "service",
            ],
        ),
        (
            Section::ProductCraft,
            vec![
                "product design",
                "user experience",
                "ux",
                "requirements",
                "product strategy",
                "product management",
                "user research",
                "product thinking",
                "mvp",
                "iteration",
                "feature",
                "interaction",
            ],
        ),
        (
            Section::GrowthOps,
            vec![
                "growth",
                "operations",
                "marketing",
                "acquisition",
                "retention",
                "conversion",
                "traffic",
                "distribution",
                "community",
                "content marketing",
                "seo",
                "analytics",
                "metrics",
                "funnel",
            ],
        ),
        (
            Section::DesignPicks,
            vec![
                "design",
                "ui",
                "visual",
                "interface",
                "interaction design",
                "brand",
                "creative",
                "aesthetics",
                "typography",
                "color",
                "icon",
                "illustration",
                "motion",
            ],
        ),
        (
            Section::SoloInsights,
            vec![
                "personal growth",
                "skill",
                "mindset",
                "thinking",
                "learning",
                "efficiency",
                "time management",
                "personal brand",
                "career",
                "self-improvement",
                "habit",
                "framework",
            ],
        ),
    ]
});

/// Pick the best section for an article from its title and summary.
///
/// Counts keyword hits per section over the lowercased text and returns the
/// highest scorer. Ties resolve in section priority order; zero hits fall to
/// [`Section::SoloInsights`].
pub fn classify(title: &str, summary: &str) -> Section {
    let content = format!("{} {}", title, summary).to_lowercase();

    let mut best = Section::SoloInsights;
    let mut best_score = 0usize;
    for (section, keywords) in KEYWORDS.iter() {
        let score = keywords.iter().filter(|k| content.contains(*k)).count();
        if score > best_score {
            best = *section;
            best_score = score;
        }
    }
    best
}

/// Bucket an article, preferring the curator's own category label.
///
/// A label mentioning AI goes to tools when the article reads like a tool
/// writeup, otherwise to the frontier section; growth, design, and product
/// labels map directly. Unlabeled or unrecognized articles fall back to
/// keyword scoring.
pub fn section_for(article: &Article) -> Section {
    let label = article.category.to_lowercase();
    let text = format!("{} {}", article.title, article.summary).to_lowercase();

    if label.contains("ai") || label.contains("model") {
        if text.contains("tool") {
            return Section::AiTools;
        }
        return Section::AiFrontier;
    }
    if label.contains("growth") || label.contains("ops") || label.contains("operations") {
        return Section::GrowthOps;
    }
    if label.contains("design") {
        return Section::DesignPicks;
    }
    if label.contains("product") {
        return Section::ProductCraft;
    }

    classify(&article.title, &article.summary)
}

/// Bucket a slice of articles by section, preserving input order within each
/// bucket. Every section is present in the result, possibly empty.
pub fn categorize(articles: &[Article]) -> Vec<(Section, Vec<&Article>)> {
    let mut buckets: Vec<(Section, Vec<&Article>)> =
        Section::ALL.iter().map(|s| (*s, Vec::new())).collect();

    for article in articles {
        let section = section_for(article);
        if let Some((_, bucket)) = buckets.iter_mut().find(|(s, _)| *s == section) {
            bucket.push(article);
        }
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{tests::sample_article, Importance};

    #[test]
    fn test_classify_ai_article() {
        let section = classify(
            "AI Evolves to Achieve Artificial Innovation",
            "The article discusses how AI models can now invent new algorithms on their own.",
        );
        assert_eq!(section, Section::AiFrontier);
    }

    #[test]
    fn test_classify_growth_article() {
        let section = classify(
            "Top 5 subscription churn reasons",
            "Retention and conversion data from subscription apps, with growth tactics.",
        );
        assert_eq!(section, Section::GrowthOps);
    }

    #[test]
    fn test_classify_defaults_to_solo_insights() {
        assert_eq!(classify("Untitled", "Nothing relevant here."), Section::SoloInsights);
    }

    #[test]
    fn test_label_beats_keywords() {
        let mut article = sample_article("Weekly Designers Update #506", Importance::High);
        article.category = "Design".to_string();
        article.summary = "Several AI model training stories this week.".to_string();
        assert_eq!(section_for(&article), Section::DesignPicks);
    }

    #[test]
    fn test_ai_label_splits_on_tool_mentions() {
        let mut article = sample_article("A new coding assistant", Importance::Medium);
        article.category = "AI".to_string();
        article.summary = "A tool that automates refactoring.".to_string();
        assert_eq!(section_for(&article), Section::AiTools);

        article.summary = "A research result on reasoning benchmarks.".to_string();
        article.title = "Reasoning benchmark results".to_string();
        assert_eq!(section_for(&article), Section::AiFrontier);
    }

    #[test]
    fn test_categorize_covers_all_sections() {
        let articles = vec![sample_article("Plain", Importance::Low)];
        let buckets = categorize(&articles);
        assert_eq!(buckets.len(), Section::ALL.len());
        let total: usize = buckets.iter().map(|(_, b)| b.len()).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn test_categorize_preserves_order() {
        let mut first = sample_article("Growth story one", Importance::High);
        first.category = "Growth".to_string();
        let mut second = sample_article("Growth story two", Importance::Low);
        second.category = "Growth".to_string();

        let articles = vec![first, second];
        let buckets = categorize(&articles);
        let (_, growth) = buckets
            .iter()
            .find(|(s, _)| *s == Section::GrowthOps)
            .unwrap();
        assert_eq!(growth[0].title, "Growth story one");
        assert_eq!(growth[1].title, "Growth story two");
    }
}
