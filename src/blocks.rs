//! Markdown to Notion block conversion.
//!
//! Converts the restricted Markdown subset emitted by the issue generator
//! into the ordered list of typed blocks the Notion page API consumes.
//! Recognized constructs:
//!
//! | Prefix | Block |
//! |--------|-------|
//! | `# `   | Heading 1 |
//! | `## `  | Heading 2 |
//! | `### ` | Heading 3 |
//! | `> `   | Quote |
//! | `- `   | Bulleted list item |
//! | `---`  | Divider |
//! | (none) | Paragraph |
//!
//! Inline formatting inside a block is resolved into [`Span`] runs: links
//! (`[label](url)`) are extracted first, then bold runs (`**inner**`) in the
//! remaining text. Malformed syntax is kept as literal text; conversion never
//! fails. Nested lists, numbered lists, tables, code fences, and images are
//! not recognized and fall through to paragraphs.

use serde_json::{json, Map, Value};

/// The kind of a rendered block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Heading1,
    Heading2,
    Heading3,
    Quote,
    BulletItem,
    Divider,
    Paragraph,
}

impl BlockKind {
    /// The `type` discriminator the Notion block API uses for this kind.
    pub fn api_name(self) -> &'static str {
        match self {
            BlockKind::Heading1 => "heading_1",
            BlockKind::Heading2 => "heading_2",
            BlockKind::Heading3 => "heading_3",
            BlockKind::Quote => "quote",
            BlockKind::BulletItem => "bulleted_list_item",
            BlockKind::Divider => "divider",
            BlockKind::Paragraph => "paragraph",
        }
    }
}

/// One run of uniformly formatted text within a block.
///
/// Concatenating the `text` of a block's spans in order reproduces the
/// source line with the formatting markers (`**`, `[...](...)`) and the
/// structural prefix removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// The rendered text of this run, all Markdown syntax resolved.
    pub text: String,
    /// Whether the run is bold.
    pub bold: bool,
    /// Link target, if this run is a link.
    pub link_url: Option<String>,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Span {
            text: text.into(),
            bold: false,
            link_url: None,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Span {
            text: text.into(),
            bold: true,
            link_url: None,
        }
    }

    pub fn link(text: impl Into<String>, url: impl Into<String>) -> Self {
        Span {
            text: text.into(),
            bold: false,
            link_url: Some(url.into()),
        }
    }

    /// Render this span as a Notion rich-text object.
    ///
    /// Link spans nest the target under `text.link`; bold spans carry an
    /// `annotations` object. A span is never both (links are extracted
    /// before bold runs and their labels are taken verbatim).
    fn to_rich_text(&self) -> Value {
        let mut text = Map::new();
        text.insert("content".to_string(), Value::String(self.text.clone()));
        if let Some(url) = &self.link_url {
            text.insert("link".to_string(), json!({ "url": url }));
        }

        let mut obj = Map::new();
        obj.insert("type".to_string(), Value::String("text".to_string()));
        obj.insert("text".to_string(), Value::Object(text));
        if self.bold {
            obj.insert("annotations".to_string(), json!({ "bold": true }));
        }
        Value::Object(obj)
    }
}

/// One structural unit of rendered output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    /// Ordered left-to-right; always empty for [`BlockKind::Divider`].
    pub spans: Vec<Span>,
}

impl Block {
    /// Render this block as a Notion block object.
    pub fn to_json(&self) -> Value {
        let api = self.kind.api_name();
        let payload = if self.kind == BlockKind::Divider {
            json!({})
        } else {
            let rich_text: Vec<Value> = self.spans.iter().map(Span::to_rich_text).collect();
            json!({ "rich_text": rich_text })
        };

        let mut obj = Map::new();
        obj.insert("type".to_string(), Value::String(api.to_string()));
        obj.insert(api.to_string(), payload);
        Value::Object(obj)
    }
}

/// Convert a Markdown document into an ordered block sequence.
///
/// Each non-blank line yields exactly one block; blank lines are dropped.
/// Lines are trimmed before classification, and the first matching prefix
/// wins. The converter is total: malformed inline syntax degrades to
/// literal plain-text spans and no input can make it fail.
pub fn markdown_to_blocks(markdown: &str) -> Vec<Block> {
    let mut blocks = Vec::new();

    for raw in markdown.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let (kind, content) = classify(line);
        let spans = if kind == BlockKind::Divider {
            Vec::new()
        } else {
            parse_spans(content)
        };
        blocks.push(Block { kind, spans });
    }

    blocks
}

/// Block markers checked in priority order. Each ends with the space that
/// separates it from the content.
const MARKERS: [(&str, BlockKind); 5] = [
    ("# ", BlockKind::Heading1),
    ("## ", BlockKind::Heading2),
    ("### ", BlockKind::Heading3),
    ("> ", BlockKind::Quote),
    ("- ", BlockKind::BulletItem),
];

/// Classify one trimmed, non-empty line and return its content slice.
///
/// A line consisting of a bare marker (its trailing space lost to the trim)
/// still classifies as that kind with empty content, so `"# "` yields an
/// empty Heading1 rather than a one-character paragraph.
fn classify(line: &str) -> (BlockKind, &str) {
    for (marker, kind) in MARKERS {
        if let Some(rest) = line.strip_prefix(marker) {
            return (kind, rest);
        }
        if line == &marker[..marker.len() - 1] {
            return (kind, "");
        }
    }
    if line.starts_with("---") {
        // Anything after the dashes is discarded.
        return (BlockKind::Divider, "");
    }
    (BlockKind::Paragraph, line)
}

/// Byte offsets of every occurrence of `needle` in `text`.
///
/// The span scanners consume these through a forward-only index so each
/// pass stays linear even on adversarial bracket soup.
fn byte_positions(text: &str, needle: u8) -> Vec<usize> {
    text.bytes()
        .enumerate()
        .filter(|&(_, b)| b == needle)
        .map(|(i, _)| i)
        .collect()
}

/// Pass 1: extract `[label](url)` links, handing unmatched residue to the
/// bold pass.
///
/// A candidate match anchors at a `[`, runs to the first `]` after it
/// (labels cannot contain `]`), requires an immediate `(`, and runs to the
/// first `)` after that (urls cannot contain `)`). Label and url must be
/// non-empty. Link labels are taken verbatim and never re-scanned for bold
/// markers. Empty input yields an empty span list.
fn parse_spans(text: &str) -> Vec<Span> {
    let bytes = text.as_bytes();
    let closes = byte_positions(text, b']');
    let parens = byte_positions(text, b')');

    let mut spans = Vec::new();
    let mut cursor = 0; // start of text not yet emitted
    let mut ci = 0; // forward-only index into `closes`
    let mut pi = 0; // forward-only index into `parens`

    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'[' {
            i += 1;
            continue;
        }

        // First `]` after the opening bracket.
        while ci < closes.len() && closes[ci] <= i {
            ci += 1;
        }
        let Some(&close) = closes.get(ci) else {
            // No `]` remains anywhere, so no later link can match either.
            break;
        };

        // Non-empty label, immediately followed by `(`.
        if close == i + 1 || bytes.get(close + 1) != Some(&b'(') {
            i += 1;
            continue;
        }

        // First `)` after the opening paren; the url in between must be
        // non-empty.
        while pi < parens.len() && parens[pi] <= close + 1 {
            pi += 1;
        }
        let Some(&paren) = parens.get(pi) else {
            break;
        };
        if paren == close + 2 {
            i += 1;
            continue;
        }

        if cursor < i {
            parse_bold_runs(&text[cursor..i], &mut spans);
        }
        spans.push(Span::link(&text[i + 1..close], &text[close + 2..paren]));
        cursor = paren + 1;
        i = paren + 1;
    }

    if cursor < text.len() {
        parse_bold_runs(&text[cursor..], &mut spans);
    }
    spans
}

/// Pass 2: split one link-free segment into bold and plain runs.
///
/// A bold run is `**inner**` where `inner` is a non-empty stretch of
/// non-`*` characters. Unpaired or empty markers stay literal. A non-empty
/// segment with no bold match becomes exactly one plain span.
fn parse_bold_runs(text: &str, spans: &mut Vec<Span>) {
    let bytes = text.as_bytes();
    let mut cursor = 0;

    let mut i = 0;
    while i + 1 < bytes.len() {
        if bytes[i] != b'*' || bytes[i + 1] != b'*' {
            i += 1;
            continue;
        }

        // The inner run extends to the next `*`; it must be non-empty and
        // the closing marker must be a double star.
        let start = i + 2;
        let mut j = start;
        while j < bytes.len() && bytes[j] != b'*' {
            j += 1;
        }
        if j == start || j + 1 >= bytes.len() || bytes[j + 1] != b'*' {
            i += 1;
            continue;
        }

        if cursor < i {
            spans.push(Span::plain(&text[cursor..i]));
        }
        spans.push(Span::bold(&text[start..j]));
        cursor = j + 2;
        i = j + 2;
    }

    if cursor < text.len() {
        spans.push(Span::plain(&text[cursor..]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans_text(block: &Block) -> String {
        block.spans.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_heading_one_plain() {
        let blocks = markdown_to_blocks("# Title");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, BlockKind::Heading1);
        assert_eq!(blocks[0].spans, vec![Span::plain("Title")]);
    }

    #[test]
    fn test_line_classification() {
        let doc = "# One\n## Two\n### Three\n> Quoted\n- Item\n---\nJust text";
        let kinds: Vec<BlockKind> = markdown_to_blocks(doc).iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![
                BlockKind::Heading1,
                BlockKind::Heading2,
                BlockKind::Heading3,
                BlockKind::Quote,
                BlockKind::BulletItem,
                BlockKind::Divider,
                BlockKind::Paragraph,
            ]
        );
    }

    #[test]
    fn test_blank_lines_dropped() {
        let doc = "# A\n\n\n   \nB\n\n";
        let blocks = markdown_to_blocks(doc);
        assert_eq!(blocks.len(), 2);
        let non_blank = doc.lines().filter(|l| !l.trim().is_empty()).count();
        assert!(blocks.len() <= non_blank);
    }

    #[test]
    fn test_empty_input() {
        assert!(markdown_to_blocks("").is_empty());
    }

    #[test]
    fn test_bullet_with_bold_label_and_link() {
        let blocks = markdown_to_blocks("- **A**: [B](http://x)");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, BlockKind::BulletItem);
        assert_eq!(
            blocks[0].spans,
            vec![
                Span::bold("A"),
                Span::plain(": "),
                Span::link("B", "http://x"),
            ]
        );
    }

    #[test]
    fn test_bold_resumes_around_link() {
        let blocks = markdown_to_blocks("**bold** and [link](url) and **more**");
        assert_eq!(
            blocks[0].spans,
            vec![
                Span::bold("bold"),
                Span::plain(" and "),
                Span::link("link", "url"),
                Span::plain(" and "),
                Span::bold("more"),
            ]
        );
    }

    #[test]
    fn test_link_label_kept_verbatim() {
        // Labels are never re-scanned for bold markers.
        let blocks = markdown_to_blocks("[**x**](u)");
        assert_eq!(blocks[0].spans, vec![Span::link("**x**", "u")]);
    }

    #[test]
    fn test_bold_never_spans_a_link() {
        let blocks = markdown_to_blocks("**text [link](url) more**");
        assert_eq!(
            blocks[0].spans,
            vec![
                Span::plain("**text "),
                Span::link("link", "url"),
                Span::plain(" more**"),
            ]
        );
    }

    #[test]
    fn test_multiple_links() {
        let blocks = markdown_to_blocks("see [a](1) and [b](2)");
        assert_eq!(
            blocks[0].spans,
            vec![
                Span::plain("see "),
                Span::link("a", "1"),
                Span::plain(" and "),
                Span::link("b", "2"),
            ]
        );
    }

    #[test]
    fn test_divider_discards_trailing_text() {
        let blocks = markdown_to_blocks("--- ignored");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, BlockKind::Divider);
        assert!(blocks[0].spans.is_empty());
    }

    #[test]
    fn test_unmatched_bold_stays_literal() {
        let blocks = markdown_to_blocks("**bold");
        assert_eq!(blocks[0].spans, vec![Span::plain("**bold")]);
    }

    #[test]
    fn test_unmatched_bracket_stays_literal() {
        let blocks = markdown_to_blocks("[nope and [also](");
        assert_eq!(blocks[0].spans, vec![Span::plain("[nope and [also](")]);
    }

    #[test]
    fn test_empty_label_or_url_not_a_link() {
        let blocks = markdown_to_blocks("[](u) then [a]()");
        assert_eq!(blocks[0].spans, vec![Span::plain("[](u) then [a]()")]);
    }

    #[test]
    fn test_empty_bold_marker_stays_literal() {
        let blocks = markdown_to_blocks("a **** b");
        assert_eq!(blocks[0].spans, vec![Span::plain("a **** b")]);
    }

    #[test]
    fn test_bare_marker_yields_empty_block() {
        let blocks = markdown_to_blocks("# ");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, BlockKind::Heading1);
        assert!(blocks[0].spans.is_empty());
    }

    #[test]
    fn test_deep_heading_falls_through_to_paragraph() {
        let blocks = markdown_to_blocks("#### too deep");
        assert_eq!(blocks[0].kind, BlockKind::Paragraph);
        assert_eq!(blocks[0].spans, vec![Span::plain("#### too deep")]);
    }

    #[test]
    fn test_label_may_contain_open_bracket() {
        // The label runs to the first `]`, so a stray `[` inside is kept.
        let blocks = markdown_to_blocks("[a[b](u)");
        assert_eq!(blocks[0].spans, vec![Span::link("a[b", "u")]);
    }

    #[test]
    fn test_round_trip_strips_only_syntax() {
        let line = "- **A**: read [B](http://x) today";
        let block = &markdown_to_blocks(line)[0];
        assert_eq!(spans_text(block), "A: read B today");
    }

    #[test]
    fn test_block_count_bounded_by_non_blank_lines() {
        let doc = "# h\n\ntext\n- a\n- b\n\n> q\n";
        let non_blank = doc.lines().filter(|l| !l.trim().is_empty()).count();
        assert!(markdown_to_blocks(doc).len() <= non_blank);
    }

    #[test]
    fn test_unicode_content() {
        let blocks = markdown_to_blocks("## 🎯 Briefing — 周刊");
        assert_eq!(blocks[0].kind, BlockKind::Heading2);
        assert_eq!(blocks[0].spans, vec![Span::plain("🎯 Briefing — 周刊")]);
    }

    #[test]
    fn test_heading_json_shape() {
        let block = &markdown_to_blocks("# Title")[0];
        let json = block.to_json();
        assert_eq!(json["type"], "heading_1");
        assert_eq!(json["heading_1"]["rich_text"][0]["type"], "text");
        assert_eq!(json["heading_1"]["rich_text"][0]["text"]["content"], "Title");
    }

    #[test]
    fn test_divider_json_shape() {
        let block = &markdown_to_blocks("---")[0];
        let json = block.to_json();
        assert_eq!(json["type"], "divider");
        assert_eq!(json["divider"], serde_json::json!({}));
    }

    #[test]
    fn test_rich_text_annotations() {
        let block = &markdown_to_blocks("**b** [l](u)")[0];
        let json = block.to_json();
        let rich = &json["paragraph"]["rich_text"];
        assert_eq!(rich[0]["annotations"]["bold"], true);
        assert!(rich[0]["text"].get("link").is_none());
        // Link spans carry the url but never an annotations object.
        assert_eq!(rich[2]["text"]["link"]["url"], "u");
        assert!(rich[2].get("annotations").is_none());
    }
}
