//! Heading outline of a Markdown document.

use std::ops::Range;

use pulldown_cmark::{Event, Options, Parser, Tag};

/// A heading found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Heading level (1-6)
    pub level: u8,

    /// Heading text as written, without ATX markers
    pub text: String,

    /// Byte span of the heading in the source
    pub span: Range<usize>,
}

/// Scan a Markdown document and return its ATX headings in source order.
///
/// Only `#`-prefixed lines are headings; setext underlines are plain text.
/// Heading-looking lines inside code blocks are not headings.
pub fn outline(source: &str) -> Vec<Heading> {
    let code = code_spans(source);
    let mut headings = Vec::new();
    let mut offset = 0;

    for line in source.split_inclusive('\n') {
        let start = offset;
        offset += line.len();

        let indent = line.len() - line.trim_start_matches(' ').len();
        if code.iter().any(|span| span.contains(&(start + indent))) {
            continue;
        }

        if let Some((level, text)) = atx_heading(line) {
            headings.push(Heading {
                level,
                text,
                span: start..offset,
            });
        }
    }

    headings
}

/// Byte spans of fenced and indented code blocks.
fn code_spans(source: &str) -> Vec<Range<usize>> {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    Parser::new_ext(source, options)
        .into_offset_iter()
        .filter_map(|(event, range)| match event {
            Event::Start(Tag::CodeBlock(_)) => Some(range),
            _ => None,
        })
        .collect()
}

/// Parse one line as an ATX heading, returning its level and text.
fn atx_heading(line: &str) -> Option<(u8, String)> {
    let line = line.trim_end_matches(|c: char| c == '\n' || c == '\r');

    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        return None;
    }
    let line = &line[indent..];

    let hashes = line.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    if !line[hashes..]
        .chars()
        .next()
        .map_or(true, char::is_whitespace)
    {
        return None;
    }

    Some((hashes as u8, heading_text(&line[hashes..])))
}

/// Heading text without the optional closing `#` sequence.
fn heading_text(after_hashes: &str) -> String {
    let text = after_hashes.trim();

    // Closing sequence only counts when separated by a space
    let without_closing = text.trim_end_matches('#');
    if without_closing.len() == text.len() {
        return text.to_string();
    }
    if without_closing.is_empty() || without_closing.ends_with(char::is_whitespace) {
        return without_closing.trim_end().to_string();
    }

    text.to_string()
}
