//! Answer-text formatter.
//!
//! `format_content` turns raw answer text into structured markup blocks;
//! the renderers in [`render`] turn those blocks into HTML (export /
//! preview parity with the web UI) or ANSI for the terminal. The passes
//! are order-sensitive:
//!
//! 1. inline spans from paired delimiters (`**strong**`, `*emphasis*`,
//!    `` `code` ``),
//! 2. line breaks become explicit break markers,
//! 3. legal-citation tokens become citation spans,
//! 4. bullet-marked text splits into list and paragraph blocks,
//! 5. otherwise blank lines delimit paragraphs.
//!
//! Citation detection happens during inline parsing of each line, before
//! any block grouping, so segmentation can never bisect a citation.

pub mod render;

use regex::Regex;

/// An inline span inside a line of formatted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Strong(String),
    Emphasis(String),
    Code(String),
    /// A legal-code reference such as "Section 103".
    Citation(String),
}

/// One line of inline spans. Lines inside a paragraph are separated by
/// explicit break markers when rendered.
pub type Line = Vec<Inline>;

/// A block of formatted output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Vec<Line>),
    List(Vec<Line>),
}

/// Deterministic text-to-markup transform. Pure: no rendering, no state.
pub fn format_content(text: &str) -> Vec<Block> {
    if has_bullets(text) {
        segment_bulleted(text)
    } else {
        segment_paragraphs(text)
    }
}

fn has_bullets(text: &str) -> bool {
    text.contains('•') || text.lines().any(|l| is_bullet_line(l))
}

fn is_bullet_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with('•') || trimmed.starts_with("- ")
}

fn strip_bullet(line: &str) -> &str {
    let trimmed = line.trim_start();
    trimmed
        .strip_prefix('•')
        .or_else(|| trimmed.strip_prefix("- "))
        .unwrap_or(trimmed)
        .trim_start()
}

/// Bullet grouping: contiguous bullet lines form one list; a non-bullet
/// line always closes an open list before opening a paragraph, and a
/// bullet line closes an open paragraph. Blank lines close both.
fn segment_bulleted(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut list_items: Vec<Line> = Vec::new();
    let mut paragraph_lines: Vec<Line> = Vec::new();

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            flush_paragraph(&mut blocks, &mut paragraph_lines);
            flush_list(&mut blocks, &mut list_items);
            continue;
        }
        if is_bullet_line(line) {
            flush_paragraph(&mut blocks, &mut paragraph_lines);
            list_items.push(parse_inlines(strip_bullet(line)));
        } else {
            flush_list(&mut blocks, &mut list_items);
            paragraph_lines.push(parse_inlines(line));
        }
    }
    flush_paragraph(&mut blocks, &mut paragraph_lines);
    flush_list(&mut blocks, &mut list_items);
    blocks
}

fn flush_list(blocks: &mut Vec<Block>, items: &mut Vec<Line>) {
    if !items.is_empty() {
        blocks.push(Block::List(std::mem::take(items)));
    }
}

fn flush_paragraph(blocks: &mut Vec<Block>, lines: &mut Vec<Line>) {
    if !lines.is_empty() {
        blocks.push(Block::Paragraph(std::mem::take(lines)));
    }
}

/// Bullet-free text: blank lines delimit paragraphs; single newlines
/// inside a paragraph stay as break markers.
fn segment_paragraphs(text: &str) -> Vec<Block> {
    text.split("\n\n")
        .filter(|part| !part.trim().is_empty())
        .map(|part| {
            Block::Paragraph(
                part.lines()
                    .map(|line| parse_inlines(line.trim()))
                    .collect(),
            )
        })
        .collect()
}

/// Split one line into inline spans. Strong wins over emphasis because
/// its pattern is tried first; text between delimiter spans goes through
/// citation detection.
fn parse_inlines(line: &str) -> Line {
    let delimiters = Regex::new(r"\*\*([^*]+)\*\*|\*([^*]+)\*|`([^`]+)`").unwrap();

    let mut spans = Vec::new();
    let mut cursor = 0;
    for captures in delimiters.captures_iter(line) {
        let matched = captures.get(0).unwrap();
        if matched.start() > cursor {
            push_text_with_citations(&mut spans, &line[cursor..matched.start()]);
        }
        if let Some(strong) = captures.get(1) {
            spans.push(Inline::Strong(strong.as_str().to_string()));
        } else if let Some(emphasis) = captures.get(2) {
            spans.push(Inline::Emphasis(emphasis.as_str().to_string()));
        } else if let Some(code) = captures.get(3) {
            spans.push(Inline::Code(code.as_str().to_string()));
        }
        cursor = matched.end();
    }
    if cursor < line.len() {
        push_text_with_citations(&mut spans, &line[cursor..]);
    }
    spans
}

/// Split plain text into text and citation spans.
fn push_text_with_citations(spans: &mut Line, text: &str) {
    let citation = Regex::new(r"(?i)\b(?:Section|Sec\.|BNS|Article)\s+\d+").unwrap();

    let mut cursor = 0;
    for found in citation.find_iter(text) {
        if found.start() > cursor {
            spans.push(Inline::Text(text[cursor..found.start()].to_string()));
        }
        spans.push(Inline::Citation(found.as_str().to_string()));
        cursor = found.end();
    }
    if cursor < text.len() {
        spans.push(Inline::Text(text[cursor..].to_string()));
    }
}
