//! Renderers over the formatter's block structure.
//!
//! HTML output matches what the web UI shows (and what exports embed);
//! ANSI output is what the terminal prints. Both consume the same
//! [`Block`] structure, so the formatting algorithm stays independently
//! testable from rendering.

use colored::Colorize;

use super::{Block, Inline, Line};

/// Escape text content for HTML embedding.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Render blocks to an HTML fragment.
pub fn to_html(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        match block {
            Block::Paragraph(lines) => {
                out.push_str("<p>");
                out.push_str(&join_lines_html(lines, "<br>"));
                out.push_str("</p>");
            }
            Block::List(items) => {
                out.push_str("<ul>");
                for item in items {
                    out.push_str("<li>");
                    out.push_str(&line_html(item));
                    out.push_str("</li>");
                }
                out.push_str("</ul>");
            }
        }
    }
    out
}

fn join_lines_html(lines: &[Line], separator: &str) -> String {
    lines
        .iter()
        .map(|line| line_html(line))
        .collect::<Vec<_>>()
        .join(separator)
}

fn line_html(line: &Line) -> String {
    let mut out = String::new();
    for span in line {
        match span {
            Inline::Text(text) => out.push_str(&escape_html(text)),
            Inline::Strong(text) => {
                out.push_str("<strong>");
                out.push_str(&escape_html(text));
                out.push_str("</strong>");
            }
            Inline::Emphasis(text) => {
                out.push_str("<em>");
                out.push_str(&escape_html(text));
                out.push_str("</em>");
            }
            Inline::Code(text) => {
                out.push_str("<code>");
                out.push_str(&escape_html(text));
                out.push_str("</code>");
            }
            Inline::Citation(text) => {
                out.push_str("<span class=\"citation\">");
                out.push_str(&escape_html(text));
                out.push_str("</span>");
            }
        }
    }
    out
}

/// Render blocks for the terminal. Paragraphs are separated by blank
/// lines, list items get a bullet prefix.
pub fn to_ansi(blocks: &[Block]) -> String {
    let mut parts = Vec::new();
    for block in blocks {
        match block {
            Block::Paragraph(lines) => {
                parts.push(
                    lines
                        .iter()
                        .map(|line| line_ansi(line))
                        .collect::<Vec<_>>()
                        .join("\n"),
                );
            }
            Block::List(items) => {
                parts.push(
                    items
                        .iter()
                        .map(|item| format!("  • {}", line_ansi(item)))
                        .collect::<Vec<_>>()
                        .join("\n"),
                );
            }
        }
    }
    parts.join("\n\n")
}

fn line_ansi(line: &Line) -> String {
    let mut out = String::new();
    for span in line {
        match span {
            Inline::Text(text) => out.push_str(text),
            Inline::Strong(text) => out.push_str(&text.bold().to_string()),
            Inline::Emphasis(text) => out.push_str(&text.italic().to_string()),
            Inline::Code(text) => out.push_str(&text.yellow().to_string()),
            Inline::Citation(text) => out.push_str(&text.cyan().bold().to_string()),
        }
    }
    out
}
