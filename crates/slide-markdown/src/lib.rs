//! Markdown to HTML conversion for individual slides.
//!
//! The converter is deliberately small: ATX headings, flat ordered and
//! unordered lists, fenced code blocks, paragraphs, a handful of raw HTML
//! tags passed through verbatim, and inline bold/italic/code. Input is
//! trusted; only code contents are escaped.

mod escape;
mod inline;
mod line;
mod state;

pub use escape::escape_html;
pub use inline::format_inline;
pub use line::{classify, normalize_lines, LineKind};
pub use state::{ListKind, ParserState};

use serde::Serialize;

use crate::line::is_fence;

/// Title and body produced from one markdown document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    /// Text of the first heading, if any.
    pub title: Option<String>,
    pub html: String,
}

/// Parses `document` into HTML. Never fails.
///
/// Heading text is emitted as-is, without inline formatting, while list
/// items and paragraphs are passed through [`format_inline`].
pub fn parse(document: &str) -> ParseResult {
    let mut state = ParserState::new();

    for line in normalize_lines(document) {
        if state.in_code {
            if is_fence(&line) {
                state.close_code();
            } else {
                state.push_code_line(line);
            }
            continue;
        }

        match classify(&line) {
            LineKind::Fence => state.open_code(),
            LineKind::RawHtml => {
                state.flush_list();
                state.push_html(&line);
                state.push_html("\n");
            }
            LineKind::Heading { level, text } => {
                state.flush_list();
                state.offer_title(text);
                state.push_html(&format!("<h{level}>{text}</h{level}>"));
            }
            LineKind::UnorderedItem(item) => {
                state.push_item(ListKind::Unordered, format_inline(item));
            }
            LineKind::OrderedItem(item) => {
                state.push_item(ListKind::Ordered, format_inline(item));
            }
            LineKind::Blank => state.flush_list(),
            LineKind::Paragraph => {
                state.flush_list();
                state.push_html(&format!("<p>{}</p>", format_inline(&line)));
            }
        }
    }

    let (title, html) = state.finalize();
    ParseResult { title, html }
}
