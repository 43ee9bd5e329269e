use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

pub(crate) const FENCE: &str = "```";

static RAW_HTML: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r"^<(figure|img|svg|/figure|figcaption)")
        .case_insensitive(true)
        .build()
        .unwrap()
});
// Whitespace includes the byte order mark; list numbers are ASCII digits only.
static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#{1,6})[\s\x{FEFF}]+(.*)").unwrap());
static UNORDERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\s\x{FEFF}]*([-*+])[\s\x{FEFF}]+(.*)").unwrap());
static ORDERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\s\x{FEFF}]*([0-9]+)\.[\s\x{FEFF}]+(.*)").unwrap());

/// Block-level category of a single line outside a fenced code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    Fence,
    RawHtml,
    Heading { level: u8, text: &'a str },
    UnorderedItem(&'a str),
    OrderedItem(&'a str),
    Blank,
    Paragraph,
}

type Matcher = for<'a> fn(&'a str) -> Option<LineKind<'a>>;

/// Evaluated top-down; the first matcher that accepts the line decides its kind.
const MATCHERS: &[Matcher] = &[
    match_fence,
    match_raw_html,
    match_heading,
    match_unordered_item,
    match_ordered_item,
    match_blank,
];

/// Classifies `line`, falling back to [`LineKind::Paragraph`].
pub fn classify(line: &str) -> LineKind<'_> {
    MATCHERS
        .iter()
        .find_map(|matcher| matcher(line))
        .unwrap_or(LineKind::Paragraph)
}

pub(crate) fn is_fence(line: &str) -> bool {
    line.trim().starts_with(FENCE)
}

/// Splits a document into lines with carriage returns removed.
pub fn normalize_lines(document: &str) -> impl Iterator<Item = String> + '_ {
    document.split('\n').map(|line| line.replace('\r', ""))
}

fn match_fence(line: &str) -> Option<LineKind<'_>> {
    is_fence(line).then_some(LineKind::Fence)
}

fn match_raw_html(line: &str) -> Option<LineKind<'_>> {
    RAW_HTML.is_match(line.trim()).then_some(LineKind::RawHtml)
}

fn match_heading(line: &str) -> Option<LineKind<'_>> {
    let caps = HEADING.captures(line)?;
    let level = caps.get(1)?.as_str().len() as u8;
    let text = caps.get(2)?.as_str().trim();
    Some(LineKind::Heading { level, text })
}

fn match_unordered_item(line: &str) -> Option<LineKind<'_>> {
    let caps = UNORDERED_ITEM.captures(line)?;
    Some(LineKind::UnorderedItem(caps.get(2)?.as_str()))
}

fn match_ordered_item(line: &str) -> Option<LineKind<'_>> {
    let caps = ORDERED_ITEM.captures(line)?;
    Some(LineKind::OrderedItem(caps.get(2)?.as_str()))
}

fn match_blank(line: &str) -> Option<LineKind<'_>> {
    line.trim().is_empty().then_some(LineKind::Blank)
}
