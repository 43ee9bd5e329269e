use crate::escape::escape_html;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static CODE_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").unwrap());
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").unwrap());
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\x1ACODE(\d+)\x1A").unwrap());

const LITERAL_UNDERSCORE: &str = "&#95;";
const LITERAL_ASTERISK: &str = "&#42;";

/// Converts the inline markup of a single line into an HTML fragment.
///
/// Supports `**bold**`, `*italic*`, `` `code` `` and the `\_` / `\*`
/// escapes. Underscore emphasis is not recognised. Code span contents are
/// pulled out before emphasis runs and restored (escaped) afterwards, so
/// asterisks inside backticks are always literal.
pub fn format_inline(text: &str) -> String {
    let text = text
        .replace("\\_", LITERAL_UNDERSCORE)
        .replace("\\*", LITERAL_ASTERISK);

    let (text, spans) = extract_code_spans(&text);

    let text = BOLD.replace_all(&text, "<strong>${1}</strong>");
    let text = ITALIC.replace_all(&text, "<em>${1}</em>");

    restore_code_spans(&text, &spans)
}

fn extract_code_spans(text: &str) -> (String, Vec<String>) {
    let mut spans = Vec::new();
    let replaced = CODE_SPAN.replace_all(text, |caps: &Captures<'_>| {
        let token = placeholder(spans.len());
        spans.push(caps[1].to_string());
        token
    });
    (replaced.into_owned(), spans)
}

fn restore_code_spans(text: &str, spans: &[String]) -> String {
    if spans.is_empty() {
        return text.to_string();
    }

    PLACEHOLDER
        .replace_all(text, |caps: &Captures<'_>| {
            let span = caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|idx| spans.get(idx));
            match span {
                Some(code) => format!("<code>{}</code>", escape_html(code)),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn placeholder(index: usize) -> String {
    format!("\x1ACODE{index}\x1A")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn formats_bold_and_italic() {
        assert_eq!(
            format_inline("**a** and *b*"),
            "<strong>a</strong> and <em>b</em>"
        );
    }

    #[test]
    fn code_span_content_is_not_reinterpreted() {
        assert_eq!(format_inline("`*not italic*`"), "<code>*not italic*</code>");
        assert_eq!(
            format_inline("`**x**` then **y**"),
            "<code>**x**</code> then <strong>y</strong>"
        );
    }

    #[test]
    fn code_span_content_is_escaped() {
        assert_eq!(
            format_inline("use `Vec<&str>` here"),
            "use <code>Vec&lt;&amp;str&gt;</code> here"
        );
    }

    #[test]
    fn escaped_markers_become_entities() {
        assert_eq!(format_inline(r"\*literal\*"), "&#42;literal&#42;");
        assert_eq!(format_inline(r"snake\_case"), "snake&#95;case");
    }

    #[test]
    fn underscores_are_never_emphasis() {
        assert_eq!(format_inline("__init__ and _x_"), "__init__ and _x_");
    }

    #[test]
    fn unmatched_delimiters_stay_literal() {
        assert_eq!(format_inline("2 * 3"), "2 * 3");
        assert_eq!(format_inline("a ` b"), "a ` b");
        assert_eq!(format_inline("``"), "``");
    }

    #[test]
    fn bold_and_italic_are_not_escaped() {
        assert_eq!(format_inline("*<b>*"), "<em><b></em>");
    }

    #[test]
    fn empty_delimiter_pairs_follow_lazy_matching() {
        assert_eq!(format_inline("**"), "<em></em>");
        assert_eq!(format_inline("****"), "<strong></strong>");
    }

    #[test]
    fn multiple_code_spans_restore_in_order() {
        assert_eq!(
            format_inline("`a` *and* `b`"),
            "<code>a</code> <em>and</em> <code>b</code>"
        );
    }

    #[test]
    fn stray_placeholder_text_is_left_alone() {
        let input = format!("{} `x`", placeholder(7));
        assert_eq!(format_inline(&input), format!("{} <code>x</code>", placeholder(7)));
    }
}
