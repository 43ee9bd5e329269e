use std::borrow::Cow;

/// Escapes `&`, `<` and `>` for HTML text content.
///
/// `&` is handled before the angle brackets so entities produced for them
/// are never escaped a second time. Quotes are left alone.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    html_escape::encode_text(text)
}
