use crate::escape::escape_html;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Ordered,
    Unordered,
}

impl ListKind {
    fn tag(self) -> &'static str {
        match self {
            ListKind::Ordered => "ol",
            ListKind::Unordered => "ul",
        }
    }
}

/// Block-level state carried from one line to the next during a parse.
///
/// `code_buffer` only holds lines while `in_code` is set, and `list_buffer`
/// only holds items while `list_type` is `Some`.
#[derive(Debug, Default)]
pub struct ParserState {
    pub(crate) in_code: bool,
    code_buffer: Vec<String>,
    list_buffer: Vec<String>,
    list_type: Option<ListKind>,
    html: String,
    title: Option<String>,
}

impl ParserState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_code(&self) -> bool {
        self.in_code
    }

    pub fn code_lines(&self) -> &[String] {
        &self.code_buffer
    }

    pub fn list_items(&self) -> &[String] {
        &self.list_buffer
    }

    pub fn list_kind(&self) -> Option<ListKind> {
        self.list_type
    }

    pub fn open_code(&mut self) {
        self.flush_list();
        self.in_code = true;
        self.code_buffer.clear();
    }

    pub fn push_code_line(&mut self, line: String) {
        self.code_buffer.push(line);
    }

    pub fn close_code(&mut self) {
        self.html.push_str("<pre><code>");
        self.html.push_str(&escape_html(&self.code_buffer.join("\n")));
        self.html.push_str("</code></pre>");
        self.in_code = false;
        self.code_buffer.clear();
    }

    /// Appends a rendered item, closing the open list first if it is of the other kind.
    pub fn push_item(&mut self, kind: ListKind, item: String) {
        if self.list_type.is_some_and(|open| open != kind) {
            self.flush_list();
        }
        self.list_type = Some(kind);
        self.list_buffer.push(item);
    }

    pub fn flush_list(&mut self) {
        if self.list_buffer.is_empty() {
            return;
        }

        let tag = self.list_type.unwrap_or(ListKind::Unordered).tag();
        self.html.push('<');
        self.html.push_str(tag);
        self.html.push('>');
        for item in self.list_buffer.drain(..) {
            self.html.push_str("<li>");
            self.html.push_str(&item);
            self.html.push_str("</li>");
        }
        self.html.push_str("</");
        self.html.push_str(tag);
        self.html.push('>');
        self.list_type = None;
    }

    pub fn push_html(&mut self, fragment: &str) {
        self.html.push_str(fragment);
    }

    /// Records `text` as the document title unless one has already been claimed.
    pub fn offer_title(&mut self, text: &str) {
        if self.title.is_none() && !text.is_empty() {
            self.title = Some(text.to_string());
        }
    }

    /// Flushes any open list and yields the accumulated title and HTML.
    ///
    /// An unterminated code block is dropped here rather than emitted.
    pub fn finalize(mut self) -> (Option<String>, String) {
        self.flush_list();
        if self.in_code {
            tracing::debug!(
                lines = self.code_buffer.len(),
                "discarding unterminated fenced code block"
            );
        }
        (self.title, self.html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flushing_empty_list_is_noop() {
        let mut state = ParserState::new();
        state.flush_list();
        let (_, html) = state.finalize();
        assert_eq!(html, "");
    }

    #[test]
    fn switching_list_kind_flushes_previous_list() {
        let mut state = ParserState::new();
        state.push_item(ListKind::Unordered, "a".into());
        state.push_item(ListKind::Ordered, "b".into());
        assert_eq!(state.list_kind(), Some(ListKind::Ordered));
        assert_eq!(state.list_items(), ["b".to_string()]);
        let (_, html) = state.finalize();
        assert_eq!(html, "<ul><li>a</li></ul><ol><li>b</li></ol>");
    }

    #[test]
    fn first_non_empty_title_wins() {
        let mut state = ParserState::new();
        state.offer_title("");
        state.offer_title("First");
        state.offer_title("Second");
        let (title, _) = state.finalize();
        assert_eq!(title.as_deref(), Some("First"));
    }

    #[test]
    fn closing_code_resets_buffers() {
        let mut state = ParserState::new();
        state.open_code();
        state.push_code_line("a < b".into());
        state.close_code();
        assert!(!state.in_code());
        assert!(state.code_lines().is_empty());
        let (_, html) = state.finalize();
        assert_eq!(html, "<pre><code>a &lt; b</code></pre>");
    }
}
