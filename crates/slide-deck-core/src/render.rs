use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;
use slide_markdown::parse;

use crate::manifest::SlideEntry;

static IMG_SRC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<img\s+[^>]*src=["'](.+?)["']"#).unwrap());

/// A slide ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedSlide {
    pub index: usize,
    pub title: String,
    pub html: String,
}

/// Converts slide markdown into display-ready HTML.
///
/// The title comes from the first heading, then the manifest entry, then a
/// positional `Slide N` label.
pub fn render_slide(
    index: usize,
    entry: &SlideEntry,
    text: &str,
    assets: &BTreeMap<String, String>,
) -> RenderedSlide {
    let parsed = parse(text);
    let title = parsed
        .title
        .filter(|title| !title.is_empty())
        .or_else(|| Some(entry.title.clone()).filter(|title| !title.is_empty()))
        .unwrap_or_else(|| format!("Slide {}", index + 1));

    RenderedSlide {
        index,
        title,
        html: rewrite_image_sources(&parsed.html, assets),
    }
}

/// Points `<img src>` attributes at embedded data URIs where one exists.
pub fn rewrite_image_sources(html: &str, assets: &BTreeMap<String, String>) -> String {
    if assets.is_empty() {
        return html.to_string();
    }

    IMG_SRC
        .replace_all(html, |caps: &Captures<'_>| {
            let whole = &caps[0];
            let Some(src) = caps.get(1) else {
                return whole.to_string();
            };
            match assets.get(src.as_str()) {
                Some(uri) => {
                    let offset = caps.get(0).map_or(0, |m| m.start());
                    let start = src.start() - offset;
                    let end = src.end() - offset;
                    format!("{}{}{}", &whole[..start], uri, &whole[end..])
                }
                None => whole.to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn assets() -> BTreeMap<String, String> {
        let mut assets = BTreeMap::new();
        assets.insert(
            "assets/logo.png".to_string(),
            "data:image/png;base64,AAAA".to_string(),
        );
        assets
    }

    fn entry(title: &str) -> SlideEntry {
        SlideEntry {
            title: title.into(),
            file: "slides/x.md".into(),
        }
    }

    #[test]
    fn title_prefers_heading_then_manifest_then_position() {
        let empty = BTreeMap::new();
        assert_eq!(render_slide(0, &entry("Manifest"), "# Heading", &empty).title, "Heading");
        assert_eq!(render_slide(0, &entry("Manifest"), "text", &empty).title, "Manifest");
        assert_eq!(render_slide(2, &entry(""), "text", &empty).title, "Slide 3");
    }

    #[test]
    fn rewrites_known_image_sources() {
        let html = "<figure>\n<img class=\"wide\" src=\"assets/logo.png\" alt=\"x\">\n";
        assert_eq!(
            rewrite_image_sources(html, &assets()),
            "<figure>\n<img class=\"wide\" src=\"data:image/png;base64,AAAA\" alt=\"x\">\n"
        );
    }

    #[test]
    fn accepts_single_quoted_sources() {
        assert_eq!(
            rewrite_image_sources("<img src='assets/logo.png'>", &assets()),
            "<img src='data:image/png;base64,AAAA'>"
        );
    }

    #[test]
    fn leaves_unknown_sources_alone() {
        let html = "<img src=\"https://example.com/a.png\">";
        assert_eq!(rewrite_image_sources(html, &assets()), html);
    }

    #[test]
    fn rendered_slide_carries_rewritten_html() {
        let slide = render_slide(
            0,
            &entry("Logo"),
            "<img src=\"assets/logo.png\">\n- item",
            &assets(),
        );
        assert_eq!(
            slide.html,
            "<img src=\"data:image/png;base64,AAAA\">\n<ul><li>item</li></ul>"
        );
    }
}
