use slide_deck_core::EMBED_ASSIGNMENT;

pub const STYLESHEET_LINK: &str = r#"<link rel="stylesheet" href="theme.css">"#;
pub const SCRIPT_TAG: &str = r#"<script src="app.js"></script>"#;
pub const EMBED_PLACEHOLDER: &str = "window.EMBED_DATA = window.EMBED_DATA || {};";

/// Parts spliced into the page template.
pub struct Inlined<'a> {
    pub stylesheet: &'a str,
    pub script: &'a str,
    pub embed_json: &'a str,
}

/// Splices stylesheet, script and embedded data into `template`.
///
/// Each marker is replaced once; markers missing from the template are
/// returned so the caller can report them.
pub fn inline_template(template: &str, parts: &Inlined<'_>) -> (String, Vec<&'static str>) {
    let mut missing = Vec::new();
    let mut html = template.to_string();

    let substitutions = [
        (STYLESHEET_LINK, format!("<style>{}</style>", parts.stylesheet)),
        (SCRIPT_TAG, format!("<script>{}</script>", parts.script)),
        (
            EMBED_PLACEHOLDER,
            format!("{EMBED_ASSIGNMENT}{};", parts.embed_json),
        ),
    ];

    for (marker, replacement) in substitutions {
        if html.contains(marker) {
            html = html.replacen(marker, &replacement, 1);
        } else {
            tracing::warn!(marker, "template marker not found, leaving template unchanged");
            missing.push(marker);
        }
    }

    (html, missing)
}
