//! Shared test harness utilities for slide-deck crates.

use std::fs;
use std::path::Path;

use slide_deck_config::{Config, LoadOptions};

pub const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<link rel="stylesheet" href="theme.css">
</head>
<body>
<script>window.EMBED_DATA = window.EMBED_DATA || {};</script>
<script src="app.js"></script>
</body>
</html>
"#;

pub const STYLESHEET: &str =
    "body { background: url('assets/bg.png'); }\n.logo { background: url(assets/missing.png); }\n";

pub const SCRIPT: &str = "console.log('deck');\n";

pub const MANIFEST: &str = r#"{
  "title": "Fixture Deck",
  "slides": [
    { "title": "Welcome", "file": "slides/01-welcome.md" },
    { "title": "Details", "file": "slides/02-details.md" },
    { "title": "Untitled", "file": "slides/03-untitled.md" }
  ]
}
"#;

pub const WELCOME: &str = "# Welcome\n\nHello *there*.\n\n<img src=\"assets/bg.png\" alt=\"bg\">\n";

pub const DETAILS: &str = "## Details\n\n1. first\n2. second\n\n```\n<b>code</b>\n```\n";

pub const UNTITLED: &str = "Just a paragraph with `code`.\n";

/// Bytes of a 1x1 transparent GIF.
pub const PIXEL_GIF: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
    0x00, 0xff, 0xff, 0xff, 0x21, 0xf9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2c, 0x00, 0x00,
    0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x01, 0x44, 0x00, 0x3b,
];

/// Writes a complete three-slide deck project into `dir`.
pub fn write_fixture_deck(dir: &Path) {
    write(dir, "index.html", TEMPLATE.as_bytes());
    write(dir, "theme.css", STYLESHEET.as_bytes());
    write(dir, "app.js", SCRIPT.as_bytes());
    write(dir, "deck.json", MANIFEST.as_bytes());
    write(dir, "slides/01-welcome.md", WELCOME.as_bytes());
    write(dir, "slides/02-details.md", DETAILS.as_bytes());
    write(dir, "slides/03-untitled.md", UNTITLED.as_bytes());
    write(dir, "assets/bg.png", b"png-bytes");
    write(dir, "assets/pixel.gif", PIXEL_GIF);
    write(dir, "assets/notes.txt", b"not an image");
}

/// Returns the configuration a command would resolve inside `dir`.
pub fn test_config(dir: &Path) -> Config {
    Config::load(LoadOptions::default().with_working_dir(dir)).expect("load fixture config")
}

fn write(dir: &Path, relative: &str, contents: &[u8]) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent directory");
    }
    fs::write(&path, contents).expect("write fixture file");
}
