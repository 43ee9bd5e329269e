//! Offline bundle builder.
//!
//! Produces one HTML file with the stylesheet, script, deck manifest, slide
//! markdown and image assets inlined, so the deck can be opened straight from
//! disk with no network access.

pub mod assets;
pub mod error;
pub mod fs;
pub mod template;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use slide_deck_config::{BundleSettings, DeckSettings};
use slide_deck_core::{ContentSource, DeckError, DirectorySource, EmbeddedData};

pub use error::{BundleError, BundleResult};

use crate::assets::{encode_assets, inline_stylesheet_urls};
use crate::template::{inline_template, Inlined};

/// Summary of a completed build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleOutcome {
    pub output: PathBuf,
    pub slides: usize,
    pub assets: usize,
    pub missing_markers: Vec<&'static str>,
}

/// Builds the bundle described by `bundle` for the deck described by `deck`.
pub fn build_bundle(deck: &DeckSettings, bundle: &BundleSettings) -> BundleResult<BundleOutcome> {
    let template = read(&bundle.template)?;
    let stylesheet = read(&bundle.stylesheet)?;
    let script = read(&bundle.script)?;

    let source = DirectorySource::new(&deck.root, &deck.manifest);
    let manifest = source.read_manifest()?;

    let mut slides = BTreeMap::new();
    for entry in &manifest.slides {
        let text = source.read_slide(&entry.file)?;
        slides.insert(entry.file.clone(), text);
    }

    let assets = encode_assets(&bundle.assets)?;
    let stylesheet = inline_stylesheet_urls(&stylesheet, &assets);

    let embedded = EmbeddedData {
        deck: Some(manifest),
        slides,
        assets,
    };
    let embed_json = embedded.to_script_json()?;

    let (html, missing_markers) = inline_template(
        &template,
        &Inlined {
            stylesheet: &stylesheet,
            script: &script,
            embed_json: &embed_json,
        },
    );

    fs::write_atomic(&bundle.output, &html)?;
    tracing::info!(output = %bundle.output.display(), "bundle written");

    Ok(BundleOutcome {
        output: bundle.output.clone(),
        slides: embedded.slides.len(),
        assets: embedded.assets.len(),
        missing_markers,
    })
}

fn read(path: &Path) -> BundleResult<String> {
    let text = std::fs::read_to_string(path).map_err(|source| DeckError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(text)
}
