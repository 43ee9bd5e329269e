use std::path::Path;

use crate::embed::EmbeddedData;
use crate::error::DeckResult;
use crate::manifest::{DeckManifest, SlideEntry};
use crate::source::{read_text, ContentSource};

/// Text shown in place of a slide that neither source can provide.
pub const UNAVAILABLE_SLIDE: &str = "Unable to load slide.";

/// Fetches deck content from a primary source, falling back to embedded data.
///
/// Loading never fails outright: a missing manifest becomes an empty deck and
/// a missing slide becomes [`UNAVAILABLE_SLIDE`].
pub struct Loader {
    primary: Box<dyn ContentSource>,
    embedded: Option<EmbeddedData>,
}

impl Loader {
    pub fn new(primary: impl ContentSource + 'static) -> Self {
        Self {
            primary: Box::new(primary),
            embedded: None,
        }
    }

    pub fn with_embedded(mut self, embedded: EmbeddedData) -> Self {
        self.embedded = Some(embedded);
        self
    }

    /// Attaches the data embedded in a previously built bundle, if it has any.
    pub fn with_bundle(self, bundle: &Path) -> DeckResult<Self> {
        let html = read_text(bundle)?;
        Ok(match EmbeddedData::from_bundle_html(&html)? {
            Some(embedded) => self.with_embedded(embedded),
            None => {
                tracing::warn!(bundle = %bundle.display(), "bundle carries no embedded data");
                self
            }
        })
    }

    pub fn embedded(&self) -> Option<&EmbeddedData> {
        self.embedded.as_ref()
    }

    pub fn load_deck(&self) -> DeckManifest {
        match self.primary.read_manifest() {
            Ok(manifest) => manifest,
            Err(err) => match self.embedded.as_ref().and_then(|data| data.deck.clone()) {
                Some(manifest) => {
                    tracing::debug!(error = %err, "using embedded deck manifest");
                    manifest
                }
                None => {
                    tracing::error!(error = %err, "failed to load deck manifest and no fallback available");
                    DeckManifest::default()
                }
            },
        }
    }

    pub fn load_slide_text(&self, entry: &SlideEntry) -> String {
        match self.primary.read_slide(&entry.file) {
            Ok(text) => text,
            Err(err) => {
                let fallback = self
                    .embedded
                    .as_ref()
                    .and_then(|data| data.slide(&entry.file));
                match fallback {
                    Some(text) => {
                        tracing::debug!(file = %entry.file, error = %err, "using embedded slide");
                        text.to_string()
                    }
                    None => {
                        tracing::warn!(file = %entry.file, error = %err, "slide unavailable");
                        UNAVAILABLE_SLIDE.to_string()
                    }
                }
            }
        }
    }
}
