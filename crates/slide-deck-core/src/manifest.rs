use serde::{Deserialize, Serialize};

/// Ordered list of slides plus deck-level metadata, as stored in `deck.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub slides: Vec<SlideEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideEntry {
    pub title: String,
    /// Path of the slide's markdown, relative to the deck root.
    pub file: String,
}

impl DeckManifest {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SlideEntry> {
        self.slides.get(index)
    }
}
