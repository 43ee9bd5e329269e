use std::collections::BTreeMap;

use serde::Serialize;

use crate::loader::Loader;
use crate::manifest::DeckManifest;
use crate::render::{render_slide, RenderedSlide};

const HASH_PREFIX: &str = "#slide";

/// Entry for the slide selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlideOption {
    pub value: usize,
    pub label: String,
}

/// Proof that a load was requested; only the newest ticket may commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    index: usize,
    generation: u64,
}

impl LoadTicket {
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Deck presentation state: the loaded manifest and the slide on display.
pub struct DeckApp {
    loader: Loader,
    deck: DeckManifest,
    current: Option<usize>,
    generation: u64,
}

impl DeckApp {
    /// Loads the manifest through `loader`. No slide is shown until the first
    /// navigation call.
    pub fn open(loader: Loader) -> Self {
        let deck = loader.load_deck();
        tracing::debug!(slides = deck.len(), "deck loaded");
        Self {
            loader,
            deck,
            current: None,
            generation: 0,
        }
    }

    pub fn deck(&self) -> &DeckManifest {
        &self.deck
    }

    pub fn title(&self) -> Option<&str> {
        self.deck.title.as_deref()
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn options(&self) -> Vec<SlideOption> {
        self.deck
            .slides
            .iter()
            .enumerate()
            .map(|(index, slide)| SlideOption {
                value: index,
                label: format!("{}. {}", index + 1, slide.title),
            })
            .collect()
    }

    /// Picks the first slide to show from a `#slideN` location hash.
    pub fn start_index(&self, hash: Option<&str>) -> usize {
        hash.and_then(|hash| hash.strip_prefix(HASH_PREFIX))
            .and_then(leading_number)
            .filter(|n| *n > 0 && *n <= self.deck.len())
            .map_or(0, |n| n - 1)
    }

    /// Location hash identifying the slide on display.
    pub fn hash(&self) -> Option<String> {
        self.current.map(|index| format!("{HASH_PREFIX}{}", index + 1))
    }

    pub fn begin_load(&mut self, index: usize) -> Option<LoadTicket> {
        self.deck.get(index)?;
        self.generation += 1;
        Some(LoadTicket {
            index,
            generation: self.generation,
        })
    }

    /// Renders the slide a ticket refers to.
    pub fn render(&self, ticket: &LoadTicket) -> Option<RenderedSlide> {
        let entry = self.deck.get(ticket.index)?;
        let text = self.loader.load_slide_text(entry);
        let empty = BTreeMap::new();
        let assets = self
            .loader
            .embedded()
            .map_or(&empty, |embedded| &embedded.assets);
        Some(render_slide(ticket.index, entry, &text, assets))
    }

    /// Makes `slide` current if `ticket` is the latest load requested.
    ///
    /// Returns the slide back when it was accepted; results of superseded
    /// loads are dropped.
    pub fn complete(&mut self, ticket: LoadTicket, slide: RenderedSlide) -> Option<RenderedSlide> {
        if ticket.generation != self.generation {
            tracing::debug!(
                index = ticket.index,
                "discarding superseded slide load"
            );
            return None;
        }
        self.current = Some(ticket.index);
        Some(slide)
    }

    pub fn goto(&mut self, index: usize) -> Option<RenderedSlide> {
        let ticket = self.begin_load(index)?;
        let slide = self.render(&ticket)?;
        self.complete(ticket, slide)
    }

    pub fn next(&mut self) -> Option<RenderedSlide> {
        let len = self.deck.len();
        if len == 0 {
            return None;
        }
        let index = self.current.map_or(0, |current| (current + 1) % len);
        self.goto(index)
    }

    pub fn prev(&mut self) -> Option<RenderedSlide> {
        let len = self.deck.len();
        if len == 0 {
            return None;
        }
        let index = self.current.map_or(len - 1, |current| (current + len - 1) % len);
        self.goto(index)
    }

    /// Navigates to the slide named by a selector value.
    pub fn select(&mut self, value: &str) -> Option<RenderedSlide> {
        let index = leading_number(value.trim())?;
        self.goto(index)
    }
}

/// Reads the leading decimal digits of `text`, ignoring anything after them.
fn leading_number(text: &str) -> Option<usize> {
    let end = text
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(text.len());
    text[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::EmbeddedData;
    use crate::manifest::SlideEntry;
    use crate::source::Unavailable;

    fn app(count: usize) -> DeckApp {
        let mut embedded = EmbeddedData::default();
        let mut slides = Vec::new();
        for n in 1..=count {
            let file = format!("{n}.md");
            embedded.slides.insert(file.clone(), format!("# Heading {n}"));
            slides.push(SlideEntry {
                title: format!("Slide title {n}"),
                file,
            });
        }
        embedded.deck = Some(DeckManifest {
            title: Some("Deck".into()),
            slides,
        });
        DeckApp::open(Loader::new(Unavailable).with_embedded(embedded))
    }

    #[test]
    fn options_are_numbered_from_one() {
        let labels: Vec<_> = app(2).options().into_iter().map(|o| o.label).collect();
        assert_eq!(labels, vec!["1. Slide title 1", "2. Slide title 2"]);
    }

    #[test]
    fn start_index_reads_slide_hash() {
        let app = app(3);
        assert_eq!(app.start_index(Some("#slide2")), 1);
        assert_eq!(app.start_index(Some("#slide3extra")), 2);
        assert_eq!(app.start_index(Some("#slide0")), 0);
        assert_eq!(app.start_index(Some("#slide4")), 0);
        assert_eq!(app.start_index(Some("#slide-1")), 0);
        assert_eq!(app.start_index(Some("#other")), 0);
        assert_eq!(app.start_index(None), 0);
    }

    #[test]
    fn next_and_prev_wrap_around() {
        let mut app = app(3);
        assert_eq!(app.goto(2).map(|s| s.index), Some(2));
        assert_eq!(app.next().map(|s| s.index), Some(0));
        assert_eq!(app.prev().map(|s| s.index), Some(2));
        assert_eq!(app.hash().as_deref(), Some("#slide3"));
    }

    #[test]
    fn out_of_range_navigation_changes_nothing() {
        let mut app = app(2);
        app.goto(1);
        assert!(app.goto(5).is_none());
        assert!(app.select("nope").is_none());
        assert_eq!(app.current(), Some(1));
    }

    #[test]
    fn empty_deck_ignores_navigation() {
        let mut app = DeckApp::open(Loader::new(Unavailable));
        assert!(app.next().is_none());
        assert!(app.prev().is_none());
        assert_eq!(app.hash(), None);
    }

    #[test]
    fn superseded_loads_are_discarded() {
        let mut app = app(3);
        let stale = app.begin_load(0).unwrap();
        let fresh = app.begin_load(2).unwrap();

        let fresh_slide = app.render(&fresh).unwrap();
        assert!(app.complete(fresh, fresh_slide).is_some());

        let stale_slide = app.render(&stale).unwrap();
        assert!(app.complete(stale, stale_slide).is_none());
        assert_eq!(app.current(), Some(2));
    }

    #[test]
    fn select_uses_selector_value() {
        let mut app = app(3);
        let slide = app.select("1").unwrap();
        assert_eq!(slide.title, "Heading 2");
    }
}
