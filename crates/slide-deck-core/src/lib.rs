//! Deck runtime: manifest loading with embedded fallback, slide rendering
//! and navigation state.

pub mod app;
pub mod embed;
pub mod error;
pub mod loader;
pub mod manifest;
pub mod render;
pub mod source;

pub use app::{DeckApp, LoadTicket, SlideOption};
pub use embed::{EmbeddedData, EMBED_ASSIGNMENT};
pub use error::{DeckError, DeckResult, ExitCode};
pub use loader::{Loader, UNAVAILABLE_SLIDE};
pub use manifest::{DeckManifest, SlideEntry};
pub use render::{render_slide, rewrite_image_sources, RenderedSlide};
pub use source::{ContentSource, DirectorySource, Unavailable};
