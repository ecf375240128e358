//! Document adapters.
//!
//! - `PandocDeckRenderer` - Pitch deck HTML and PDF rendering via Pandoc

mod pandoc_deck_renderer;

pub use pandoc_deck_renderer::{deck_html, PandocDeckRenderer};
