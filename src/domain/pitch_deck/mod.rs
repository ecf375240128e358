//! Pitch deck content.

mod slide;

pub use slide::{fallback_slides, normalize_slides, Slide, DEFAULT_SLIDE_ICON};
