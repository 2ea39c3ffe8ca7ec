//! # fontbox
//!
//! Per-glyph metric cache for a single font.
//!
//! ## Overview
//!
//! A [`MetricCache`] owns one parsed font and memoizes glyph geometry keyed by
//! (character, point size, resolution, hinting). The font engine is asked for
//! a glyph's advance and bounds at most once per distinct key; every later
//! lookup returns the same shared [`GlyphBox`]. Pixel sizes, the base point
//! and rotated box sizes are derived from the cached sub-pixel bounds.
//!
//! [`GlyphRenderer`] layers rendering on top of a cache: it paints a glyph
//! into an RGBA image and rotates it. [`FontStorage`] keeps a database of
//! faces and hands out one cache per face.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fontbox::{Hinting, MetricCache};
//!
//! let cache = MetricCache::from_file("DejaVuSans.ttf")?;
//! let glyph = cache.resolve('g', 50.0, 72.0, Hinting::Full)?;
//!
//! let base = glyph.base_point();
//! let rotated = glyph.box_size_with_rotate(40.0);
//! println!(
//!     "{}x{} at ({}, {}), rotated {}x{}",
//!     glyph.width(),
//!     glyph.height(),
//!     base.x,
//!     base.y,
//!     rotated.width,
//!     rotated.height
//! );
//! # Ok::<(), fontbox::FontError>(())
//! ```
//!
//! ## Thread Safety
//!
//! `MetricCache` guards its entries with one mutex, so a cache can be shared
//! between threads (for example behind an `Arc`).

pub mod cache;
pub mod error;
pub mod fixed;
pub mod font_storage;
pub mod fontdue_source;
pub mod glyph_box;
pub mod glyph_key;
pub mod glyph_source;
pub mod render;
pub mod rotate;

// common re-exports
pub use cache::MetricCache;
pub use error::{FontError, RasterError};
pub use fixed::{Bounds, F26Dot6};
pub use font_storage::FontStorage;
pub use fontdue_source::FontdueSource;
pub use glyph_box::GlyphBox;
pub use glyph_key::GlyphKey;
pub use glyph_source::{Coverage, GlyphMetrics, GlyphPainter, GlyphSource, Hinting};
pub use render::{GlyphRenderer, RenderGlyph};

// re-export dependencies
pub use euclid;
pub use font_types;
pub use fontdb;
pub use fontdue;
pub use image;
pub use tiny_skia;
