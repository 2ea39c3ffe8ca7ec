use crate::fixed::{Bounds, F26Dot6};

/// Rasterization strategy used when loading a glyph outline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Hinting {
    /// Exact outline geometry.
    None,
    /// Horizontal edges snapped to the pixel grid.
    Vertical,
    /// Both axes snapped to the pixel grid.
    #[default]
    Full,
}

/// Raw geometry of one glyph at one scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphMetrics {
    pub advance_width: F26Dot6,
    pub bounds: Bounds,
}

/// 8-bit coverage bitmap of a rasterized glyph.
///
/// Rows are stored top to bottom. `xmin`/`ymin` locate the bottom-left corner
/// of the bitmap relative to the pen origin, y pointing up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Coverage {
    pub width: usize,
    pub height: usize,
    pub xmin: i32,
    pub ymin: i32,
    pub data: Vec<u8>,
}

/// Access to glyph geometry of one parsed font.
///
/// `scale` is the pixel size in 26.6 units (64 per pixel).
pub trait GlyphSource {
    type Error: std::error::Error;

    /// Maps a character to the font's glyph index. Unmapped characters
    /// resolve to the `.notdef` glyph.
    fn glyph_index(&self, character: char) -> u16;

    fn load_glyph(
        &self,
        index: u16,
        scale: F26Dot6,
        hinting: Hinting,
    ) -> Result<GlyphMetrics, Self::Error>;
}

/// A [`GlyphSource`] that can also paint glyph coverage.
pub trait GlyphPainter: GlyphSource {
    /// Engines without a hinter may ignore `hinting`.
    fn rasterize(
        &self,
        index: u16,
        scale: F26Dot6,
        hinting: Hinting,
    ) -> Result<Coverage, Self::Error>;
}
