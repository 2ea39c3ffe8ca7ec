use std::hash::{Hash, Hasher};

use crate::{
    fixed::{self, F26Dot6, SUB_PIXEL_UNITS},
    glyph_source::Hinting,
};

/// Typographic points per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Identifies one glyph configuration in a [`MetricCache`](crate::MetricCache).
///
/// Sizes and resolutions compare by exact bit pattern: no tolerance and no
/// quantization, so `12.0` and `12.000001` are different keys.
#[derive(Clone, Copy, Debug)]
pub struct GlyphKey {
    character: char,
    size: f64,
    resolution: f64,
    hinting: Hinting,
}

impl GlyphKey {
    pub fn new(character: char, size: f64, resolution: f64, hinting: Hinting) -> Self {
        Self {
            character,
            size,
            resolution,
            hinting,
        }
    }

    pub fn character(&self) -> char {
        self.character
    }

    /// Point size.
    pub fn size(&self) -> f64 {
        self.size
    }

    /// Resolution in dots per inch.
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn hinting(&self) -> Hinting {
        self.hinting
    }

    /// Rasterization scale in 26.6 units: `size * resolution * 64 / 72`.
    ///
    /// The float to fixed conversion truncates toward zero. Returns `None`
    /// when the product is not finite or does not fit 26.6.
    pub fn scale(&self) -> Option<F26Dot6> {
        let bits = self.size * self.resolution * (f64::from(SUB_PIXEL_UNITS) / POINTS_PER_INCH);
        fixed::checked_from_bits(bits)
    }
}

impl PartialEq for GlyphKey {
    fn eq(&self, other: &Self) -> bool {
        self.character == other.character
            && self.size.to_bits() == other.size.to_bits()
            && self.resolution.to_bits() == other.resolution.to_bits()
            && self.hinting == other.hinting
    }
}

impl Eq for GlyphKey {}

impl Hash for GlyphKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.character.hash(state);
        self.size.to_bits().hash(state);
        self.resolution.to_bits().hash(state);
        self.hinting.hash(state);
    }
}
