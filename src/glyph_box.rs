use euclid::{Point2D, Size2D, point2, size2};

use crate::{
    fixed::{self, Bounds, F26Dot6, Pixel},
    glyph_key::GlyphKey,
    glyph_source::{GlyphMetrics, Hinting},
};

const HALF_CIRCLE_DEGREES: f64 = 180.0;

/// Cached geometry of one glyph configuration.
///
/// Only the raw advance and bounds are stored. Pixel sizes are derived on
/// demand, rounding outward.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphBox {
    key: GlyphKey,
    glyph_index: u16,
    scale: F26Dot6,
    advance_width: F26Dot6,
    bounds: Bounds,
}

impl GlyphBox {
    pub(crate) fn new(
        key: GlyphKey,
        glyph_index: u16,
        scale: F26Dot6,
        metrics: GlyphMetrics,
    ) -> Self {
        Self {
            key,
            glyph_index,
            scale,
            advance_width: metrics.advance_width,
            bounds: metrics.bounds,
        }
    }

    pub fn key(&self) -> &GlyphKey {
        &self.key
    }

    pub fn character(&self) -> char {
        self.key.character()
    }

    pub fn size(&self) -> f64 {
        self.key.size()
    }

    pub fn resolution(&self) -> f64 {
        self.key.resolution()
    }

    pub fn hinting(&self) -> Hinting {
        self.key.hinting()
    }

    pub fn glyph_index(&self) -> u16 {
        self.glyph_index
    }

    /// Pixel size the glyph was loaded at, in 26.6 units.
    pub fn scale(&self) -> F26Dot6 {
        self.scale
    }

    /// Horizontal pen advance in sub-pixel units.
    pub fn advance_width(&self) -> F26Dot6 {
        self.advance_width
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Ink width in whole pixels.
    pub fn width(&self) -> i32 {
        fixed::span(self.bounds.min.x, self.bounds.max.x)
    }

    /// Ink height in whole pixels.
    pub fn height(&self) -> i32 {
        fixed::span(self.bounds.min.y, self.bounds.max.y)
    }

    /// Offset of the ink box from the pen origin. A negative `y` marks a
    /// descender.
    pub fn base_point(&self) -> Point2D<i32, Pixel> {
        point2(fixed::ceil(self.bounds.min.x), fixed::ceil(self.bounds.min.y))
    }

    /// Size of the axis-aligned box enclosing the `width` x `height` ink box
    /// rotated by `angle` degrees.
    ///
    /// Negative angles are reflected to `180 - angle` before rotating, so
    /// `-40` sizes the same as `220`.
    pub fn box_size_with_rotate(&self, angle: f64) -> Size2D<i32, Pixel> {
        let angle = if angle < 0.0 {
            HALF_CIRCLE_DEGREES - angle
        } else {
            angle
        };

        let t = angle * (std::f64::consts::PI / HALF_CIRCLE_DEGREES);
        let (sin, cos) = t.sin_cos();
        let bx = f64::from(self.width());
        let by = f64::from(self.height());

        let width = (bx * cos + by * sin).round().abs() as i32;
        let height = (bx * sin + by * cos).round().abs() as i32;

        size2(width, height)
    }
}
