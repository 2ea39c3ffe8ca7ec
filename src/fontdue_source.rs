use euclid::{Box2D, point2};

use crate::{
    error::{FontError, RasterError},
    fixed::{self, Bounds, F26Dot6, SUB_PIXEL_UNITS},
    glyph_source::{Coverage, GlyphMetrics, GlyphPainter, GlyphSource, Hinting},
};

/// [`GlyphSource`] backed by a parsed `fontdue` font.
pub struct FontdueSource {
    font: fontdue::Font,
}

impl FontdueSource {
    /// Wraps an already parsed font.
    pub fn new(font: fontdue::Font) -> Self {
        Self { font }
    }

    /// Parses font bytes with default settings.
    pub fn from_bytes(data: &[u8]) -> Result<Self, FontError> {
        Self::from_bytes_with(data, fontdue::FontSettings::default())
    }

    /// Parses font bytes.
    ///
    /// Empty input is rejected before it reaches the parser.
    pub fn from_bytes_with(
        data: &[u8],
        settings: fontdue::FontSettings,
    ) -> Result<Self, FontError> {
        if data.is_empty() {
            return Err(FontError::InvalidFont);
        }

        let font = fontdue::Font::from_bytes(data, settings)
            .map_err(|e| FontError::Parse(e.to_string()))?;

        Ok(Self::new(font))
    }

    /// Returns the underlying font.
    pub fn font(&self) -> &fontdue::Font {
        &self.font
    }

    fn pixel_size(&self, index: u16, scale: F26Dot6) -> Result<f32, RasterError> {
        let px = scale.to_bits() as f32 / SUB_PIXEL_UNITS as f32;
        if !px.is_finite() || px <= 0.0 {
            return Err(RasterError::InvalidScale(px));
        }

        let count = self.font.glyph_count();
        if index >= count {
            return Err(RasterError::IndexOutOfRange { index, count });
        }

        Ok(px)
    }
}

impl GlyphSource for FontdueSource {
    type Error = RasterError;

    fn glyph_index(&self, character: char) -> u16 {
        self.font.lookup_glyph_index(character)
    }

    fn load_glyph(
        &self,
        index: u16,
        scale: F26Dot6,
        hinting: Hinting,
    ) -> Result<GlyphMetrics, RasterError> {
        let px = self.pixel_size(index, scale)?;
        let metrics = self.font.metrics_indexed(index, px);
        let outline = metrics.bounds;

        let (xmin, xmax) = (outline.xmin, outline.xmin + outline.width);
        let (ymin, ymax) = (outline.ymin, outline.ymin + outline.height);

        let (x_range, y_range, advance_width) = match hinting {
            Hinting::None => (
                exact(xmin, xmax)?,
                exact(ymin, ymax)?,
                to_fixed(metrics.advance_width)?,
            ),
            Hinting::Vertical => (
                exact(xmin, xmax)?,
                grid_fit(ymin, ymax)?,
                to_fixed(metrics.advance_width)?,
            ),
            Hinting::Full => (
                grid_fit(xmin, xmax)?,
                grid_fit(ymin, ymax)?,
                to_fixed(metrics.advance_width.round())?,
            ),
        };

        let bounds: Bounds = Box2D::new(
            point2(x_range.0, y_range.0),
            point2(x_range.1, y_range.1),
        );

        Ok(GlyphMetrics {
            advance_width,
            bounds,
        })
    }
}

impl GlyphPainter for FontdueSource {
    fn rasterize(
        &self,
        index: u16,
        scale: F26Dot6,
        _hinting: Hinting,
    ) -> Result<Coverage, RasterError> {
        let px = self.pixel_size(index, scale)?;
        let (metrics, data) = self.font.rasterize_indexed(index, px);

        Ok(Coverage {
            width: metrics.width,
            height: metrics.height,
            xmin: metrics.xmin,
            ymin: metrics.ymin,
            data,
        })
    }
}

fn to_fixed(pixels: f32) -> Result<F26Dot6, RasterError> {
    fixed::checked_from_pixels(f64::from(pixels)).ok_or(RasterError::Overflow(pixels))
}

fn exact(min: f32, max: f32) -> Result<(F26Dot6, F26Dot6), RasterError> {
    Ok((to_fixed(min)?, to_fixed(max)?))
}

/// Expands an edge pair outward to whole pixels.
fn grid_fit(min: f32, max: f32) -> Result<(F26Dot6, F26Dot6), RasterError> {
    Ok((to_fixed(min.floor())?, to_fixed(max.ceil())?))
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bytes_are_invalid() {
        assert!(matches!(
            FontdueSource::from_bytes(&[]),
            Err(FontError::InvalidFont)
        ));
    }

    #[test]
    fn test_garbage_bytes_fail_to_parse() {
        let garbage = b"definitely not a font program".to_vec();
        assert!(matches!(
            FontdueSource::from_bytes(&garbage),
            Err(FontError::Parse(_))
        ));
    }

    #[test]
    fn test_grid_fit_expands_outward() {
        let (min, max) = grid_fit(-2.3, 7.1).unwrap();
        assert_eq!(min.to_bits(), -3 * 64);
        assert_eq!(max.to_bits(), 8 * 64);

        let (min, max) = exact(-2.25, 7.5).unwrap();
        assert_eq!(min.to_bits(), -144);
        assert_eq!(max.to_bits(), 480);
    }

    #[test]
    fn test_edges_beyond_fixed_range_fail() {
        // an em dash at 1e9pt spans roughly 1e9 px
        assert_eq!(grid_fit(0.0, 1.0e9), Err(RasterError::Overflow(1.0e9)));
        assert_eq!(grid_fit(-4.0e7, 1.0), Err(RasterError::Overflow(-4.0e7)));
        assert_eq!(exact(1.0, 4.0e7), Err(RasterError::Overflow(4.0e7)));
        assert_eq!(to_fixed(f32::INFINITY), Err(RasterError::Overflow(f32::INFINITY)));
        assert!(grid_fit(-3.0e7, 3.0e7).is_ok());
    }
}
