use std::{ops::Deref, sync::Arc};

use image::{Rgba, RgbaImage};
use tiny_skia::{ColorU8, Pixmap};

use crate::{
    cache::MetricCache,
    error::FontError,
    fontdue_source::FontdueSource,
    glyph_box::GlyphBox,
    glyph_source::{GlyphPainter, Hinting},
    rotate::rotate,
};

/// Renders glyphs resolved through a [`MetricCache`].
///
/// Metrics are cached; rendered images are not. Every call to
/// [`RenderGlyph::render`] rasterizes again.
pub struct GlyphRenderer<P = FontdueSource> {
    cache: MetricCache<P>,
}

impl<P: GlyphPainter> GlyphRenderer<P> {
    pub fn new(cache: MetricCache<P>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &MetricCache<P> {
        &self.cache
    }

    pub fn into_cache(self) -> MetricCache<P> {
        self.cache
    }

    /// Resolves a glyph and returns a handle that can render it.
    pub fn glyph(
        &self,
        character: char,
        size: f64,
        resolution: f64,
        hinting: Hinting,
    ) -> Result<RenderGlyph<'_, P>, FontError> {
        let glyph = self.cache.resolve(character, size, resolution, hinting)?;
        Ok(RenderGlyph {
            painter: self.cache.source(),
            glyph,
        })
    }
}

/// A cached glyph paired with the font that can paint it.
///
/// Dereferences to [`GlyphBox`] for metrics.
pub struct RenderGlyph<'a, P> {
    painter: &'a P,
    glyph: Arc<GlyphBox>,
}

impl<P> Deref for RenderGlyph<'_, P> {
    type Target = GlyphBox;

    fn deref(&self) -> &GlyphBox {
        &self.glyph
    }
}

impl<P: GlyphPainter> RenderGlyph<'_, P> {
    /// The shared cache entry.
    pub fn glyph_box(&self) -> &Arc<GlyphBox> {
        &self.glyph
    }

    /// Paints the glyph in `color` on a transparent `width` x `height` canvas
    /// and rotates the canvas by `-angle` degrees counter-clockwise, that is
    /// clockwise for positive angles.
    ///
    /// The returned image is sized to hold the rotated canvas.
    ///
    /// The outline is always rasterized with [`Hinting::Full`], whatever the
    /// hinting of the cached metrics. The canvas size comes from those
    /// metrics.
    pub fn render(&self, angle: f64, color: Rgba<u8>) -> Result<RgbaImage, FontError> {
        let glyph = &self.glyph;
        let (width, height) = (glyph.width(), glyph.height());
        if width <= 0 || height <= 0 {
            return Ok(RgbaImage::new(0, 0));
        }

        let coverage = self
            .painter
            .rasterize(glyph.glyph_index(), glyph.scale(), Hinting::Full)
            .map_err(|e| FontError::glyph_load(glyph.character(), e.to_string()))?;

        if coverage.data.len() < coverage.width * coverage.height {
            return Err(FontError::Render(format!(
                "coverage buffer holds {} bytes, expected {}x{}",
                coverage.data.len(),
                coverage.width,
                coverage.height
            )));
        }

        let mut canvas = Pixmap::new(width as u32, height as u32).ok_or_else(|| {
            FontError::Render(format!("cannot allocate a {width}x{height} canvas"))
        })?;
        let stride = width as usize;
        let pixels = canvas.pixels_mut();

        // pen origin on the y-down canvas; the baseline sits `base.y` above
        // the bottom edge
        let base = glyph.base_point();
        let pen_x = -base.x;
        let pen_y = height + base.y;
        let left = pen_x + coverage.xmin;
        let top = pen_y - (coverage.ymin + coverage.height as i32);

        for row in 0..coverage.height {
            let y = top + row as i32;
            if y < 0 || y >= height {
                continue;
            }

            for col in 0..coverage.width {
                let alpha = coverage.data[row * coverage.width + col];
                if alpha == 0 {
                    continue;
                }

                let x = left + col as i32;
                if x < 0 || x >= width {
                    continue;
                }

                let a = (u16::from(color[3]) * u16::from(alpha) / 255) as u8;
                pixels[y as usize * stride + x as usize] =
                    ColorU8::from_rgba(color[0], color[1], color[2], a).premultiply();
            }
        }

        log::trace!(
            "rendered {:?} at {}x{}, angle {}",
            glyph.character(),
            width,
            height,
            angle
        );

        let rotated = rotate(&canvas, angle as f32).ok_or_else(|| {
            FontError::Render(format!("{width}x{height} canvas rotated by {angle} is too large"))
        })?;

        Ok(to_image(&rotated))
    }
}

fn to_image(pixmap: &Pixmap) -> RgbaImage {
    let mut image = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    image
}
