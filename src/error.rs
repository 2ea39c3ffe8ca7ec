/// Errors surfaced while loading fonts, resolving glyphs and rendering them.
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    /// The font byte buffer was empty.
    #[error("invalid font: empty font data")]
    InvalidFont,

    /// The font engine rejected the bytes.
    #[error("failed to parse font: {0}")]
    Parse(String),

    /// The engine could not load one glyph at the requested scale and hinting.
    ///
    /// These failures are never cached, so a later lookup retries.
    #[error("failed to load glyph {character:?}: {message}")]
    GlyphLoad { character: char, message: String },

    /// Reading font bytes from disk failed.
    #[error("failed to read font file: {0}")]
    Io(#[from] std::io::Error),

    /// Composing the rendered glyph image failed.
    #[error("failed to render glyph: {0}")]
    Render(String),
}

/// Per-glyph failures reported by [`FontdueSource`](crate::FontdueSource).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RasterError {
    #[error("scale {0} px is not a positive finite pixel size")]
    InvalidScale(f32),

    #[error("glyph index {index} is out of range for a font with {count} glyphs")]
    IndexOutOfRange { index: u16, count: u16 },

    #[error("glyph edge at {0} px does not fit 26.6 fixed point")]
    Overflow(f32),
}

impl FontError {
    pub(crate) fn glyph_load(character: char, message: impl Into<String>) -> Self {
        Self::GlyphLoad {
            character,
            message: message.into(),
        }
    }
}
