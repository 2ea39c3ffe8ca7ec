//! 26.6 fixed point helpers over [`font_types::F26Dot6`].
//!
//! Glyph geometry stays in 26.6 until a caller asks for whole pixels, so
//! sub-pixel advances and bounds are never truncated. Every conversion here
//! is checked or computed in `i64`, so extreme scales report an error instead
//! of wrapping.

pub use font_types::F26Dot6;

/// Number of sub-pixel units in one pixel.
pub const SUB_PIXEL_UNITS: i32 = 64;

const FRACT_MASK: i64 = (SUB_PIXEL_UNITS - 1) as i64;

/// Unit tag for coordinates measured in 26.6 sub-pixel units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubPixel;

/// Unit tag for coordinates measured in whole pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pixel;

/// Glyph bounds in sub-pixel space, y pointing up.
///
/// `min` may be negative when the ink extends left of or below the pen origin.
pub type Bounds = euclid::Box2D<F26Dot6, SubPixel>;

/// Converts a pixel value to 26.6, rounding to the nearest sub-pixel unit.
///
/// Returns `None` for non-finite values and for values outside the 26.6
/// range (about ±33.5 million pixels).
pub fn checked_from_pixels(pixels: f64) -> Option<F26Dot6> {
    let bits = (pixels * f64::from(SUB_PIXEL_UNITS)).round();
    in_range(bits).then(|| F26Dot6::from_bits(bits as i32))
}

/// Converts a raw 26.6 value held in a float, truncating toward zero.
pub fn checked_from_bits(bits: f64) -> Option<F26Dot6> {
    let bits = bits.trunc();
    in_range(bits).then(|| F26Dot6::from_bits(bits as i32))
}

fn in_range(bits: f64) -> bool {
    bits.is_finite() && bits >= f64::from(i32::MIN) && bits <= f64::from(i32::MAX)
}

/// Smallest whole pixel not less than `value`.
pub fn ceil(value: F26Dot6) -> i32 {
    ceil_bits(i64::from(value.to_bits()))
}

/// Largest whole pixel not greater than `value`.
pub fn floor(value: F26Dot6) -> i32 {
    value.to_bits() >> 6
}

/// Whole pixels covered between `min` and `max`, rounded up.
pub fn span(min: F26Dot6, max: F26Dot6) -> i32 {
    ceil_bits(i64::from(max.to_bits()) - i64::from(min.to_bits()))
}

// any i32 difference divided by 64 fits an i32
fn ceil_bits(bits: i64) -> i32 {
    ((bits >> 6) + i64::from(bits & FRACT_MASK != 0)) as i32
}
