use tiny_skia::{FilterQuality, Pixmap, PixmapPaint, Point, Transform};

// absorbs float noise so exact quarter turns keep their integer size
const EXTENT_SLACK: f32 = 1e-3;

/// Rotates a pixmap clockwise by `angle` degrees about its centre.
///
/// The output is sized to the bounding box of the rotated pixmap. Uncovered
/// pixels are transparent and samples are bilinearly filtered. Returns `None`
/// when the rotated extent does not fit a pixmap.
pub fn rotate(src: &Pixmap, angle: f32) -> Option<Pixmap> {
    let (src_w, src_h) = (src.width() as f32, src.height() as f32);
    let spin = Transform::from_rotate(angle);

    let mut corners = [
        Point::from_xy(0.0, 0.0),
        Point::from_xy(src_w, 0.0),
        Point::from_xy(src_w, src_h),
        Point::from_xy(0.0, src_h),
    ];
    spin.map_points(&mut corners);

    let (min, max) = corners.iter().fold(
        (Point::from_xy(f32::MAX, f32::MAX), Point::from_xy(f32::MIN, f32::MIN)),
        |(min, max), c| {
            (
                Point::from_xy(min.x.min(c.x), min.y.min(c.y)),
                Point::from_xy(max.x.max(c.x), max.y.max(c.y)),
            )
        },
    );

    let extent = |len: f32| (len - EXTENT_SLACK).ceil().max(1.0) as u32;
    let mut dst = Pixmap::new(extent(max.x - min.x), extent(max.y - min.y))?;

    let transform = Transform::from_translate(-src_w / 2.0, -src_h / 2.0)
        .post_concat(spin)
        .post_translate(dst.width() as f32 / 2.0, dst.height() as f32 / 2.0);

    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    dst.draw_pixmap(0, 0, src.as_ref(), &paint, transform, None);

    Some(dst)
}
