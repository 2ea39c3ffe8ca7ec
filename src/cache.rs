use std::{collections::HashMap, path::Path, sync::Arc};

use parking_lot::Mutex;

use crate::{
    error::FontError,
    fontdue_source::FontdueSource,
    glyph_box::GlyphBox,
    glyph_key::GlyphKey,
    glyph_source::{GlyphSource, Hinting},
};

/// Memoizes glyph geometry per (character, size, resolution, hinting).
///
/// The source is consulted at most once per distinct key. Failed loads are
/// not stored, so the next lookup of the same key retries. Entries are never
/// evicted; they live as long as the cache.
///
/// The map is guarded by a single mutex that is held while a missing glyph is
/// loaded, which makes concurrent `resolve` calls safe and keeps the
/// compute-once guarantee under contention.
pub struct MetricCache<S = FontdueSource> {
    source: S,
    entries: Mutex<HashMap<GlyphKey, Arc<GlyphBox>, fxhash::FxBuildHasher>>,
}

impl<S: GlyphSource> MetricCache<S> {
    /// Creates an empty cache over an already parsed font.
    pub fn new(source: S) -> Self {
        Self::with_capacity(source, 0)
    }

    /// Creates an empty cache with room for `capacity` glyph configurations.
    pub fn with_capacity(source: S, capacity: usize) -> Self {
        Self {
            source,
            entries: Mutex::new(HashMap::with_capacity_and_hasher(
                capacity,
                fxhash::FxBuildHasher::default(),
            )),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the cached glyph, loading it from the source on first use.
    pub fn resolve(
        &self,
        character: char,
        size: f64,
        resolution: f64,
        hinting: Hinting,
    ) -> Result<Arc<GlyphBox>, FontError> {
        self.resolve_key(&GlyphKey::new(character, size, resolution, hinting))
    }

    /// Same as [`resolve`](Self::resolve) with a prebuilt key.
    pub fn resolve_key(&self, key: &GlyphKey) -> Result<Arc<GlyphBox>, FontError> {
        use std::collections::hash_map::Entry;

        let mut entries = self.entries.lock();

        match entries.entry(*key) {
            Entry::Occupied(entry) => {
                log::trace!("glyph cache hit: {:?}", key);
                Ok(Arc::clone(entry.get()))
            }
            Entry::Vacant(entry) => {
                let scale = key.scale().ok_or_else(|| {
                    log::warn!("Glyph scale out of range: {:?}", key);
                    FontError::glyph_load(
                        key.character(),
                        format!(
                            "{}pt at {}dpi does not fit 26.6 fixed point",
                            key.size(),
                            key.resolution()
                        ),
                    )
                })?;
                let index = self.source.glyph_index(key.character());

                let metrics = self
                    .source
                    .load_glyph(index, scale, key.hinting())
                    .map_err(|e| {
                        log::warn!("Failed to load glyph {:?}: {}", key, e);
                        FontError::glyph_load(key.character(), e.to_string())
                    })?;

                log::debug!(
                    "glyph cache miss: {:?} -> index {}, scale {}",
                    key,
                    index,
                    scale.to_bits()
                );

                let glyph = entry.insert(Arc::new(GlyphBox::new(*key, index, scale, metrics)));
                Ok(Arc::clone(glyph))
            }
        }
    }

    /// Returns the cached glyph without loading it.
    pub fn get(&self, key: &GlyphKey) -> Option<Arc<GlyphBox>> {
        self.entries.lock().get(key).cloned()
    }

    pub fn contains(&self, key: &GlyphKey) -> bool {
        self.entries.lock().contains_key(key)
    }

    /// Number of cached glyph configurations.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

/// Construction from raw font data.
impl MetricCache<FontdueSource> {
    /// Parses font bytes with default settings.
    ///
    /// Fails with [`FontError::InvalidFont`] on empty input and
    /// [`FontError::Parse`] when the font engine rejects the bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, FontError> {
        Ok(Self::new(FontdueSource::from_bytes(data)?))
    }

    /// Parses font bytes with explicit `fontdue` settings.
    pub fn from_bytes_with(
        data: &[u8],
        settings: fontdue::FontSettings,
    ) -> Result<Self, FontError> {
        Ok(Self::new(FontdueSource::from_bytes_with(data, settings)?))
    }

    /// Reads and parses a font file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FontError> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        fixed::{Bounds, F26Dot6},
        glyph_source::GlyphMetrics,
    };
    use euclid::point2;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts loads and derives bounds from the request so every key
    /// dimension shows up in the result.
    ///
    /// The ink box is `index` pixels wide and `scale` sub-pixels tall, plus
    /// one pixel of height for each hinting step.
    #[derive(Default)]
    struct CountingSource {
        loads: AtomicUsize,
        failures_left: AtomicUsize,
    }

    impl CountingSource {
        fn failing(times: usize) -> Self {
            Self {
                loads: AtomicUsize::new(0),
                failures_left: AtomicUsize::new(times),
            }
        }

        fn loads(&self) -> usize {
            self.loads.load(Ordering::SeqCst)
        }
    }

    impl GlyphSource for CountingSource {
        type Error = FontError;

        fn glyph_index(&self, character: char) -> u16 {
            character as u16
        }

        fn load_glyph(
            &self,
            index: u16,
            scale: F26Dot6,
            hinting: Hinting,
        ) -> Result<GlyphMetrics, FontError> {
            self.loads.fetch_add(1, Ordering::SeqCst);

            let failed = self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if failed {
                return Err(FontError::Render("transient engine failure".into()));
            }

            let extra = match hinting {
                Hinting::None => 0,
                Hinting::Vertical => 1,
                Hinting::Full => 2,
            };

            Ok(GlyphMetrics {
                advance_width: scale,
                bounds: Bounds::new(
                    point2(F26Dot6::ZERO, F26Dot6::ZERO),
                    point2(
                        F26Dot6::from_bits(i32::from(index) * 64),
                        F26Dot6::from_bits(scale.to_bits() + extra * 64),
                    ),
                ),
            })
        }
    }

    #[test]
    fn test_second_resolve_is_a_hit() {
        let cache = MetricCache::new(CountingSource::default());

        let first = cache.resolve('A', 50.0, 72.0, Hinting::Full).unwrap();
        let second = cache.resolve('A', 50.0, 72.0, Hinting::Full).unwrap();

        assert_eq!(cache.source().loads(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.width(), second.width());
        assert_eq!(first.height(), second.height());
        assert_eq!(first.base_point(), second.base_point());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_scale_reaches_source() {
        let cache = MetricCache::new(CountingSource::default());

        // 50pt at 72dpi is 50px, 3200 in 26.6 units.
        let glyph = cache.resolve('A', 50.0, 72.0, Hinting::None).unwrap();
        assert_eq!(glyph.advance_width().to_bits(), 3200);
        assert_eq!(glyph.height(), 50);
        assert_eq!(glyph.width(), 'A' as i32);
        assert_eq!(glyph.glyph_index(), 'A' as u16);

        // 50pt at 50dpi truncates 2222.2 to 2222.
        let glyph = cache.resolve('A', 50.0, 50.0, Hinting::None).unwrap();
        assert_eq!(glyph.advance_width().to_bits(), 2222);
        assert_eq!(glyph.height(), 35);
    }

    #[test]
    fn test_every_key_dimension_discriminates() {
        let cache = MetricCache::new(CountingSource::default());

        let base = cache.resolve('A', 50.0, 72.0, Hinting::Full).unwrap();
        let other_size = cache.resolve('A', 66.0, 72.0, Hinting::Full).unwrap();
        let other_char = cache.resolve('B', 50.0, 72.0, Hinting::Full).unwrap();
        let other_dpi = cache.resolve('A', 50.0, 96.0, Hinting::Full).unwrap();
        let other_hinting = cache.resolve('A', 50.0, 72.0, Hinting::None).unwrap();

        assert_eq!(cache.source().loads(), 5);
        assert_eq!(cache.len(), 5);

        assert_eq!(base.height(), 52);
        assert_eq!(other_size.height(), 68);
        assert_eq!(other_char.width(), base.width() + 1);
        assert_eq!(other_dpi.height(), 69);
        assert_eq!(other_hinting.height(), 50);

        // the first entry is untouched by its neighbours
        let again = cache.resolve('A', 50.0, 72.0, Hinting::Full).unwrap();
        assert!(Arc::ptr_eq(&base, &again));
        assert_eq!(cache.source().loads(), 5);
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let cache = MetricCache::new(CountingSource::failing(1));
        let key = GlyphKey::new('g', 50.0, 72.0, Hinting::Full);

        let err = cache.resolve_key(&key).unwrap_err();
        assert!(matches!(err, FontError::GlyphLoad { character: 'g', .. }));
        assert!(!cache.contains(&key));
        assert!(cache.is_empty());

        let glyph = cache.resolve_key(&key).unwrap();
        assert_eq!(glyph.height(), 52);
        assert_eq!(cache.source().loads(), 2);
        assert!(Arc::ptr_eq(&glyph, &cache.get(&key).unwrap()));
    }

    #[test]
    fn test_unrepresentable_scale_is_rejected() {
        let cache = MetricCache::new(CountingSource::default());

        for size in [1.0e9, 5.0e8] {
            let err = cache.resolve('A', size, 72.0, Hinting::None).unwrap_err();
            assert!(matches!(err, FontError::GlyphLoad { character: 'A', .. }));
        }
        assert!(matches!(
            cache.resolve('A', f64::INFINITY, 72.0, Hinting::None),
            Err(FontError::GlyphLoad { .. })
        ));

        assert_eq!(cache.source().loads(), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_get_does_not_load() {
        let cache = MetricCache::new(CountingSource::default());
        let key = GlyphKey::new('x', 12.0, 96.0, Hinting::Vertical);

        assert!(cache.get(&key).is_none());
        assert_eq!(cache.source().loads(), 0);

        cache.resolve_key(&key).unwrap();
        assert!(cache.get(&key).is_some());
        assert_eq!(cache.source().loads(), 1);
    }

    #[test]
    fn test_concurrent_resolves_load_once() {
        let cache = MetricCache::with_capacity(CountingSource::default(), 4);

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for ch in ['a', 'b', 'c'] {
                        cache.resolve(ch, 24.0, 96.0, Hinting::Full).unwrap();
                    }
                });
            }
        });

        assert_eq!(cache.source().loads(), 3);
        assert_eq!(cache.len(), 3);
    }

    const TUFFY: &[u8] = include_bytes!("../testdata/Tuffy.ttf");

    #[test]
    fn test_real_font_geometry_per_hinting() {
        let cache = MetricCache::from_bytes(TUFFY).unwrap();

        // (character, hinting, width, height, base point) at 50pt, 72dpi
        let cases = [
            ('-', Hinting::None, 17, 4, (3, 14)),
            ('-', Hinting::Vertical, 17, 5, (3, 13)),
            ('-', Hinting::Full, 18, 5, (2, 13)),
            ('H', Hinting::None, 24, 36, (3, 0)),
            ('H', Hinting::Vertical, 24, 36, (3, 0)),
            ('H', Hinting::Full, 25, 36, (2, 0)),
            ('T', Hinting::None, 27, 36, (3, 0)),
            ('T', Hinting::Full, 27, 36, (2, 0)),
            ('x', Hinting::None, 20, 27, (2, 0)),
            ('x', Hinting::Full, 21, 27, (1, 0)),
        ];

        for (character, hinting, width, height, base) in cases {
            let glyph = cache.resolve(character, 50.0, 72.0, hinting).unwrap();
            let at = (character, hinting);
            assert_eq!(glyph.width(), width, "width of {at:?}");
            assert_eq!(glyph.height(), height, "height of {at:?}");
            let p = glyph.base_point();
            assert_eq!((p.x, p.y), base, "base point of {at:?}");
            assert_eq!(glyph.scale().to_bits(), 3200);
        }
        assert_eq!(cache.len(), cases.len());

        // full hinting rounds the advance to whole pixels
        let dash = cache.resolve('-', 50.0, 72.0, Hinting::Full).unwrap();
        assert_eq!(dash.advance_width().to_bits(), 21 * 64);
        let h = cache.resolve('H', 50.0, 72.0, Hinting::Full).unwrap();
        assert_eq!(h.advance_width().to_bits(), 29 * 64);
        assert_eq!(cache.len(), cases.len());
    }

    #[test]
    fn test_real_font_oversized_glyph_fails() {
        let cache = MetricCache::from_bytes(TUFFY).unwrap();

        for hinting in [Hinting::None, Hinting::Vertical, Hinting::Full] {
            let err = cache
                .resolve('\u{2014}', 1.0e9, 72.0, hinting)
                .unwrap_err();
            assert!(matches!(err, FontError::GlyphLoad { character: '\u{2014}', .. }));
        }
        assert!(cache.is_empty());

        let dash = cache.resolve('\u{2014}', 50.0, 72.0, Hinting::Full).unwrap();
        assert!(dash.width() > 0);
    }

    #[test]
    fn test_empty_bytes_are_invalid() {
        assert!(matches!(
            MetricCache::from_bytes(&[]),
            Err(FontError::InvalidFont)
        ));
    }

    #[test]
    fn test_garbage_bytes_fail_to_parse() {
        assert!(matches!(
            MetricCache::from_bytes(&[0xde, 0xad, 0xbe, 0xef, 0, 1, 2, 3]),
            Err(FontError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            MetricCache::from_file("/nonexistent/fontbox/missing.ttf"),
            Err(FontError::Io(_))
        ));
    }
}
