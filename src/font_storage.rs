use std::{collections::HashMap, path::PathBuf, sync::Arc};

use crate::cache::MetricCache;

/// A database of font faces, each with its own lazily built [`MetricCache`].
///
/// Faces are registered through `fontdb`. A face is parsed by `fontdue` the
/// first time its cache is requested, and the same cache is returned from
/// then on.
pub struct FontStorage {
    font_db: fontdb::Database,
    /// Caches of faces that have been requested at least once.
    caches: HashMap<fontdb::ID, Arc<MetricCache>, fxhash::FxBuildHasher>,
}

impl Default for FontStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl FontStorage {
    /// Creates a new empty font storage.
    pub fn new() -> Self {
        Self {
            font_db: fontdb::Database::new(),
            caches: HashMap::with_hasher(fxhash::FxBuildHasher::default()),
        }
    }
}

/// Registering faces.
impl FontStorage {
    /// Loads a font from binary data. Data that holds no parsable face is
    /// ignored.
    pub fn load_font_binary(&mut self, data: impl Into<Vec<u8>>) {
        self.font_db.load_font_data(data.into());
    }

    pub fn load_font_file(&mut self, path: PathBuf) -> Result<(), std::io::Error> {
        self.font_db.load_font_file(path)
    }

    pub fn load_fonts_dir(&mut self, dir: PathBuf) {
        self.font_db.load_fonts_dir(dir)
    }

    pub fn load_system_fonts(&mut self) {
        self.font_db.load_system_fonts();
    }

    /// Removes a face and drops its cache.
    pub fn remove_face(&mut self, id: fontdb::ID) {
        self.font_db.remove_face(id);
        self.caches.remove(&id);
    }

    pub fn is_empty(&self) -> bool {
        self.font_db.is_empty()
    }

    /// Returns the number of registered faces.
    pub fn len(&self) -> usize {
        self.font_db.len()
    }
}

/// Get `MetricCache`
impl FontStorage {
    /// Queries for a face matching the description and returns its cache.
    pub fn query(&mut self, query: &fontdb::Query) -> Option<(fontdb::ID, Arc<MetricCache>)> {
        let id = self.font_db.query(query)?;
        self.metric_cache(id).map(|cache| (id, cache))
    }

    /// Returns the cache of a face, parsing the face on first use.
    pub fn metric_cache(&mut self, id: fontdb::ID) -> Option<Arc<MetricCache>> {
        use std::collections::hash_map::Entry;

        match self.caches.entry(id) {
            Entry::Occupied(entry) => Some(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let cache_result = self.font_db.with_face_data(id, |data, index| {
                    MetricCache::from_bytes_with(
                        data,
                        fontdue::FontSettings {
                            collection_index: index,
                            ..Default::default()
                        },
                    )
                })?;

                match cache_result {
                    Ok(cache) => {
                        log::debug!("Created metric cache for font (id: {:?})", id);
                        let r: &mut Arc<MetricCache> = entry.insert(Arc::new(cache));
                        Some(Arc::clone(r))
                    }
                    Err(e) => {
                        log::error!("Failed to load font (id: {:?}): {}", id, e);
                        None
                    }
                }
            }
        }
    }

    pub fn faces(&self) -> impl Iterator<Item = &fontdb::FaceInfo> {
        self.font_db.faces()
    }

    pub fn face(&self, id: fontdb::ID) -> Option<&fontdb::FaceInfo> {
        self.font_db.face(id)
    }
}
