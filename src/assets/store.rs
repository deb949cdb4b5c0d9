use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::assets::decode::decode_layer;
use crate::foundation::error::{BadgeError, BadgeResult};
use crate::foundation::math::content_hash;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Decoded raster image in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Width over height.
    pub fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

#[derive(Clone, Debug)]
/// Parsed SVG document.
pub(crate) struct PreparedSvg {
    /// Parsed SVG tree.
    pub(crate) tree: Arc<usvg::Tree>,
}

/// Pixel size an SVG source is rasterized to. Raster sources keep their own size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SvgSize {
    /// Stretch to exactly `width x height`.
    Exact(u32, u32),
    /// Keep the document's aspect ratio; the shorter side gets this many pixels.
    MinSide(u32),
}

impl SvgSize {
    /// Concrete raster size for a document of `doc_w x doc_h` user units.
    pub fn resolve(self, doc_w: f64, doc_h: f64) -> (u32, u32) {
        match self {
            Self::Exact(w, h) => (w, h),
            Self::MinSide(min) => {
                let k = f64::from(min) / doc_w.min(doc_h);
                let w = (doc_w * k).round().max(1.0) as u32;
                let h = (doc_h * k).round().max(1.0) as u32;
                (w, h)
            }
        }
    }
}

/// Where a layer's encoded bytes come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetSource {
    /// File relative to the store's assets root.
    Path(String),
    /// In-memory bytes, e.g. an uploaded photo.
    Bytes {
        /// Display name (usually the original file name).
        name: String,
        /// Encoded bytes.
        bytes: Arc<[u8]>,
    },
}

impl AssetSource {
    /// Short label for logs.
    pub fn label(&self) -> &str {
        match self {
            Self::Path(p) => p,
            Self::Bytes { name, .. } => name,
        }
    }
}

/// Normalize and validate asset paths relative to the assets root.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> BadgeResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(BadgeError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(BadgeError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(BadgeError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(BadgeError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

/// The two layers of one scene, decoded together.
///
/// A layer that failed to load is `None`; the failure was already logged.
#[derive(Clone, Debug, Default)]
pub struct SceneAssets {
    /// Template background.
    pub template: Option<Arc<PreparedImage>>,
    /// Avatar photo.
    pub avatar: Option<Arc<PreparedImage>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum CacheKey {
    Path { rel: String, svg_size: SvgSize },
    Content { hash: u64, svg_size: SvgSize },
}

enum Lookup {
    Hit(Arc<PreparedImage>),
    Miss(CacheKey, Vec<u8>),
    Absent,
}

/// Loads layer images from an assets root and keeps decoded results.
///
/// Path-addressed files stay cached for the store's lifetime. At most one in-memory upload is
/// kept: decoding a new one evicts the previous.
#[derive(Debug)]
pub struct AssetStore {
    root: PathBuf,
    cache: HashMap<CacheKey, Arc<PreparedImage>>,
}

impl AssetStore {
    /// Create a store resolving relative paths against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: HashMap::new(),
        }
    }

    /// Assets root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of decoded images currently held.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Read the raw bytes behind a path source.
    pub fn read_bytes(&self, rel: &str) -> BadgeResult<Vec<u8>> {
        let norm = normalize_rel_path(rel)?;
        let p = self.root.join(Path::new(&norm));
        std::fs::read(&p).map_err(|e| {
            BadgeError::decode(format!("failed to read asset '{}': {e}", p.display()))
        })
    }

    /// Load one layer, using the cache when possible.
    pub fn load(
        &mut self,
        source: &AssetSource,
        svg_size: SvgSize,
    ) -> BadgeResult<Arc<PreparedImage>> {
        match self.lookup(source, svg_size)? {
            Lookup::Hit(img) => Ok(img),
            Lookup::Miss(key, bytes) => {
                let img = Arc::new(decode_layer(&bytes, svg_size)?);
                self.insert(key, Arc::clone(&img));
                Ok(img)
            }
            Lookup::Absent => Err(BadgeError::decode("layer has no source")),
        }
    }

    /// Load the template and the optional avatar, then return both.
    ///
    /// Cache misses are decoded in parallel; the call returns once both layers are settled, so a
    /// render never observes one layer without the other's outcome. Failures are logged and
    /// surface as a missing layer.
    #[tracing::instrument(skip_all, fields(template = template.label(), avatar = avatar.map(AssetSource::label)))]
    pub fn load_scene(
        &mut self,
        template: &AssetSource,
        template_svg: SvgSize,
        avatar: Option<&AssetSource>,
        avatar_svg: SvgSize,
    ) -> SceneAssets {
        let t = self.lookup_logged(template, template_svg, "template");
        let a = match avatar {
            Some(src) => self.lookup_logged(src, avatar_svg, "avatar"),
            None => Lookup::Absent,
        };

        let (t, a) = rayon::join(
            || Self::finish(t, template_svg, "template"),
            || Self::finish(a, avatar_svg, "avatar"),
        );

        let template = self.settle(t);
        let avatar = self.settle(a);
        tracing::debug!(
            template = template.is_some(),
            avatar = avatar.is_some(),
            cached = self.cache.len(),
            "scene assets settled"
        );
        SceneAssets { template, avatar }
    }

    fn lookup_logged(&self, source: &AssetSource, svg_size: SvgSize, layer: &str) -> Lookup {
        self.lookup(source, svg_size).unwrap_or_else(|e| {
            tracing::warn!(layer, source = source.label(), error = %e, "layer not loaded");
            Lookup::Absent
        })
    }

    fn lookup(&self, source: &AssetSource, svg_size: SvgSize) -> BadgeResult<Lookup> {
        match source {
            AssetSource::Path(rel) => {
                let key = CacheKey::Path {
                    rel: normalize_rel_path(rel)?,
                    svg_size,
                };
                if let Some(hit) = self.cache.get(&key) {
                    return Ok(Lookup::Hit(Arc::clone(hit)));
                }
                let bytes = self.read_bytes(rel)?;
                Ok(Lookup::Miss(key, bytes))
            }
            AssetSource::Bytes { bytes, .. } => {
                let key = CacheKey::Content {
                    hash: content_hash(bytes),
                    svg_size,
                };
                if let Some(hit) = self.cache.get(&key) {
                    return Ok(Lookup::Hit(Arc::clone(hit)));
                }
                Ok(Lookup::Miss(key, bytes.to_vec()))
            }
        }
    }

    fn finish(
        lookup: Lookup,
        svg_size: SvgSize,
        layer: &str,
    ) -> Option<(Option<CacheKey>, Arc<PreparedImage>)> {
        match lookup {
            Lookup::Hit(img) => Some((None, img)),
            Lookup::Miss(key, bytes) => match decode_layer(&bytes, svg_size) {
                Ok(img) => Some((Some(key), Arc::new(img))),
                Err(e) => {
                    tracing::warn!(layer, error = %e, "layer failed to decode");
                    None
                }
            },
            Lookup::Absent => None,
        }
    }

    fn settle(
        &mut self,
        done: Option<(Option<CacheKey>, Arc<PreparedImage>)>,
    ) -> Option<Arc<PreparedImage>> {
        let (key, img) = done?;
        if let Some(key) = key {
            self.insert(key, Arc::clone(&img));
        }
        Some(img)
    }

    fn insert(&mut self, key: CacheKey, img: Arc<PreparedImage>) {
        if matches!(key, CacheKey::Content { .. }) {
            let before = self.cache.len();
            self.cache.retain(|k, _| matches!(k, CacheKey::Path { .. }));
            let evicted = before - self.cache.len();
            if evicted > 0 {
                tracing::debug!(evicted, "replaced upload evicted from cache");
            }
        }
        self.cache.insert(key, img);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
