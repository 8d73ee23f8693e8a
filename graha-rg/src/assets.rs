//! Static report asset cache
//!
//! **[RG-AST-010]** Images (logo, cover art, deity banner) are loaded from
//! disk once per process and reused across every page and every report. The
//! cache is read-heavy and append-only; failed loads are cached too so a
//! missing file is probed once, degrades to "asset omitted", and never aborts
//! a report.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// One decoded-enough image: raw JPEG bytes plus probed dimensions
#[derive(Debug, Clone)]
pub struct ImageAsset {
    /// Content-derived cache key (hex sha-256 prefix)
    pub key: String,
    /// Raw file bytes (embedded as-is by the PDF backend)
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// True for single-channel images (drawn in DeviceGray)
    pub grayscale: bool,
}

impl ImageAsset {
    /// Aspect-preserving display height for a given width
    pub fn height_for_width(&self, width: f64) -> f64 {
        if self.width == 0 {
            return 0.0;
        }
        width * self.height as f64 / self.width as f64
    }
}

/// Process-local image cache keyed by file name
pub struct AssetCache {
    dir: PathBuf,
    cache: RwLock<HashMap<String, Option<Arc<ImageAsset>>>>,
}

impl AssetCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Load an asset by file name, memoizing both hits and misses
    ///
    /// Only JPEG files are accepted (the PDF backend embeds them without
    /// re-encoding). Anything else degrades to `None` with a warning.
    pub fn load(&self, file_name: &str) -> Option<Arc<ImageAsset>> {
        if let Some(cached) = self.cache.read().ok()?.get(file_name) {
            return cached.clone();
        }

        let loaded = self.load_uncached(file_name);
        if loaded.is_none() {
            tracing::warn!(asset = %file_name, "Asset unavailable; omitting from report");
        }
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(file_name.to_string(), loaded.clone());
        }
        loaded
    }

    fn load_uncached(&self, file_name: &str) -> Option<Arc<ImageAsset>> {
        let path = self.dir.join(file_name);
        let bytes = std::fs::read(&path)
            .map_err(|e| {
                tracing::debug!(path = %path.display(), error = %e, "Asset read failed");
                e
            })
            .ok()?;

        let format = image::guess_format(&bytes).ok()?;
        if format != image::ImageFormat::Jpeg {
            tracing::debug!(path = %path.display(), ?format, "Asset is not JPEG");
            return None;
        }

        let reader = image::io::Reader::with_format(std::io::Cursor::new(&bytes), format);
        let (width, height) = reader.into_dimensions().ok()?;

        let grayscale = image::load_from_memory(&bytes)
            .map(|img| img.color().channel_count() == 1)
            .unwrap_or(false);

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hasher.finalize();
        let hex: String = digest.iter().take(8).map(|b| format!("{:02x}", b)).collect();
        let key = format!("im{}", hex);

        Some(Arc::new(ImageAsset {
            key,
            bytes,
            width,
            height,
            grayscale,
        }))
    }
}
