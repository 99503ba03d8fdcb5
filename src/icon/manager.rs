//! Icon discovery and caching.
//!
//! # Responsibilities
//! - Scan the icons directory for supported image files
//! - Decode, validate and encode each file
//! - Build a fresh `IconCache` keyed by logical name
//!
//! # Design Decisions
//! - A bad icon is skipped with a warning, never fatal to the batch
//! - Files are processed in byte-wise file name order; on duplicate logical
//!   names the last file processed wins (`lobby.png` beats `lobby.gif`)
//! - Every call builds the cache from scratch so removed icons disappear

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rand::seq::IteratorRandom;
use rand::Rng;

use crate::icon::codec::{self, EncodedIcon, IconDecoder, ImageDecoder};
use crate::icon::error::{IconError, IconResult};
use crate::observability::metrics;

/// File extensions scanned for icons (compared case-insensitively).
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp"];

/// Immutable mapping from logical name to encoded icon.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IconCache {
    icons: BTreeMap<String, EncodedIcon>,
}

impl IconCache {
    /// Look up an icon by logical name.
    pub fn get(&self, name: &str) -> Option<&EncodedIcon> {
        self.icons.get(name)
    }

    /// Pick any cached icon at random.
    ///
    /// Iterates in name order, so equal caches give equal picks for the same
    /// RNG state.
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&EncodedIcon> {
        self.icons.values().choose(rng)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.icons.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    /// Logical names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.icons.keys().map(String::as_str).collect()
    }
}

impl FromIterator<(String, EncodedIcon)> for IconCache {
    fn from_iter<I: IntoIterator<Item = (String, EncodedIcon)>>(iter: I) -> Self {
        Self {
            icons: iter.into_iter().collect(),
        }
    }
}

/// Loads icons from a directory through an injected decoder.
#[derive(Clone)]
pub struct IconManager {
    icons_dir: PathBuf,
    decoder: Arc<dyn IconDecoder>,
}

impl std::fmt::Debug for IconManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IconManager")
            .field("icons_dir", &self.icons_dir)
            .finish_non_exhaustive()
    }
}

impl IconManager {
    /// Create a manager using the `image`-crate decoder.
    pub fn new(icons_dir: impl Into<PathBuf>) -> Self {
        Self::with_decoder(icons_dir, ImageDecoder)
    }

    /// Create a manager with a custom decoder.
    pub fn with_decoder(
        icons_dir: impl Into<PathBuf>,
        decoder: impl IconDecoder + 'static,
    ) -> Self {
        Self {
            icons_dir: icons_dir.into(),
            decoder: Arc::new(decoder),
        }
    }

    pub fn icons_dir(&self) -> &Path {
        &self.icons_dir
    }

    /// Scan the icons directory and build a new cache.
    ///
    /// Individual files that fail to decode or validate are skipped. Only an
    /// unreadable directory fails the whole load; a missing one yields an
    /// empty cache.
    pub fn load_icons(&self) -> IconResult<IconCache> {
        let files = match self.scan() {
            Ok(files) => files,
            Err(IconError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                tracing::debug!(
                    dir = %self.icons_dir.display(),
                    "Icon directory missing, no icons loaded"
                );
                metrics::record_icons_loaded(0);
                return Ok(IconCache::default());
            }
            Err(e) => return Err(e),
        };

        let mut icons = BTreeMap::new();
        for (name, path) in files {
            let icon = match self.load_icon(&path) {
                Ok(icon) => icon,
                Err(e) => {
                    tracing::warn!(
                        icon = %name,
                        path = %path.display(),
                        error = %e,
                        "Skipping icon"
                    );
                    metrics::record_icon_skipped(e.kind());
                    continue;
                }
            };

            if icons.insert(name.clone(), icon).is_some() {
                tracing::warn!(
                    icon = %name,
                    path = %path.display(),
                    "Duplicate icon name, later file overrides earlier one"
                );
            }
        }

        tracing::info!(
            dir = %self.icons_dir.display(),
            count = icons.len(),
            "Icons loaded"
        );
        metrics::record_icons_loaded(icons.len());

        Ok(IconCache { icons })
    }

    /// Collect `(logical name, path)` pairs sorted by file name.
    fn scan(&self) -> IconResult<Vec<(String, PathBuf)>> {
        let io_err = |source| IconError::Io {
            path: self.icons_dir.clone(),
            source,
        };

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.icons_dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if !path.is_file() || !is_supported(&path) {
                continue;
            }
            let Some(name) = path.file_stem().and_then(OsStr::to_str) else {
                tracing::warn!(path = %path.display(), "Skipping icon with non UTF-8 name");
                continue;
            };
            files.push((name.to_string(), path));
        }

        files.sort_by(|(_, a), (_, b)| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    fn load_icon(&self, path: &Path) -> IconResult<EncodedIcon> {
        let bytes = fs::read(path).map_err(|source| IconError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let bitmap = self.decoder.decode(&bytes).map_err(|e| IconError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        codec::encode(&bitmap)
    }
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map(|ext| SUPPORTED_EXTENSIONS.iter().any(|s| s.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icon::codec::{Bitmap, DecodeFailure};
    use image::{Rgba, RgbaImage};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Decoder that treats the first byte as a fill colour and the second as
    /// the square size. Anything shorter is undecodable.
    fn synthetic(bytes: &[u8]) -> Result<Bitmap, DecodeFailure> {
        match bytes {
            [shade, size, ..] => Ok(RgbaImage::from_pixel(
                *size as u32,
                *size as u32,
                Rgba([*shade, *shade, *shade, 255]),
            )),
            _ => Err("truncated".into()),
        }
    }

    #[test]
    fn test_is_supported() {
        assert!(is_supported(Path::new("a.png")));
        assert!(is_supported(Path::new("a.PNG")));
        assert!(is_supported(Path::new("a.jpeg")));
        assert!(!is_supported(Path::new("a.txt")));
        assert!(!is_supported(Path::new("png")));
    }

    #[test]
    fn test_skips_bad_icons() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("good.png"), [10, 64]).unwrap();
        fs::write(dir.path().join("small.png"), [10, 32]).unwrap();
        fs::write(dir.path().join("corrupt.png"), [1]).unwrap();
        fs::write(dir.path().join("notes.txt"), [10, 64]).unwrap();

        let manager = IconManager::with_decoder(dir.path(), synthetic);
        let cache = manager.load_icons().unwrap();

        assert_eq!(cache.names(), vec!["good"]);
    }

    #[test]
    fn test_duplicate_name_last_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("lobby.gif"), [1, 64]).unwrap();
        fs::write(dir.path().join("lobby.png"), [2, 64]).unwrap();

        let manager = IconManager::with_decoder(dir.path(), synthetic);
        let cache = manager.load_icons().unwrap();

        let expected = codec::encode(&synthetic(&[2, 64]).unwrap()).unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("lobby"), Some(&expected));
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let manager = IconManager::with_decoder(dir.path().join("nope"), synthetic);
        assert!(manager.load_icons().unwrap().is_empty());
    }

    #[test]
    fn test_random_pick() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.png"), [1, 64]).unwrap();
        fs::write(dir.path().join("b.png"), [2, 64]).unwrap();

        let cache = IconManager::with_decoder(dir.path(), synthetic).load_icons().unwrap();
        let picked = cache.random(&mut rand::thread_rng()).unwrap();
        assert!(cache.get("a") == Some(picked) || cache.get("b") == Some(picked));

        assert!(IconCache::default().random(&mut rand::thread_rng()).is_none());
    }

    #[test]
    fn test_random_pick_is_stable_across_equal_caches() {
        let dir = tempfile::tempdir().unwrap();
        for shade in 0..8u8 {
            fs::write(dir.path().join(format!("icon{shade}.png")), [shade, 64]).unwrap();
        }
        let manager = IconManager::with_decoder(dir.path(), synthetic);

        let first = manager.load_icons().unwrap();
        let expected = first.random(&mut StdRng::seed_from_u64(42)).cloned();
        assert!(expected.is_some());

        for _ in 0..20 {
            let cache = manager.load_icons().unwrap();
            assert_eq!(cache, first);
            assert_eq!(cache.random(&mut StdRng::seed_from_u64(42)).cloned(), expected);
        }
    }
}
