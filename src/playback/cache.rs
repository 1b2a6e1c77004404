/*!
 * Clip cache keyed by (document, subtitle index).
 */

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use log::debug;
use sha2::{Digest, Sha256};

use crate::errors::PlaybackError;

/// Identity of a clip: the document it belongs to and the entry index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClipKey {
    document: PathBuf,
    index: usize,
}

impl ClipKey {
    /// Key for an entry of `document`; the path is canonicalized when
    /// possible so relative and absolute spellings share clips
    pub fn new(document: &Path, index: usize) -> Self {
        Self {
            document: document.canonicalize().unwrap_or_else(|_| document.to_path_buf()),
            index,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Stable file name: readable stem, digest of the document path, index
    fn file_name(&self, format: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.document.to_string_lossy().as_bytes());
        let digest = format!("{:x}", hasher.finalize());

        let stem = self
            .document
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let stem = stem.split('.').next().unwrap_or_default();

        format!("{}_{}_clip_{}.{}", stem, &digest[..16], self.index, format)
    }
}

/// Cache of extracted clips living in one directory
#[derive(Debug, Clone)]
pub struct ClipCache {
    dir: PathBuf,
    format: String,
    entries: HashMap<ClipKey, PathBuf>,
}

impl ClipCache {
    pub fn new<P: AsRef<Path>>(dir: P, format: &str) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            format: format.to_string(),
            entries: HashMap::new(),
        }
    }

    /// `<cache dir>/acolyte/clips`, or the same under the temp dir
    pub fn default_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("acolyte")
            .join("clips")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where the clip for `key` lives once extracted
    pub fn clip_path(&self, key: &ClipKey) -> PathBuf {
        self.dir.join(key.file_name(&self.format))
    }

    /// Previously produced clip for `key`, from this process or an earlier one
    pub fn lookup(&mut self, key: &ClipKey) -> Option<PathBuf> {
        if let Some(path) = self.entries.get(key) {
            if path.is_file() {
                return Some(path.clone());
            }
            debug!("Cached clip {} disappeared", path.display());
        }

        let path = self.clip_path(key);
        let on_disk = fs::metadata(&path).map(|meta| meta.is_file() && meta.len() > 0).unwrap_or(false);
        if on_disk {
            self.entries.insert(key.clone(), path.clone());
            Some(path)
        } else {
            self.entries.remove(key);
            None
        }
    }

    /// Remember a freshly produced clip
    pub fn record(&mut self, key: ClipKey, path: PathBuf) {
        self.entries.insert(key, path);
    }

    pub fn ensure_dir(&self) -> Result<(), PlaybackError> {
        fs::create_dir_all(&self.dir).map_err(|source| PlaybackError::CacheDirectory {
            path: self.dir.clone(),
            source,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
