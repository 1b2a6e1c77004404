/*!
 * Persistence seam shared by the split-file and draft backends.
 */

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::ReviewError;

use super::pair::SubtitlePair;

/// Durable review state behind a session.
///
/// A backend builds the merged pair sequence on `load` and flushes it on
/// `save`. Saving the same pairs twice must produce identical bytes.
pub trait ReviewStore {
    /// Build the merged pair sequence from durable state
    fn load(&mut self) -> Result<Vec<SubtitlePair>, ReviewError>;

    /// Flush the pair sequence to durable state
    fn save(&mut self, pairs: &[SubtitlePair]) -> Result<(), ReviewError>;

    /// Path that identifies the document, used for clip cache keys
    fn document_path(&self) -> &Path;

    /// Media file the pairs are synchronised to, if known
    fn media_path(&self) -> Option<PathBuf> {
        None
    }

    /// Short human readable description for logs
    fn describe(&self) -> String {
        self.document_path().display().to_string()
    }
}

/// Write one artifact, creating its directory. Failures name the artifact
/// and leave previously written artifacts in place.
pub(crate) fn write_artifact(path: &Path, content: &str) -> Result<(), ReviewError> {
    let failure = |source: std::io::Error| ReviewError::WriteFailure {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(failure)?;
        }
    }

    fs::write(path, content).map_err(failure)
}
