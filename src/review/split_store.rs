/*!
 * Split-file backend: original SRT, translation SRT and a status JSON.
 */

use std::path::{Path, PathBuf};
use log::{debug, info};

use crate::errors::ReviewError;
use crate::file_utils::FileManager;
use crate::subtitle_processor::{SubtitleCollection, SubtitleEntry};

use super::alignment::{merge_pairs, StatusRecord};
use super::pair::SubtitlePair;
use super::store::{write_artifact, ReviewStore};

/// Default translation file suffix (`<stem>_translation.srt`)
pub const DEFAULT_TRANSLATION_SUFFIX: &str = "translation";

/// Review state kept as three sibling files
#[derive(Debug, Clone)]
pub struct SplitFileStore {
    original_path: PathBuf,
    translation_path: PathBuf,
    status_path: PathBuf,
    media_path: Option<PathBuf>,
}

impl SplitFileStore {
    /// Store with the default derived paths
    pub fn new<P: AsRef<Path>>(original_path: P) -> Self {
        Self::with_translation_suffix(original_path, DEFAULT_TRANSLATION_SUFFIX)
    }

    /// Store whose translation file is `<stem>_<suffix>.srt`
    pub fn with_translation_suffix<P: AsRef<Path>>(original_path: P, suffix: &str) -> Self {
        let original_path = original_path.as_ref().to_path_buf();
        Self {
            translation_path: FileManager::translation_path_for(&original_path, suffix),
            status_path: FileManager::status_path_for(&original_path),
            original_path,
            media_path: None,
        }
    }

    /// Override the translation file path
    pub fn translation_path_override(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.translation_path = path;
        }
        self
    }

    /// Override the status file path
    pub fn status_path_override(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.status_path = path;
        }
        self
    }

    /// Attach the media file used for playback
    pub fn with_media_path(mut self, path: Option<PathBuf>) -> Self {
        self.media_path = path;
        self
    }

    pub fn original_path(&self) -> &Path {
        &self.original_path
    }

    pub fn translation_path(&self) -> &Path {
        &self.translation_path
    }

    pub fn status_path(&self) -> &Path {
        &self.status_path
    }
}

impl ReviewStore for SplitFileStore {
    fn load(&mut self) -> Result<Vec<SubtitlePair>, ReviewError> {
        let originals = SubtitleCollection::load_required(&self.original_path)?;
        let translations = SubtitleCollection::load_optional(&self.translation_path);
        let status = StatusRecord::load(&self.status_path)?;

        merge_pairs(originals.entries, translations.entries, &status)
    }

    fn save(&mut self, pairs: &[SubtitlePair]) -> Result<(), ReviewError> {
        // Status first: it is the artifact that holds review work
        write_artifact(&self.status_path, &StatusRecord::from_pairs(pairs).to_json())?;
        debug!("Wrote status record {}", self.status_path.display());

        let originals: Vec<SubtitleEntry> = pairs.iter().map(SubtitlePair::original_entry).collect();
        write_artifact(&self.original_path, &SubtitleCollection::compose(&originals))?;
        debug!("Wrote original subtitles {}", self.original_path.display());

        let translations: Vec<SubtitleEntry> = pairs.iter().map(SubtitlePair::translated_entry).collect();
        write_artifact(&self.translation_path, &SubtitleCollection::compose(&translations))?;

        info!(
            "Saved {} pairs to {}, {} and {}",
            pairs.len(),
            self.original_path.display(),
            self.translation_path.display(),
            self.status_path.display()
        );
        Ok(())
    }

    fn document_path(&self) -> &Path {
        &self.original_path
    }

    fn media_path(&self) -> Option<PathBuf> {
        self.media_path.clone()
    }
}
