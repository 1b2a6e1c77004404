/*!
 * Draft backend for review sessions.
 */

use std::path::{Path, PathBuf};
use log::info;

use crate::errors::ReviewError;
use crate::file_utils::FileManager;
use crate::review::alignment::{merge_pairs, StatusRecord};
use crate::review::pair::SubtitlePair;
use crate::review::store::ReviewStore;
use crate::subtitle_processor::SubtitleCollection;

use super::model::{now_timestamp, DraftDocument};

/// Review state kept in a single `<original-name>.draft.json`
#[derive(Debug, Clone)]
pub struct DraftStore {
    draft_path: PathBuf,
    source_path: Option<PathBuf>,
    document: Option<DraftDocument>,
}

impl DraftStore {
    /// Store over an existing draft
    pub fn open<P: AsRef<Path>>(draft_path: P) -> Self {
        Self {
            draft_path: draft_path.as_ref().to_path_buf(),
            source_path: None,
            document: None,
        }
    }

    /// Store for a source SRT; the draft is created next to it on first load
    pub fn for_source<P: AsRef<Path>>(source_path: P) -> Self {
        let source_path = source_path.as_ref().to_path_buf();
        Self {
            draft_path: FileManager::draft_path_for(&source_path),
            source_path: Some(source_path),
            document: None,
        }
    }

    pub fn draft_path(&self) -> &Path {
        &self.draft_path
    }

    /// Document as of the last load or save
    pub fn document(&self) -> Option<&DraftDocument> {
        self.document.as_ref()
    }

    /// Read the draft, creating it from the source SRT when it is absent
    pub fn load_document(&mut self) -> Result<&DraftDocument, ReviewError> {
        let document = if FileManager::file_exists(&self.draft_path) {
            DraftDocument::load(&self.draft_path)?
        } else {
            let source = self.source_path.as_ref().ok_or_else(|| ReviewError::SourceUnreadable {
                path: self.draft_path.clone(),
                reason: "draft does not exist".to_string(),
            })?;

            info!("Creating new draft file at {}", self.draft_path.display());
            let originals = SubtitleCollection::load_required(source)?;
            let pairs = merge_pairs(originals.entries, Vec::new(), &StatusRecord::new())?;
            let document = DraftDocument::from_pairs(&pairs, &now_timestamp());
            document.write(&self.draft_path)?;
            document
        };

        Ok(self.document.insert(document))
    }
}

impl ReviewStore for DraftStore {
    fn load(&mut self) -> Result<Vec<SubtitlePair>, ReviewError> {
        let pairs = self.load_document()?.to_pairs();
        if pairs.is_empty() {
            return Err(ReviewError::EmptySource);
        }
        Ok(pairs)
    }

    fn save(&mut self, pairs: &[SubtitlePair]) -> Result<(), ReviewError> {
        let mut document = match self.document.take() {
            Some(document) => document,
            None => DraftDocument::from_pairs(pairs, &now_timestamp()),
        };

        // Only a real change moves updated_at, so repeated saves are identical
        if document.apply_pairs(pairs) {
            document.stamp(&now_timestamp());
        }

        let result = document.write(&self.draft_path);
        self.document = Some(document);
        result?;

        info!("Saved {} pairs to {}", pairs.len(), self.draft_path.display());
        Ok(())
    }

    fn document_path(&self) -> &Path {
        &self.draft_path
    }

    fn media_path(&self) -> Option<PathBuf> {
        self.document.as_ref().and_then(|document| document.metadata.audio_file.clone())
    }
}
