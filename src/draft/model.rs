/*!
 * Composite draft document: metadata plus one record per subtitle pair.
 *
 * The document is the single source of truth in the draft workflow.
 * Timing is stored in seconds and is never rewritten once the document
 * exists; edits only touch the texts, the status and the metadata.
 */

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use chrono::Utc;
use log::debug;
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::ReviewError;
use crate::file_utils::FileManager;
use crate::language_utils::{self, UNKNOWN_LANGUAGE};
use crate::review::pair::{ReviewStatus, SubtitlePair};
use crate::review::store::write_artifact;
use crate::subtitle_processor::SubtitleEntry;

/// Text written for empty cues on export so players keep the cue
pub const EMPTY_EXPORT_PLACEHOLDER: &str = "...";

/// Current time in the format stored in draft metadata
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339()
}

fn default_language() -> String {
    UNKNOWN_LANGUAGE.to_string()
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Draft metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftMetadata {
    /// Original language code, "unknown" until configured
    #[serde(default = "default_language")]
    pub original_lang: String,

    /// Target language code, "unknown" until configured
    #[serde(default = "default_language")]
    pub target_lang: String,

    #[serde(default)]
    pub created_at: String,

    #[serde(default)]
    pub updated_at: String,

    /// Absolute path of the media file used for clips
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_file: Option<PathBuf>,

    /// Fields written by other tools, kept as-is
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DraftMetadata {
    /// Fresh metadata with both timestamps set to `now`
    pub fn new(now: &str) -> Self {
        Self {
            original_lang: default_language(),
            target_lang: default_language(),
            created_at: now.to_string(),
            updated_at: now.to_string(),
            audio_file: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// One subtitle record in the draft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftEntry {
    pub index: usize,
    pub start_seconds: f64,
    pub end_seconds: f64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub original: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub translation: String,
    #[serde(default)]
    pub status: ReviewStatus,
}

impl DraftEntry {
    /// Record for a freshly merged pair
    pub fn from_pair(pair: &SubtitlePair) -> Self {
        Self {
            index: pair.index(),
            start_seconds: pair.start_seconds(),
            end_seconds: pair.end_seconds(),
            original: pair.original_text.clone(),
            translation: pair.translated_text.clone(),
            status: pair.status,
        }
    }

    /// Pair view of this record, timing rounded to milliseconds
    pub fn to_pair(&self) -> SubtitlePair {
        SubtitlePair::new(
            self.index,
            seconds_to_ms(self.start_seconds),
            seconds_to_ms(self.end_seconds),
            self.original.clone(),
            self.translation.clone(),
            self.status,
        )
    }

    fn export_entry(&self, text: &str) -> SubtitleEntry {
        let text = if text.trim().is_empty() { EMPTY_EXPORT_PLACEHOLDER } else { text };
        SubtitleEntry::new(
            self.index,
            seconds_to_ms(self.start_seconds),
            seconds_to_ms(self.end_seconds),
            text.to_string(),
        )
    }
}

fn seconds_to_ms(seconds: f64) -> u64 {
    (seconds.max(0.0) * 1000.0).round() as u64
}

/// Partial metadata change requested by the `config` command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftConfigUpdate {
    pub original_lang: Option<String>,
    pub target_lang: Option<String>,
    pub audio_file: Option<PathBuf>,
}

impl DraftConfigUpdate {
    pub fn is_empty(&self) -> bool {
        self.original_lang.is_none() && self.target_lang.is_none() && self.audio_file.is_none()
    }
}

/// Complete draft document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftDocument {
    #[serde(default = "default_metadata")]
    pub metadata: DraftMetadata,
    pub subtitles: Vec<DraftEntry>,
}

fn default_metadata() -> DraftMetadata {
    DraftMetadata::new("")
}

impl DraftDocument {
    /// New document for merged pairs
    pub fn from_pairs(pairs: &[SubtitlePair], now: &str) -> Self {
        Self {
            metadata: DraftMetadata::new(now),
            subtitles: pairs.iter().map(DraftEntry::from_pair).collect(),
        }
    }

    /// Parse and validate the JSON form
    pub fn parse(content: &str, path: &Path) -> Result<Self, ReviewError> {
        let document: DraftDocument = serde_json::from_str(content).map_err(|e| ReviewError::DraftCorrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        document.validate(path)?;
        Ok(document)
    }

    /// Read a draft that must exist
    pub fn load(path: &Path) -> Result<Self, ReviewError> {
        let content = FileManager::read_to_string(path).map_err(|e| ReviewError::SourceUnreadable {
            path: path.to_path_buf(),
            reason: format!("{:#}", e),
        })?;
        Self::parse(&content, path)
    }

    /// Write the full document
    pub fn write(&self, path: &Path) -> Result<(), ReviewError> {
        write_artifact(path, &self.to_json()?)?;
        debug!("Wrote draft {} ({} entries)", path.display(), self.subtitles.len());
        Ok(())
    }

    /// Pretty JSON, non-ASCII text kept verbatim
    pub fn to_json(&self) -> Result<String, ReviewError> {
        serde_json::to_string_pretty(self).map_err(|e| ReviewError::DraftCorrupt {
            path: PathBuf::new(),
            reason: e.to_string(),
        })
    }

    /// Structural checks the serde layer cannot express
    pub fn validate(&self, path: &Path) -> Result<(), ReviewError> {
        let corrupt = |reason: String| ReviewError::DraftCorrupt {
            path: path.to_path_buf(),
            reason,
        };

        let mut seen = HashSet::with_capacity(self.subtitles.len());
        for entry in &self.subtitles {
            if entry.index == 0 {
                return Err(corrupt("subtitle index 0 is not valid".to_string()));
            }
            if !seen.insert(entry.index) {
                return Err(corrupt(format!("duplicate subtitle index {}", entry.index)));
            }
            if !(entry.start_seconds >= 0.0 && entry.end_seconds > entry.start_seconds) {
                return Err(corrupt(format!(
                    "entry {} has invalid timing {} -> {}",
                    entry.index, entry.start_seconds, entry.end_seconds
                )));
            }
        }
        Ok(())
    }

    /// Pairs in document order
    pub fn to_pairs(&self) -> Vec<SubtitlePair> {
        self.subtitles.iter().map(DraftEntry::to_pair).collect()
    }

    /// Copy texts and statuses from `pairs` into the records, keeping the
    /// stored timing. Returns whether any record changed.
    pub fn apply_pairs(&mut self, pairs: &[SubtitlePair]) -> bool {
        let aligned = self.subtitles.len() == pairs.len()
            && self.subtitles.iter().zip(pairs).all(|(entry, pair)| entry.index == pair.index());

        if !aligned {
            self.subtitles = pairs.iter().map(DraftEntry::from_pair).collect();
            return true;
        }

        let mut changed = false;
        for (entry, pair) in self.subtitles.iter_mut().zip(pairs) {
            if entry.original != pair.original_text
                || entry.translation != pair.translated_text
                || entry.status != pair.status
            {
                entry.original = pair.original_text.clone();
                entry.translation = pair.translated_text.clone();
                entry.status = pair.status;
                changed = true;
            }
        }
        changed
    }

    pub fn find_entry(&self, index: usize) -> Result<&DraftEntry, ReviewError> {
        self.subtitles
            .iter()
            .find(|entry| entry.index == index)
            .ok_or(ReviewError::EntryNotFound(index))
    }

    pub fn find_entry_mut(&mut self, index: usize) -> Result<&mut DraftEntry, ReviewError> {
        self.subtitles
            .iter_mut()
            .find(|entry| entry.index == index)
            .ok_or(ReviewError::EntryNotFound(index))
    }

    /// Set a translation; status follows the text
    pub fn translate(&mut self, index: usize, text: &str) -> Result<ReviewStatus, ReviewError> {
        let entry = self.find_entry_mut(index)?;
        entry.translation = text.to_string();
        entry.status = ReviewStatus::derive_from_text(text);
        Ok(entry.status)
    }

    /// Correct the original text. The translation was reviewed against the
    /// old text, so the entry goes back to unverified.
    pub fn fix(&mut self, index: usize, text: &str) -> Result<(), ReviewError> {
        let entry = self.find_entry_mut(index)?;
        entry.original = text.to_string();
        entry.status = ReviewStatus::Unverified;
        Ok(())
    }

    /// Invert one entry's status
    pub fn toggle_status(&mut self, index: usize) -> Result<ReviewStatus, ReviewError> {
        let entry = self.find_entry_mut(index)?;
        entry.status = entry.status.toggled();
        Ok(entry.status)
    }

    /// Apply a metadata update; the audio path must already be absolute
    pub fn configure(&mut self, update: &DraftConfigUpdate) {
        if let Some(lang) = &update.original_lang {
            self.metadata.original_lang = lang.trim().to_string();
        }
        if let Some(lang) = &update.target_lang {
            self.metadata.target_lang = lang.trim().to_string();
        }
        if let Some(audio) = &update.audio_file {
            self.metadata.audio_file = Some(audio.clone());
        }
    }

    /// Record the time of the latest change
    pub fn stamp(&mut self, now: &str) {
        self.metadata.updated_at = now.to_string();
    }

    /// Original-language entries for export
    pub fn original_entries(&self) -> Vec<SubtitleEntry> {
        self.subtitles.iter().map(|entry| entry.export_entry(&entry.original)).collect()
    }

    /// Target-language entries for export
    pub fn translated_entries(&self) -> Vec<SubtitleEntry> {
        self.subtitles.iter().map(|entry| entry.export_entry(&entry.translation)).collect()
    }

    /// File name segments for the two exports
    pub fn export_language_segments(&self) -> (String, String) {
        (
            language_utils::export_segment(&self.metadata.original_lang, "original").to_string(),
            language_utils::export_segment(&self.metadata.target_lang, "target").to_string(),
        )
    }
}
