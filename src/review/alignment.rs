/*!
 * Merging of original entries, translation entries and status records.
 *
 * The original sequence is authoritative: it decides which indices exist,
 * their order and their timing. Translations and statuses are looked up
 * by index and never add, remove or reorder pairs.
 */

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use log::{debug, warn};

use crate::errors::ReviewError;
use crate::file_utils::FileManager;
use crate::subtitle_processor::SubtitleEntry;

use super::pair::{ReviewStatus, SubtitlePair};

/// Mapping from entry index to approval, as stored in `<stem>_status.json`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusRecord {
    entries: BTreeMap<usize, bool>,
}

impl StatusRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Record computed from the current pairs only, so indices that are no
    /// longer in the original sequence are pruned
    pub fn from_pairs(pairs: &[SubtitlePair]) -> Self {
        Self {
            entries: pairs
                .iter()
                .map(|pair| (pair.index(), pair.status.is_verified()))
                .collect(),
        }
    }

    /// Set the status of one index
    pub fn insert(&mut self, index: usize, status: ReviewStatus) {
        self.entries.insert(index, status.is_verified());
    }

    /// Status recorded for an index, if any
    pub fn get(&self, index: usize) -> Option<ReviewStatus> {
        self.entries.get(&index).copied().map(ReviewStatus::from_approved)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse the JSON form. Anything other than an object of positive
    /// integer keys to booleans is corrupt.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ReviewError> {
        let corrupt = |reason: String| ReviewError::StatusRecordCorrupt {
            path: path.to_path_buf(),
            reason,
        };

        if content.trim().is_empty() {
            warn!("Status record {} is empty, treating it as no prior review", path.display());
            return Ok(Self::new());
        }

        let entries: BTreeMap<usize, bool> =
            serde_json::from_str(content).map_err(|e| corrupt(e.to_string()))?;

        if entries.contains_key(&0) {
            return Err(corrupt("index 0 is not a valid subtitle index".to_string()));
        }

        Ok(Self { entries })
    }

    /// Load the record at `path`. A missing or unreadable file is an empty
    /// record; a file that exists but does not parse is an error.
    pub fn load(path: &Path) -> Result<Self, ReviewError> {
        if !FileManager::file_exists(path) {
            debug!("No status record at {}", path.display());
            return Ok(Self::new());
        }

        match FileManager::read_to_string(path) {
            Ok(content) => Self::parse(&content, path),
            Err(e) => {
                warn!("Ignoring unreadable status record {}: {:#}", path.display(), e);
                Ok(Self::new())
            }
        }
    }

    /// Pretty JSON with keys in ascending index order
    pub fn to_json(&self) -> String {
        // A map with integer keys and boolean values always serializes
        serde_json::to_string_pretty(&self.entries).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Build the ordered pair sequence.
///
/// One pair is emitted per original entry, in original order. Translations
/// are matched by index (the last one wins on duplicates) and lose their own
/// timing; unmatched translations are dropped. Statuses default to
/// unverified.
pub fn merge_pairs(
    originals: Vec<SubtitleEntry>,
    translations: Vec<SubtitleEntry>,
    status: &StatusRecord,
) -> Result<Vec<SubtitlePair>, ReviewError> {
    if originals.is_empty() {
        return Err(ReviewError::EmptySource);
    }

    let translation_count = translations.len();
    let mut translated: HashMap<usize, SubtitleEntry> = HashMap::with_capacity(translation_count);
    for entry in translations {
        translated.insert(entry.index, entry);
    }

    let mut matched = 0;
    let pairs: Vec<SubtitlePair> = originals
        .into_iter()
        .map(|original| {
            let translated_text = match translated.remove(&original.index) {
                Some(entry) => {
                    matched += 1;
                    entry.text
                }
                None => String::new(),
            };
            let pair_status = status.get(original.index).unwrap_or_default();
            SubtitlePair::from_original(original, translated_text, pair_status)
        })
        .collect();

    if !translated.is_empty() {
        let mut orphans: Vec<usize> = translated.keys().copied().collect();
        orphans.sort_unstable();
        debug!("Dropping {} translation entries with no original: {:?}", orphans.len(), orphans);
    }

    debug!(
        "Merged {} pairs ({} of {} translation entries matched, {} status records)",
        pairs.len(),
        matched,
        translation_count,
        status.len()
    );

    Ok(pairs)
}
