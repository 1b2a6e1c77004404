/*!
 * Merged review units and their verification status.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::subtitle_processor::SubtitleEntry;

/// Review status of a pair's translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    /// Translation missing or not yet confirmed
    #[default]
    Unverified,
    /// Translator has entered or confirmed the translation
    Verified,
}

impl ReviewStatus {
    /// Map the boolean used by split-file status records
    pub fn from_approved(approved: bool) -> Self {
        if approved {
            ReviewStatus::Verified
        } else {
            ReviewStatus::Unverified
        }
    }

    /// Whether the translation is verified
    pub fn is_verified(self) -> bool {
        self == ReviewStatus::Verified
    }

    /// The opposite status
    pub fn toggled(self) -> Self {
        match self {
            ReviewStatus::Verified => ReviewStatus::Unverified,
            ReviewStatus::Unverified => ReviewStatus::Verified,
        }
    }

    /// Default derivation after a translation edit: any non-whitespace text
    /// counts as verified.
    pub fn derive_from_text(text: &str) -> Self {
        Self::from_approved(!text.trim().is_empty())
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewStatus::Unverified => write!(f, "unverified"),
            ReviewStatus::Verified => write!(f, "verified"),
        }
    }
}

impl std::str::FromStr for ReviewStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unverified" => Ok(ReviewStatus::Unverified),
            "verified" => Ok(ReviewStatus::Verified),
            _ => Err(anyhow::anyhow!("Invalid review status: {}", s)),
        }
    }
}

/// One original entry merged with its translation and review status.
///
/// Index and timing come from the original entry and never change after
/// load; only the two texts and the status are mutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitlePair {
    index: usize,
    start_time_ms: u64,
    end_time_ms: u64,
    /// Original-language text
    pub original_text: String,
    /// Target-language text, empty when untranslated
    pub translated_text: String,
    /// Review status
    pub status: ReviewStatus,
}

impl SubtitlePair {
    /// Create a pair with explicit timing
    pub fn new(
        index: usize,
        start_time_ms: u64,
        end_time_ms: u64,
        original_text: String,
        translated_text: String,
        status: ReviewStatus,
    ) -> Self {
        Self {
            index,
            start_time_ms,
            end_time_ms,
            original_text,
            translated_text,
            status,
        }
    }

    /// Create a pair from an original entry, discarding any timing the
    /// translation may have carried
    pub fn from_original(original: SubtitleEntry, translated_text: String, status: ReviewStatus) -> Self {
        Self::new(
            original.index,
            original.start_time_ms,
            original.end_time_ms,
            original.text,
            translated_text,
            status,
        )
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn start_time_ms(&self) -> u64 {
        self.start_time_ms
    }

    pub fn end_time_ms(&self) -> u64 {
        self.end_time_ms
    }

    pub fn start_seconds(&self) -> f64 {
        self.start_time_ms as f64 / 1000.0
    }

    pub fn end_seconds(&self) -> f64 {
        self.end_time_ms as f64 / 1000.0
    }

    /// Length of the cue in seconds
    pub fn duration_seconds(&self) -> f64 {
        self.end_time_ms.saturating_sub(self.start_time_ms) as f64 / 1000.0
    }

    /// Original side as a subtitle entry
    pub fn original_entry(&self) -> SubtitleEntry {
        SubtitleEntry::new(self.index, self.start_time_ms, self.end_time_ms, self.original_text.clone())
    }

    /// Translation side as a subtitle entry, on the original's timing
    pub fn translated_entry(&self) -> SubtitleEntry {
        SubtitleEntry::new(self.index, self.start_time_ms, self.end_time_ms, self.translated_text.clone())
    }
}

/// Three-item view around the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewWindow<'a> {
    pub previous: Option<&'a SubtitlePair>,
    pub current: &'a SubtitlePair,
    pub next: Option<&'a SubtitlePair>,
}
