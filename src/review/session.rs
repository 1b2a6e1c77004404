/*!
 * Cursor-based review session over a merged pair sequence.
 *
 * A session owns exactly one store and one pair sequence. Every operation
 * runs to completion synchronously; nothing here spawns or waits.
 */

use std::path::PathBuf;
use log::{debug, info};

use crate::errors::ReviewError;

use super::pair::{ReviewStatus, SubtitlePair, ViewWindow};
use super::store::ReviewStore;

/// Verified/total counts for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewProgress {
    pub verified: usize,
    pub total: usize,
}

impl ReviewProgress {
    /// Completion percentage (0-100)
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.verified as f64 / self.total as f64) * 100.0
    }
}

/// Editing session: pairs, cursor and the backend they came from
pub struct ReviewSession<S: ReviewStore> {
    store: S,
    pairs: Vec<SubtitlePair>,
    position: usize,
    dirty: bool,
}

impl<S: ReviewStore> ReviewSession<S> {
    /// Load the pairs from `store`. Fails if the store yields no pairs.
    pub fn open(mut store: S) -> Result<Self, ReviewError> {
        let pairs = store.load()?;
        if pairs.is_empty() {
            return Err(ReviewError::EmptySource);
        }

        info!("Opened {} with {} subtitle pairs", store.describe(), pairs.len());

        Ok(Self {
            store,
            pairs,
            position: 0,
            dirty: false,
        })
    }

    /// Previous, current and next pair around the cursor
    pub fn window(&self) -> ViewWindow<'_> {
        let previous = self.position.checked_sub(1).and_then(|i| self.pairs.get(i));
        ViewWindow {
            previous,
            current: &self.pairs[self.position],
            next: self.pairs.get(self.position + 1),
        }
    }

    /// Move forward one pair; no-op on the last pair. Returns whether the cursor moved.
    pub fn advance(&mut self) -> bool {
        if self.position + 1 < self.pairs.len() {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// Move back one pair; no-op on the first pair. Returns whether the cursor moved.
    pub fn retreat(&mut self) -> bool {
        if self.position > 0 {
            self.position -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to a zero-based position, clamped to the sequence
    pub fn seek(&mut self, position: usize) -> usize {
        self.position = position.min(self.pairs.len() - 1);
        self.position
    }

    /// Jump to the pair carrying a subtitle index
    pub fn seek_index(&mut self, index: usize) -> Result<(), ReviewError> {
        let position = self
            .pairs
            .iter()
            .position(|pair| pair.index() == index)
            .ok_or(ReviewError::EntryNotFound(index))?;
        self.position = position;
        Ok(())
    }

    /// Zero-based cursor position
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Always false for an opened session
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[SubtitlePair] {
        &self.pairs
    }

    pub fn current(&self) -> &SubtitlePair {
        &self.pairs[self.position]
    }

    fn current_mut(&mut self) -> &mut SubtitlePair {
        self.dirty = true;
        &mut self.pairs[self.position]
    }

    /// Replace the current pair's original text. Status is left alone.
    pub fn set_original(&mut self, text: impl Into<String>) {
        self.current_mut().original_text = text.into();
    }

    /// Replace the current pair's translation and re-derive its status
    /// from the new text. A previous explicit toggle does not survive this.
    pub fn set_translation(&mut self, text: impl Into<String>) {
        let pair = self.current_mut();
        pair.translated_text = text.into();
        pair.status = ReviewStatus::derive_from_text(&pair.translated_text);
    }

    /// Invert the current pair's status regardless of its text
    pub fn toggle_status(&mut self) -> ReviewStatus {
        let pair = self.current_mut();
        pair.status = pair.status.toggled();
        debug!("Pair {} is now {}", pair.index(), pair.status);
        pair.status
    }

    /// Whether anything changed since the last load or save
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Flush all pairs through the store
    pub fn save(&mut self) -> Result<(), ReviewError> {
        self.store.save(&self.pairs)?;
        self.dirty = false;
        Ok(())
    }

    pub fn progress(&self) -> ReviewProgress {
        ReviewProgress {
            verified: self.pairs.iter().filter(|pair| pair.status.is_verified()).count(),
            total: self.pairs.len(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Media file for playback of the current pair
    pub fn media_path(&self) -> Option<PathBuf> {
        self.store.media_path()
    }
}
