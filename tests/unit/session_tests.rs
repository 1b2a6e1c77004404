/*!
 * Tests for review session navigation and edits
 */

use std::path::{Path, PathBuf};
use acolyte::errors::ReviewError;
use acolyte::review::{ReviewSession, ReviewStatus, ReviewStore, SubtitlePair};

/// In-memory store that records every save
struct MemoryStore {
    pairs: Vec<SubtitlePair>,
    saves: Vec<Vec<SubtitlePair>>,
    path: PathBuf,
}

impl MemoryStore {
    fn with_pairs(count: usize) -> Self {
        let pairs = (1..=count)
            .map(|i| {
                SubtitlePair::new(
                    i,
                    i as u64 * 1000,
                    i as u64 * 1000 + 500,
                    format!("orig {}", i),
                    String::new(),
                    ReviewStatus::Unverified,
                )
            })
            .collect();
        Self {
            pairs,
            saves: Vec::new(),
            path: PathBuf::from("memory.srt"),
        }
    }
}

impl ReviewStore for MemoryStore {
    fn load(&mut self) -> Result<Vec<SubtitlePair>, ReviewError> {
        Ok(self.pairs.clone())
    }

    fn save(&mut self, pairs: &[SubtitlePair]) -> Result<(), ReviewError> {
        self.saves.push(pairs.to_vec());
        Ok(())
    }

    fn document_path(&self) -> &Path {
        &self.path
    }
}

#[test]
fn test_open_withEmptyStore_shouldFail() {
    let result = ReviewSession::open(MemoryStore::with_pairs(0));
    assert!(matches!(result, Err(ReviewError::EmptySource)));
}

#[test]
fn test_advance_pastEnd_shouldClampAtLastPair() {
    let mut session = ReviewSession::open(MemoryStore::with_pairs(4)).unwrap();

    for _ in 0..(4 + 5) {
        session.advance();
    }

    assert_eq!(session.position(), 3);
    assert!(!session.advance());
}

#[test]
fn test_retreat_atStart_shouldStayAtZero() {
    let mut session = ReviewSession::open(MemoryStore::with_pairs(3)).unwrap();

    assert!(!session.retreat());
    assert_eq!(session.position(), 0);
}

#[test]
fn test_window_atBoundaries_shouldOmitMissingNeighbours() {
    let mut session = ReviewSession::open(MemoryStore::with_pairs(3)).unwrap();

    let window = session.window();
    assert!(window.previous.is_none());
    assert_eq!(window.current.index(), 1);
    assert_eq!(window.next.map(|p| p.index()), Some(2));

    session.seek(100);
    let window = session.window();
    assert_eq!(window.previous.map(|p| p.index()), Some(2));
    assert_eq!(window.current.index(), 3);
    assert!(window.next.is_none());
}

#[test]
fn test_window_withSinglePair_shouldHaveNoNeighbours() {
    let session = ReviewSession::open(MemoryStore::with_pairs(1)).unwrap();
    let window = session.window();

    assert!(window.previous.is_none());
    assert!(window.next.is_none());
}

#[test]
fn test_seek_index_withUnknownIndex_shouldReportNotFound() {
    let mut session = ReviewSession::open(MemoryStore::with_pairs(3)).unwrap();

    assert!(matches!(session.seek_index(42), Err(ReviewError::EntryNotFound(42))));
    session.seek_index(3).unwrap();
    assert_eq!(session.position(), 2);
}

#[test]
fn test_set_translation_shouldDeriveStatusFromText() {
    let mut session = ReviewSession::open(MemoryStore::with_pairs(2)).unwrap();

    session.set_translation("olá");
    assert_eq!(session.current().status, ReviewStatus::Verified);

    session.set_translation("   ");
    assert_eq!(session.current().status, ReviewStatus::Unverified);
}

#[test]
fn test_toggle_status_shouldOverrideDerivedStatus() {
    let mut session = ReviewSession::open(MemoryStore::with_pairs(2)).unwrap();

    session.set_translation("olá");
    assert_eq!(session.toggle_status(), ReviewStatus::Unverified);
    assert_eq!(session.current().translated_text, "olá");
    assert_eq!(session.toggle_status(), ReviewStatus::Verified);
}

#[test]
fn test_set_original_shouldKeepStatusAndTiming() {
    let mut session = ReviewSession::open(MemoryStore::with_pairs(2)).unwrap();
    session.toggle_status();

    session.set_original("corrected");
    let pair = session.current();
    assert_eq!(pair.original_text, "corrected");
    assert_eq!(pair.status, ReviewStatus::Verified);
    assert_eq!(pair.start_time_ms(), 1000);
}

#[test]
fn test_edit_shouldOnlyTouchCurrentPair() {
    let mut session = ReviewSession::open(MemoryStore::with_pairs(3)).unwrap();
    session.advance();
    session.set_translation("dois");

    let pairs = session.pairs();
    assert_eq!(pairs[0].translated_text, "");
    assert_eq!(pairs[1].translated_text, "dois");
    assert_eq!(pairs[2].translated_text, "");
}

#[test]
fn test_save_shouldFlushAllPairsAndClearDirty() {
    let mut session = ReviewSession::open(MemoryStore::with_pairs(3)).unwrap();
    assert!(!session.is_dirty());

    session.set_translation("um");
    assert!(session.is_dirty());

    session.save().unwrap();
    assert!(!session.is_dirty());
    assert_eq!(session.store().saves.len(), 1);
    assert_eq!(session.store().saves[0].len(), 3);
    assert_eq!(session.store().saves[0][0].translated_text, "um");
}

#[test]
fn test_progress_shouldCountVerifiedPairs() {
    let mut session = ReviewSession::open(MemoryStore::with_pairs(4)).unwrap();
    session.toggle_status();

    let progress = session.progress();
    assert_eq!(progress.verified, 1);
    assert_eq!(progress.total, 4);
    assert!((progress.percentage() - 25.0).abs() < f64::EPSILON);
}
