/*!
 * Integration tests for review sessions over split files
 */

use std::fs;
use anyhow::Result;
use acolyte::errors::ReviewError;
use acolyte::review::{ReviewSession, ReviewStatus, ReviewStore, SplitFileStore};
use acolyte::subtitle_processor::SubtitleCollection;
use crate::common;

#[test]
fn test_open_withMissingTranslationAndStatus_shouldStartUnreviewed() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let original = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;

    let session = ReviewSession::open(SplitFileStore::new(&original))?;

    assert_eq!(session.len(), 3);
    assert!(session.pairs().iter().all(|p| p.translated_text.is_empty()));
    assert!(session.pairs().iter().all(|p| p.status == ReviewStatus::Unverified));
    Ok(())
}

#[test]
fn test_open_withPartialTranslationAndStatus_shouldMergeByIndex() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let original = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    common::create_test_file(temp_dir.path(), "movie_translation.srt", common::PARTIAL_TRANSLATION_SRT)?;
    common::create_test_file(temp_dir.path(), "movie_status.json", r#"{"3": true}"#)?;

    let session = ReviewSession::open(SplitFileStore::new(&original))?;
    let pairs = session.pairs();

    assert_eq!(pairs[0].translated_text, "Isto é uma legenda de teste.");
    assert_eq!(pairs[1].translated_text, "");
    assert_eq!(pairs[2].translated_text, "Para fins de teste.");
    assert_eq!(pairs[0].status, ReviewStatus::Unverified);
    assert_eq!(pairs[2].status, ReviewStatus::Verified);
    Ok(())
}

#[test]
fn test_open_withCorruptStatus_shouldFailInsteadOfDiscardingState() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let original = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    common::create_test_file(temp_dir.path(), "movie_status.json", r#"{"1": "approved"}"#)?;

    let err = ReviewSession::open(SplitFileStore::new(&original)).err().unwrap();

    assert!(matches!(err, ReviewError::StatusRecordCorrupt { .. }));
    assert!(err.is_fatal());
    Ok(())
}

#[test]
fn test_open_withUnparseableTranslation_shouldTreatAsEmpty() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let original = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    common::create_test_file(temp_dir.path(), "movie_translation.srt", "garbage\n")?;

    let session = ReviewSession::open(SplitFileStore::new(&original))?;
    assert!(session.pairs().iter().all(|p| p.translated_text.is_empty()));
    Ok(())
}

#[test]
fn test_open_withMissingOriginal_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let err = ReviewSession::open(SplitFileStore::new(temp_dir.path().join("absent.srt"))).err().unwrap();

    assert!(matches!(err, ReviewError::SourceUnreadable { .. }));
    Ok(())
}

#[test]
fn test_save_thenReopen_shouldRestoreEdits() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let original = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;

    let mut session = ReviewSession::open(SplitFileStore::new(&original))?;
    session.advance();
    session.set_translation("Contém várias entradas.");
    session.advance();
    session.toggle_status();
    session.save()?;

    let reopened = ReviewSession::open(SplitFileStore::new(&original))?;
    assert_eq!(reopened.pairs(), session.pairs());

    let translation = SubtitleCollection::parse_srt_string(&fs::read_to_string(
        temp_dir.path().join("movie_translation.srt"),
    )?)?;
    assert_eq!(translation.len(), 3);
    assert_eq!(translation[1].start_time_ms, 5000);
    Ok(())
}

#[test]
fn test_save_twice_shouldWriteIdenticalBytes() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let original = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    common::create_test_file(temp_dir.path(), "movie_translation.srt", common::PARTIAL_TRANSLATION_SRT)?;

    let mut session = ReviewSession::open(SplitFileStore::new(&original))?;
    session.set_translation("Uma legenda.");
    session.save()?;

    let read_all = || -> Result<Vec<Vec<u8>>> {
        ["movie.srt", "movie_translation.srt", "movie_status.json"]
            .iter()
            .map(|name| Ok(fs::read(temp_dir.path().join(name))?))
            .collect()
    };
    let first = read_all()?;

    session.save()?;
    assert_eq!(read_all()?, first);

    let mut reopened = ReviewSession::open(SplitFileStore::new(&original))?;
    reopened.save()?;
    assert_eq!(read_all()?, first);
    Ok(())
}

#[test]
fn test_save_withCustomSuffix_shouldWriteAlternateTranslationName() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let original = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;

    let mut store = SplitFileStore::with_translation_suffix(&original, "pt");
    let pairs = store.load()?;
    store.save(&pairs)?;

    assert!(temp_dir.path().join("movie_pt.srt").exists());
    assert!(temp_dir.path().join("movie_status.json").exists());
    Ok(())
}

#[test]
fn test_save_withStaleStatusIndices_shouldPruneThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let original = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    common::create_test_file(temp_dir.path(), "movie_status.json", r#"{"2": true, "99": true}"#)?;

    let mut session = ReviewSession::open(SplitFileStore::new(&original))?;
    session.save()?;

    let status = fs::read_to_string(temp_dir.path().join("movie_status.json"))?;
    assert!(!status.contains("\"99\""));
    assert!(status.contains("\"2\": true"));
    Ok(())
}
