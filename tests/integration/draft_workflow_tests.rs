/*!
 * Integration tests for the draft document workflow
 */

use std::fs;
use anyhow::Result;
use acolyte::draft::commands;
use acolyte::draft::{DraftConfigUpdate, DraftDocument, DraftStore};
use acolyte::errors::{PlaybackError, ReviewError};
use acolyte::file_utils::FileManager;
use acolyte::review::{ReviewSession, ReviewStatus};
use acolyte::subtitle_processor::SubtitleCollection;
use crate::common;

#[test]
fn test_load_or_create_withNewSource_shouldCreateDraft() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;

    let document = commands::load_or_create(&source)?;
    let draft_path = FileManager::draft_path_for(&source);

    assert!(draft_path.exists());
    assert_eq!(document.subtitles.len(), 3);
    assert!(document.subtitles.iter().all(|e| e.status == ReviewStatus::Unverified && e.translation.is_empty()));
    assert_eq!(document.subtitles[1].start_seconds, 5.0);

    // A second load reads the existing draft instead of recreating it
    commands::translate(&draft_path, 1, "Olá")?;
    let again = commands::load_or_create(&source)?;
    assert_eq!(again.subtitles[0].translation, "Olá");
    Ok(())
}

#[test]
fn test_translate_shouldChangeOnlyTargetEntryAndStamp() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let draft_path = FileManager::draft_path_for(&source);
    commands::load_or_create(&source)?;

    let mut before = DraftDocument::load(&draft_path)?;
    before.metadata.updated_at = "1970-01-01T00:00:00+00:00".to_string();
    before.write(&draft_path)?;

    let outcome = commands::translate(&draft_path, 2, "olá")?;
    let after = DraftDocument::load(&draft_path)?;

    assert_eq!(outcome.updated_index, Some(2));
    assert_eq!(outcome.entry_status, Some(ReviewStatus::Verified));
    assert_eq!(after.subtitles[1].translation, "olá");
    assert_eq!(after.subtitles[1].status, ReviewStatus::Verified);
    assert_eq!(after.subtitles[0], before.subtitles[0]);
    assert_eq!(after.subtitles[2], before.subtitles[2]);
    assert_eq!(after.metadata.created_at, before.metadata.created_at);
    assert_ne!(after.metadata.updated_at, before.metadata.updated_at);
    Ok(())
}

#[test]
fn test_commands_withUnknownIndex_shouldReportNotFoundAndKeepFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let draft_path = FileManager::draft_path_for(&source);
    commands::load_or_create(&source)?;
    let before = fs::read(&draft_path)?;

    assert!(matches!(commands::translate(&draft_path, 99, "x"), Err(ReviewError::EntryNotFound(99))));
    assert!(matches!(commands::fix(&draft_path, 99, "x"), Err(ReviewError::EntryNotFound(99))));
    assert!(matches!(commands::toggle_status(&draft_path, 99), Err(ReviewError::EntryNotFound(99))));

    assert_eq!(fs::read(&draft_path)?, before);
    Ok(())
}

#[test]
fn test_configure_withNoFields_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let draft_path = FileManager::draft_path_for(&source);
    commands::load_or_create(&source)?;

    let err = commands::configure(&draft_path, DraftConfigUpdate::default()).unwrap_err();
    assert!(matches!(err, ReviewError::EmptyConfigUpdate));
    Ok(())
}

#[test]
fn test_configure_withMissingAudio_shouldReportMediaUnavailable() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let draft_path = FileManager::draft_path_for(&source);
    commands::load_or_create(&source)?;

    let update = DraftConfigUpdate {
        audio_file: Some(temp_dir.path().join("missing.wav")),
        ..Default::default()
    };
    let err = commands::configure(&draft_path, update).unwrap_err();
    assert!(matches!(err, ReviewError::Playback(PlaybackError::MediaUnavailable(_))));
    Ok(())
}

#[test]
fn test_configure_withAudio_shouldStoreAbsolutePath() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let audio = common::create_test_file(temp_dir.path(), "movie.wav", "RIFF")?;
    let draft_path = FileManager::draft_path_for(&source);
    commands::load_or_create(&source)?;

    commands::configure(
        &draft_path,
        DraftConfigUpdate {
            original_lang: Some("en".to_string()),
            audio_file: Some(audio.clone()),
            ..Default::default()
        },
    )?;

    let document = DraftDocument::load(&draft_path)?;
    assert_eq!(document.metadata.original_lang, "en");
    assert_eq!(document.metadata.target_lang, "unknown");
    assert_eq!(document.metadata.audio_file, Some(audio.canonicalize()?));
    Ok(())
}

#[test]
fn test_export_withUnknownTarget_shouldFallBackToLiteralName() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let draft_path = FileManager::draft_path_for(&source);
    commands::load_or_create(&source)?;
    commands::configure(
        &draft_path,
        DraftConfigUpdate {
            original_lang: Some("en".to_string()),
            ..Default::default()
        },
    )?;
    commands::translate(&draft_path, 1, "Isto é um teste.")?;
    let draft_before = fs::read(&draft_path)?;

    let outcome = commands::export(&draft_path)?;

    let original_file = temp_dir.path().join("movie_en.srt");
    let target_file = temp_dir.path().join("movie_target.srt");
    assert_eq!(outcome.original_file.as_deref(), Some(original_file.as_path()));
    assert_eq!(outcome.target_file.as_deref(), Some(target_file.as_path()));

    let target = SubtitleCollection::parse_srt_string(&fs::read_to_string(&target_file)?)?;
    assert_eq!(target.len(), 3);
    assert_eq!(target[0].text, "Isto é um teste.");
    assert_eq!(target[1].text, "...");
    assert_eq!(target[2].start_time_ms, 10_000);

    let original = SubtitleCollection::parse_srt_string(&fs::read_to_string(&original_file)?)?;
    assert_eq!(original[2].text, "For testing purposes.");

    assert_eq!(fs::read(&draft_path)?, draft_before);
    Ok(())
}

#[test]
fn test_outcome_json_shouldReportSuccess() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let draft_path = FileManager::draft_path_for(&source);
    commands::load_or_create(&source)?;

    let outcome = commands::toggle_status(&draft_path, 3)?;
    let json: serde_json::Value = serde_json::to_value(&outcome)?;

    assert_eq!(json["status"], "success");
    assert_eq!(json["action"], "status_toggle");
    assert_eq!(json["updated_index"], 3);
    assert_eq!(json["entry_status"], "verified");
    assert!(json.get("clip_path").is_none());
    Ok(())
}

#[test]
fn test_draft_session_save_twice_shouldBeIdempotent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;

    let mut session = ReviewSession::open(DraftStore::for_source(&source))?;
    session.set_translation("Um teste.");
    session.save()?;

    let draft_path = FileManager::draft_path_for(&source);
    let first = fs::read(&draft_path)?;
    session.save()?;
    assert_eq!(fs::read(&draft_path)?, first);

    let reopened = ReviewSession::open(DraftStore::open(&draft_path))?;
    assert_eq!(reopened.pairs(), session.pairs());
    Ok(())
}

#[test]
fn test_draft_with_fractional_seconds_shouldRoundToMilliseconds() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let draft_path = common::create_test_file(
        temp_dir.path(),
        "clip.srt.draft.json",
        r#"{"metadata": {"original_lang": "en", "target_lang": "pt"},
            "subtitles": [{"index": 1, "start_seconds": 0.3336, "end_seconds": 1.2,
                           "original": "Hi", "translation": "Oi", "status": "verified"}]}"#,
    )?;

    let session = ReviewSession::open(DraftStore::open(&draft_path))?;
    assert_eq!(session.current().start_time_ms(), 334);
    assert_eq!(session.current().end_time_ms(), 1200);
    Ok(())
}
