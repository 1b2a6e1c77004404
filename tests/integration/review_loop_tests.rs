/*!
 * Integration tests for the line-command review loop
 */

use std::io::Cursor;
use anyhow::Result;
use acolyte::app_controller::{Controller, ReviewPaths};
use acolyte::review::ReviewStatus;
use acolyte::subtitle_processor::SubtitleCollection;
use crate::common;

fn run(controller: &Controller, paths: ReviewPaths, script: &str) -> Result<String> {
    let mut session = controller.open_split_session(paths)?;
    let mut output = Vec::new();
    controller.run_review(&mut session, Cursor::new(script.to_string()), &mut output)?;
    Ok(String::from_utf8(output)?)
}

#[test]
fn test_run_review_withEditsAndSave_shouldPersistThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let original = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let controller = Controller::new_for_test()?;

    let script = "n\nt Contém várias\\nentradas.\nn\nv\ns\nq\n";
    let output = run(
        &controller,
        ReviewPaths {
            original: original.clone(),
            ..Default::default()
        },
        script,
    )?;
    assert!(output.contains("Saved"));

    let translation = SubtitleCollection::parse_srt_string(&std::fs::read_to_string(
        temp_dir.path().join("movie_translation.srt"),
    )?)?;
    assert_eq!(translation[1].text, "Contém várias\nentradas.");

    let session = controller.open_split_session(ReviewPaths {
        original,
        ..Default::default()
    })?;
    assert_eq!(session.pairs()[1].status, ReviewStatus::Verified);
    assert_eq!(session.pairs()[2].status, ReviewStatus::Verified);
    assert_eq!(session.pairs()[0].status, ReviewStatus::Unverified);
    Ok(())
}

#[test]
fn test_run_review_withBareTranslateCommand_shouldClearAndUnverify() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let original = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    common::create_test_file(temp_dir.path(), "movie_translation.srt", common::PARTIAL_TRANSLATION_SRT)?;
    common::create_test_file(temp_dir.path(), "movie_status.json", r#"{"1": true}"#)?;
    let controller = Controller::new_for_test()?;

    let output = run(
        &controller,
        ReviewPaths {
            original: original.clone(),
            ..Default::default()
        },
        "t \ns\nq\n",
    )?;
    assert!(output.contains("Saved"));

    let session = controller.open_split_session(ReviewPaths {
        original,
        ..Default::default()
    })?;
    assert_eq!(session.pairs()[0].translated_text, "");
    assert_eq!(session.pairs()[0].status, ReviewStatus::Unverified);
    assert_eq!(session.pairs()[2].translated_text, "Para fins de teste.");
    Ok(())
}

#[test]
fn test_run_review_withUnsavedQuit_shouldWarnThenDiscard() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let original = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let controller = Controller::new_for_test()?;

    let output = run(
        &controller,
        ReviewPaths {
            original,
            ..Default::default()
        },
        "t algo\nq\nq\n",
    )?;

    assert!(output.contains("Unsaved changes"));
    assert!(!temp_dir.path().join("movie_translation.srt").exists());
    assert!(!temp_dir.path().join("movie_status.json").exists());
    Ok(())
}

#[test]
fn test_run_review_withNavigationPastEnds_shouldReportBoundaries() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let original = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let controller = Controller::new_for_test()?;

    let output = run(
        &controller,
        ReviewPaths {
            original,
            ..Default::default()
        },
        "p\nn\nn\nn\ng 9\nq\n",
    )?;

    assert!(output.contains("Already at the first subtitle"));
    assert!(output.contains("Already at the last subtitle"));
    assert!(output.contains("No entry found with index 9"));
    assert!(output.contains("[3/3]"));
    Ok(())
}

#[test]
fn test_run_review_withPlayAndNoMedia_shouldContinue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let original = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let controller = Controller::new_for_test()?;

    let output = run(
        &controller,
        ReviewPaths {
            original,
            ..Default::default()
        },
        "play\nn\nq\n",
    )?;

    assert!(output.contains("Playback unavailable"));
    assert!(output.contains("[2/3]"));
    Ok(())
}

#[test]
fn test_open_draft_session_withSourcePath_shouldCreateDraft() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let original = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let controller = Controller::new_for_test()?;

    let session = controller.open_draft_session(&original)?;

    assert_eq!(session.len(), 3);
    assert!(temp_dir.path().join("movie.srt.draft.json").exists());
    Ok(())
}
