/*!
 * Tests for file utilities and derived paths
 */

use std::path::{Path, PathBuf};
use anyhow::Result;
use acolyte::file_utils::FileManager;
use crate::common;

#[test]
fn test_status_path_for_shouldUseStemAndStatusSuffix() {
    assert_eq!(
        FileManager::status_path_for("/subs/movie.srt"),
        PathBuf::from("/subs/movie_status.json")
    );
}

#[test]
fn test_translation_path_for_withSuffix_shouldUseIt() {
    assert_eq!(
        FileManager::translation_path_for("/subs/movie.srt", "translation"),
        PathBuf::from("/subs/movie_translation.srt")
    );
    assert_eq!(
        FileManager::translation_path_for("/subs/movie.srt", "pt"),
        PathBuf::from("/subs/movie_pt.srt")
    );
}

#[test]
fn test_draft_path_for_shouldKeepFullFileName() {
    assert_eq!(
        FileManager::draft_path_for("/subs/movie.srt"),
        PathBuf::from("/subs/movie.srt.draft.json")
    );
}

#[test]
fn test_export_path_for_shouldStripDraftAndSubtitleExtensions() {
    let draft = Path::new("/subs/movie.srt.draft.json");

    assert_eq!(FileManager::export_base_name(draft), "movie");
    assert_eq!(FileManager::export_path_for(draft, "target"), PathBuf::from("/subs/movie_target.srt"));
}

#[test]
fn test_write_to_file_withMissingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("nested").join("dir").join("file.txt");

    FileManager::write_to_file(&path, "content")?;

    assert!(FileManager::file_exists(&path));
    assert!(FileManager::dir_exists(path.parent().unwrap()));
    assert_eq!(FileManager::read_to_string(&path)?, "content");
    Ok(())
}
