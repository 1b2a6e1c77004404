/*!
 * One-shot commands over a draft document.
 *
 * Each mutating command loads the whole document, changes exactly one
 * field group, stamps `metadata.updated_at` and rewrites the document.
 * Export and play only read it.
 */

use std::path::{Path, PathBuf};
use log::{info, warn};
use serde::Serialize;

use crate::errors::{PlaybackError, ReviewError};
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::playback::{extract_clip, ClipCache, ClipExtractor, ClipRequest};
use crate::review::pair::ReviewStatus;
use crate::review::store::write_artifact;
use crate::subtitle_processor::SubtitleCollection;

use super::model::{now_timestamp, DraftConfigUpdate, DraftDocument};
use super::store::DraftStore;

/// Command that produced an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftAction {
    Translate,
    Fix,
    Config,
    StatusToggle,
    Export,
    Play,
}

/// Machine-readable result printed by the CLI
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandOutcome {
    pub status: &'static str,
    pub action: DraftAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_status: Option<ReviewStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<&'static str>,
}

impl CommandOutcome {
    fn success(action: DraftAction) -> Self {
        Self {
            status: "success",
            action,
            updated_index: None,
            entry_status: None,
            original_file: None,
            target_file: None,
            clip_path: None,
            cache: None,
        }
    }

    fn for_entry(action: DraftAction, index: usize, status: ReviewStatus) -> Self {
        Self {
            updated_index: Some(index),
            entry_status: Some(status),
            ..Self::success(action)
        }
    }
}

/// Load the draft for `srt_path`, creating it when it does not exist yet
pub fn load_or_create(srt_path: &Path) -> Result<DraftDocument, ReviewError> {
    let mut store = DraftStore::for_source(srt_path);
    Ok(store.load_document()?.clone())
}

fn mutate<T>(
    draft_path: &Path,
    apply: impl FnOnce(&mut DraftDocument) -> Result<T, ReviewError>,
) -> Result<T, ReviewError> {
    let mut document = DraftDocument::load(draft_path)?;
    let result = apply(&mut document)?;
    document.stamp(&now_timestamp());
    document.write(draft_path)?;
    Ok(result)
}

/// Set the translation of one entry
pub fn translate(draft_path: &Path, index: usize, text: &str) -> Result<CommandOutcome, ReviewError> {
    let status = mutate(draft_path, |document| document.translate(index, text))?;
    info!("Entry {} translated ({})", index, status);
    Ok(CommandOutcome::for_entry(DraftAction::Translate, index, status))
}

/// Correct the original text of one entry
pub fn fix(draft_path: &Path, index: usize, text: &str) -> Result<CommandOutcome, ReviewError> {
    mutate(draft_path, |document| document.fix(index, text))?;
    info!("Entry {} original text fixed", index);
    Ok(CommandOutcome::for_entry(DraftAction::Fix, index, ReviewStatus::Unverified))
}

/// Invert the status of one entry
pub fn toggle_status(draft_path: &Path, index: usize) -> Result<CommandOutcome, ReviewError> {
    let status = mutate(draft_path, |document| document.toggle_status(index))?;
    info!("Entry {} is now {}", index, status);
    Ok(CommandOutcome::for_entry(DraftAction::StatusToggle, index, status))
}

/// Update language codes and/or the audio file
pub fn configure(draft_path: &Path, mut update: DraftConfigUpdate) -> Result<CommandOutcome, ReviewError> {
    if update.is_empty() {
        return Err(ReviewError::EmptyConfigUpdate);
    }

    for code in [&update.original_lang, &update.target_lang].into_iter().flatten() {
        match language_utils::validate_language_code(code).and_then(|_| language_utils::get_language_name(code)) {
            Ok(name) => info!("Language {} is {}", code, name),
            Err(e) => warn!("{}; storing it anyway", e),
        }
    }

    if let Some(audio) = update.audio_file.take() {
        if !FileManager::file_exists(&audio) {
            return Err(PlaybackError::MediaUnavailable(format!("audio file not found at {}", audio.display())).into());
        }
        let absolute = audio
            .canonicalize()
            .map_err(|e| PlaybackError::MediaUnavailable(format!("{}: {}", audio.display(), e)))?;
        update.audio_file = Some(absolute);
    }

    mutate(draft_path, |document| {
        document.configure(&update);
        Ok(())
    })?;

    Ok(CommandOutcome::success(DraftAction::Config))
}

/// Write `<base>_<original-lang>.srt` and `<base>_<target-lang>.srt` next
/// to the draft. The draft itself is not modified.
pub fn export(draft_path: &Path) -> Result<CommandOutcome, ReviewError> {
    let document = DraftDocument::load(draft_path)?;
    let (original_segment, target_segment) = document.export_language_segments();

    let original_file = FileManager::export_path_for(draft_path, &original_segment);
    let target_file = FileManager::export_path_for(draft_path, &target_segment);
    if original_file == target_file {
        warn!("Both exports resolve to {}; the target export overwrites the original", original_file.display());
    }

    write_artifact(&original_file, &SubtitleCollection::compose(&document.original_entries()))?;
    write_artifact(&target_file, &SubtitleCollection::compose(&document.translated_entries()))?;

    info!("Exported {} and {}", original_file.display(), target_file.display());

    Ok(CommandOutcome {
        original_file: Some(original_file),
        target_file: Some(target_file),
        ..CommandOutcome::success(DraftAction::Export)
    })
}

/// Extract (or reuse) the audio clip for one entry
pub async fn play(
    draft_path: &Path,
    index: usize,
    cache: &mut ClipCache,
    extractor: &dyn ClipExtractor,
) -> Result<CommandOutcome, ReviewError> {
    let document = DraftDocument::load(draft_path)?;

    let media = document.metadata.audio_file.clone().ok_or_else(|| {
        PlaybackError::MediaUnavailable("audio file not configured, use 'config --audio-file' first".to_string())
    })?;
    let entry = document.find_entry(index)?;

    let request = ClipRequest {
        document: draft_path.to_path_buf(),
        index,
        media,
        start_seconds: entry.start_seconds,
        duration_seconds: entry.end_seconds - entry.start_seconds,
    };
    let clip = extract_clip(cache, extractor, &request).await?;

    Ok(CommandOutcome {
        updated_index: Some(index),
        clip_path: Some(clip.path),
        cache: Some(if clip.cache_hit { "hit" } else { "miss" }),
        ..CommandOutcome::success(DraftAction::Play)
    })
}
