/*!
 * Playback adapter: clip extraction with a cache, and detached players.
 *
 * Everything here is best-effort. Failures are reported to the caller and
 * never touch review state.
 */

pub mod cache;
pub mod extractor;
pub mod player;

use std::path::PathBuf;
use log::{debug, info};

use crate::errors::PlaybackError;

pub use cache::{ClipCache, ClipKey};
pub use extractor::{ClipExtractor, FfmpegExtractor};
pub use player::{play_segment, PlayerCommand};

/// One clip to produce
#[derive(Debug, Clone, PartialEq)]
pub struct ClipRequest {
    /// Document the entry belongs to (cache identity)
    pub document: PathBuf,
    /// Subtitle index (cache identity)
    pub index: usize,
    pub media: PathBuf,
    pub start_seconds: f64,
    pub duration_seconds: f64,
}

/// Result of a clip request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipOutcome {
    pub path: PathBuf,
    pub cache_hit: bool,
}

/// Return the cached clip for (document, index), extracting it on a miss.
/// The extractor runs at most once per key while its output exists.
pub async fn extract_clip(
    cache: &mut ClipCache,
    extractor: &dyn ClipExtractor,
    request: &ClipRequest,
) -> Result<ClipOutcome, PlaybackError> {
    if !request.media.is_file() {
        return Err(PlaybackError::MediaUnavailable(format!(
            "audio file not found at {}",
            request.media.display()
        )));
    }

    let key = ClipKey::new(&request.document, request.index);
    if let Some(path) = cache.lookup(&key) {
        debug!("Clip cache hit for entry {}", request.index);
        return Ok(ClipOutcome { path, cache_hit: true });
    }

    cache.ensure_dir()?;
    let path = cache.clip_path(&key);
    extractor
        .extract(&request.media, request.start_seconds, request.duration_seconds, &path)
        .await?;

    info!("Extracted clip for entry {} with {}", request.index, extractor.name());
    cache.record(key, path.clone());

    Ok(ClipOutcome { path, cache_hit: false })
}
