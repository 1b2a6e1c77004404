/*!
 * External clip extraction.
 */

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use async_trait::async_trait;
use log::{debug, error};
use tokio::process::Command;

use crate::errors::PlaybackError;

/// Produces an audio clip for a time range of a media file
#[async_trait]
pub trait ClipExtractor: Send + Sync {
    /// Write `duration_seconds` of `media` starting at `start_seconds` to `output`
    async fn extract(
        &self,
        media: &Path,
        start_seconds: f64,
        duration_seconds: f64,
        output: &Path,
    ) -> Result<(), PlaybackError>;

    /// Tool name for logs
    fn name(&self) -> &str;
}

/// ffmpeg-backed extractor
#[derive(Debug, Clone)]
pub struct FfmpegExtractor {
    /// Explicit binary; located on PATH at first use when absent
    binary: Option<PathBuf>,
    format: String,
    timeout: Duration,
}

impl FfmpegExtractor {
    pub fn new(binary: PathBuf, format: &str, timeout: Duration) -> Self {
        Self {
            binary: Some(binary),
            format: format.to_string(),
            timeout,
        }
    }

    /// Use whichever ffmpeg is on PATH when a clip is first extracted
    pub fn on_path(format: &str, timeout: Duration) -> Self {
        Self {
            binary: None,
            format: format.to_string(),
            timeout,
        }
    }

    /// The configured binary, or ffmpeg from PATH
    pub fn binary(&self) -> Result<PathBuf, PlaybackError> {
        match &self.binary {
            Some(binary) => Ok(binary.clone()),
            None => which::which("ffmpeg").map_err(|_| {
                PlaybackError::NoPlayerAvailable("'ffmpeg' must be installed and on PATH to extract clips".to_string())
            }),
        }
    }

    /// Arguments for one extraction, seeking before the input for speed
    pub fn arguments(&self, media: &Path, start_seconds: f64, duration_seconds: f64, output: &Path) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-hide_banner".to_string(),
            "-ss".to_string(),
            format!("{:.3}", start_seconds),
            "-i".to_string(),
            media.to_string_lossy().to_string(),
            "-t".to_string(),
            format!("{:.3}", duration_seconds),
            "-vn".to_string(),
            "-f".to_string(),
            self.format.clone(),
            output.to_string_lossy().to_string(),
        ]
    }

    /// Keep only the stderr lines that explain a failure
    fn filter_stderr(stderr: &str) -> String {
        let noise_prefixes = [
            "ffmpeg version",
            "built with",
            "configuration:",
            "lib",
            "Input #",
            "Metadata:",
            "Duration:",
            "Stream #",
            "Output #",
            "Stream mapping:",
            "Press [q]",
        ];

        let meaningful: Vec<&str> = stderr
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !noise_prefixes.iter().any(|p| line.starts_with(p)))
            .collect();

        if meaningful.is_empty() {
            "unknown ffmpeg error (stderr was empty after filtering)".to_string()
        } else {
            meaningful.join("\n")
        }
    }
}

#[async_trait]
impl ClipExtractor for FfmpegExtractor {
    async fn extract(
        &self,
        media: &Path,
        start_seconds: f64,
        duration_seconds: f64,
        output: &Path,
    ) -> Result<(), PlaybackError> {
        let binary = self.binary()?;
        let args = self.arguments(media, start_seconds, duration_seconds, output);
        debug!("Running {} {}", binary.display(), args.join(" "));

        let ffmpeg_future = Command::new(&binary)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let result = tokio::select! {
            result = ffmpeg_future => {
                result.map_err(|source| PlaybackError::SpawnFailed { tool: "ffmpeg".to_string(), source })?
            },
            _ = tokio::time::sleep(self.timeout) => {
                return Err(PlaybackError::Timeout(self.timeout.as_secs()));
            }
        };

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let filtered = Self::filter_stderr(&stderr);
            error!("Clip extraction failed: {}", filtered);
            // Do not leave a truncated clip behind for the cache to pick up
            let _ = std::fs::remove_file(output);
            return Err(PlaybackError::ExtractionFailed(filtered));
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "ffmpeg"
    }
}
