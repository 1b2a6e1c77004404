/*!
 * Detached playback of a subtitle's time range.
 */

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use log::{debug, info};

use crate::app_config::PreferredPlayer;
use crate::errors::PlaybackError;

/// A resolved player invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl PlayerCommand {
    /// mpv plays [start, end) and opens a window even for audio-only media
    pub fn mpv(program: PathBuf, media: &Path, start_seconds: f64, end_seconds: f64) -> Self {
        Self {
            program,
            args: vec![
                format!("--start={:.3}", start_seconds),
                format!("--end={:.3}", end_seconds),
                "--force-window=immediate".to_string(),
                media.to_string_lossy().to_string(),
            ],
        }
    }

    /// ffplay seeks, plays the duration and exits on its own
    pub fn ffplay(program: PathBuf, media: &Path, start_seconds: f64, end_seconds: f64) -> Self {
        Self {
            program,
            args: vec![
                "-ss".to_string(),
                format!("{:.3}", start_seconds),
                "-t".to_string(),
                format!("{:.3}", (end_seconds - start_seconds).max(0.0)),
                "-autoexit".to_string(),
                "-hide_banner".to_string(),
                media.to_string_lossy().to_string(),
            ],
        }
    }

    /// Pick a player according to the preference; `Auto` tries mpv, then ffplay
    pub fn resolve(
        preference: PreferredPlayer,
        media: &Path,
        start_seconds: f64,
        end_seconds: f64,
    ) -> Result<Self, PlaybackError> {
        let candidates: &[PreferredPlayer] = match preference {
            PreferredPlayer::Auto => &[PreferredPlayer::Mpv, PreferredPlayer::Ffplay],
            PreferredPlayer::Mpv => &[PreferredPlayer::Mpv],
            PreferredPlayer::Ffplay => &[PreferredPlayer::Ffplay],
        };

        for candidate in candidates {
            let binary = match candidate {
                PreferredPlayer::Mpv => "mpv",
                _ => "ffplay",
            };
            if let Ok(program) = which::which(binary) {
                debug!("Using {} for playback", program.display());
                return Ok(match candidate {
                    PreferredPlayer::Mpv => Self::mpv(program, media, start_seconds, end_seconds),
                    _ => Self::ffplay(program, media, start_seconds, end_seconds),
                });
            }
        }

        Err(PlaybackError::NoPlayerAvailable(
            "install 'mpv' or 'ffmpeg' (ffplay) to play media".to_string(),
        ))
    }

    /// Launch without waiting; the player's output is discarded
    pub fn spawn_detached(&self) -> Result<(), PlaybackError> {
        let tool = self
            .program
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| PlaybackError::SpawnFailed { tool: tool.clone(), source })?;

        info!("Playing with {}", tool);
        Ok(())
    }
}

/// Check the media, resolve a player and launch it over [start, end)
pub fn play_segment(
    preference: PreferredPlayer,
    media: Option<&Path>,
    start_seconds: f64,
    end_seconds: f64,
) -> Result<PlayerCommand, PlaybackError> {
    let media = media.ok_or_else(|| PlaybackError::MediaUnavailable("no media file configured".to_string()))?;
    if !media.is_file() {
        return Err(PlaybackError::MediaUnavailable(format!("media file not found at {}", media.display())));
    }

    let command = PlayerCommand::resolve(preference, media, start_seconds, end_seconds)?;
    command.spawn_detached()?;
    Ok(command)
}
