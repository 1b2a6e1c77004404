use anyhow::{anyhow, Context, Result};
use log::{debug, error, info, warn};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app_config::Config;
use crate::draft::{self, CommandOutcome, DraftConfigUpdate, DraftDocument, DraftStore};
use crate::file_utils::{FileManager, DRAFT_SUFFIX};
use crate::playback::{self, ClipCache, FfmpegExtractor, PlayerCommand};
use crate::review::{ReviewSession, ReviewStore, SplitFileStore, SubtitlePair};

// @module: Application controller for subtitle review

/// Paths for a review session over split files
#[derive(Debug, Clone, Default)]
pub struct ReviewPaths {
    pub original: PathBuf,
    pub translation: Option<PathBuf>,
    pub status: Option<PathBuf>,
    pub media: Option<PathBuf>,
}

/// Main application controller for subtitle review
pub struct Controller {
    // @field: App configuration
    config: Config,
}

const REVIEW_HELP: &str = "commands: n (next), p (previous), g <index> (go to), o <text> (edit original), \
t <text> (edit translation, empty to clear), v (toggle verified), play, s (save), q (quit), q! (quit without saving)";

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Open a session over original/translation/status files
    pub fn open_split_session(&self, paths: ReviewPaths) -> Result<ReviewSession<SplitFileStore>> {
        let store = SplitFileStore::with_translation_suffix(&paths.original, &self.config.naming.translation_suffix)
            .translation_path_override(paths.translation)
            .status_path_override(paths.status)
            .with_media_path(paths.media);

        ReviewSession::open(store).with_context(|| format!("Failed to open review session for {}", paths.original.display()))
    }

    /// Open a session over a draft; `path` is either the draft or its source SRT
    pub fn open_draft_session(&self, path: &Path) -> Result<ReviewSession<DraftStore>> {
        let store = if Self::is_draft_path(path) {
            DraftStore::open(path)
        } else {
            DraftStore::for_source(path)
        };

        ReviewSession::open(store).with_context(|| format!("Failed to open draft session for {}", path.display()))
    }

    /// Drive a session from line commands until `q` or end of input
    pub fn run_review<S, R, W>(&self, session: &mut ReviewSession<S>, input: R, mut output: W) -> Result<()>
    where
        S: ReviewStore,
        R: BufRead,
        W: Write,
    {
        writeln!(output, "{}", REVIEW_HELP)?;
        Self::render_window(session, &mut output)?;

        let mut quit_warned = false;
        for line in input.lines() {
            let line = line.context("Failed to read review command")?;
            let line = line.trim_end();
            let (command, argument) = match line.split_once(' ') {
                Some((command, argument)) => (command, Some(argument)),
                None => (line, None),
            };

            match (command, argument) {
                ("", _) => {}
                ("n", None) => {
                    if !session.advance() {
                        writeln!(output, "Already at the last subtitle")?;
                    }
                }
                ("p", None) => {
                    if !session.retreat() {
                        writeln!(output, "Already at the first subtitle")?;
                    }
                }
                ("g", Some(index)) => match index.trim().parse::<usize>() {
                    Ok(index) => {
                        if let Err(e) = session.seek_index(index) {
                            writeln!(output, "{}", e)?;
                        }
                    }
                    Err(_) => writeln!(output, "Not a subtitle index: {}", index)?,
                },
                ("o", text) => session.set_original(Self::unescape(text.unwrap_or_default())),
                // Bare `t` clears the translation
                ("t", text) => session.set_translation(Self::unescape(text.unwrap_or_default())),
                ("v", None) => {
                    let status = session.toggle_status();
                    writeln!(output, "Subtitle {} is now {}", session.current().index(), status)?;
                }
                ("play", None) => {
                    if let Err(e) = self.play_pair(session.media_path().as_deref(), session.current()) {
                        warn!("Playback unavailable: {}", e);
                        writeln!(output, "Playback unavailable: {}", e)?;
                    }
                }
                ("s", None) => match session.save() {
                    Ok(()) => {
                        quit_warned = false;
                        writeln!(output, "Saved {}", session.store().describe())?;
                    }
                    Err(e) => {
                        error!("Save failed: {}", e);
                        writeln!(output, "Save failed: {}", e)?;
                    }
                },
                ("q", None) => {
                    if session.is_dirty() && !quit_warned {
                        quit_warned = true;
                        writeln!(output, "Unsaved changes; 's' to save, 'q' again or 'q!' to discard")?;
                        continue;
                    }
                    break;
                }
                ("q!", None) => break,
                _ => {
                    writeln!(output, "{}", REVIEW_HELP)?;
                    continue;
                }
            }

            Self::render_window(session, &mut output)?;
        }

        if session.is_dirty() {
            warn!("Review ended with unsaved changes");
        }
        Ok(())
    }

    /// Print previous/current/next with progress
    pub fn render_window<S: ReviewStore, W: Write>(session: &ReviewSession<S>, output: &mut W) -> Result<()> {
        let progress = session.progress();
        let window = session.window();

        writeln!(
            output,
            "[{}/{}] verified {}/{} ({:.1}%)",
            session.position() + 1,
            session.len(),
            progress.verified,
            progress.total,
            progress.percentage()
        )?;
        if let Some(previous) = window.previous {
            Self::render_pair(output, "  ", previous)?;
        }
        Self::render_pair(output, "> ", window.current)?;
        if let Some(next) = window.next {
            Self::render_pair(output, "  ", next)?;
        }
        Ok(())
    }

    fn render_pair<W: Write>(output: &mut W, marker: &str, pair: &SubtitlePair) -> Result<()> {
        let entry = pair.original_entry();
        writeln!(
            output,
            "{}#{} {} --> {} [{}]",
            marker,
            pair.index(),
            entry.format_start_time(),
            entry.format_end_time(),
            pair.status
        )?;
        writeln!(output, "    {}", pair.original_text.replace('\n', " / "))?;
        writeln!(output, "    {}", pair.translated_text.replace('\n', " / "))?;
        Ok(())
    }

    /// `\n` typed on the command line stands for a line break
    fn unescape(text: &str) -> String {
        text.replace("\\n", "\n")
    }

    fn is_draft_path(path: &Path) -> bool {
        path.to_string_lossy().ends_with(DRAFT_SUFFIX)
    }

    /// Accept either the draft or its source subtitle file
    fn resolve_draft_path(path: &Path) -> PathBuf {
        if Self::is_draft_path(path) {
            path.to_path_buf()
        } else {
            FileManager::draft_path_for(path)
        }
    }

    /// Launch a detached player over one pair's time range
    pub fn play_pair(&self, media: Option<&Path>, pair: &SubtitlePair) -> Result<PlayerCommand> {
        let command = playback::play_segment(
            self.config.playback.preferred_player,
            media,
            pair.start_seconds(),
            pair.end_seconds(),
        )?;
        debug!("Launched {} {}", command.program.display(), command.args.join(" "));
        Ok(command)
    }

    /// Create (or read) the draft for a subtitle file
    pub fn load_draft(&self, srt_path: &Path) -> Result<DraftDocument> {
        if !FileManager::file_exists(srt_path) {
            return Err(anyhow!("Subtitle file does not exist: {}", srt_path.display()));
        }
        let document = draft::commands::load_or_create(srt_path)
            .with_context(|| format!("Failed to load draft for {}", srt_path.display()))?;
        info!("Draft has {} entries", document.subtitles.len());
        Ok(document)
    }

    pub fn translate(&self, path: &Path, index: usize, text: &str) -> Result<CommandOutcome> {
        let draft_path = Self::resolve_draft_path(path);
        Ok(draft::commands::translate(&draft_path, index, &Self::unescape(text))?)
    }

    pub fn fix(&self, path: &Path, index: usize, text: &str) -> Result<CommandOutcome> {
        let draft_path = Self::resolve_draft_path(path);
        Ok(draft::commands::fix(&draft_path, index, &Self::unescape(text))?)
    }

    pub fn toggle_status(&self, path: &Path, index: usize) -> Result<CommandOutcome> {
        let draft_path = Self::resolve_draft_path(path);
        Ok(draft::commands::toggle_status(&draft_path, index)?)
    }

    pub fn configure(&self, path: &Path, update: DraftConfigUpdate) -> Result<CommandOutcome> {
        let draft_path = Self::resolve_draft_path(path);
        Ok(draft::commands::configure(&draft_path, update)?)
    }

    pub fn export(&self, path: &Path) -> Result<CommandOutcome> {
        let draft_path = Self::resolve_draft_path(path);
        Ok(draft::commands::export(&draft_path)?)
    }

    /// Extract the clip for one entry with ffmpeg, reusing the clip cache
    pub async fn play(&self, path: &Path, index: usize) -> Result<CommandOutcome> {
        let draft_path = Self::resolve_draft_path(path);
        let playback_config = &self.config.playback;

        let mut cache = ClipCache::new(playback_config.cache_dir(), &playback_config.clip_format);
        let extractor = FfmpegExtractor::on_path(
            &playback_config.clip_format,
            Duration::from_secs(playback_config.extract_timeout_secs),
        );

        Ok(draft::commands::play(&draft_path, index, &mut cache, &extractor).await?)
    }
}
