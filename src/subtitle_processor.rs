use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Result, Context, anyhow};
use log::{warn, debug};
use crate::errors::{ReviewError, SubtitleError};
use crate::file_utils::FileManager;

// @module: Subtitle parsing and composition

// @const: SRT timing line regex (trailing position data is ignored)
static TIMING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d{2}):(\d{2})[,.](\d{1,3})\s*-->\s*(\d+):(\d{2}):(\d{2})[,.](\d{1,3})(?:\s.*)?$").unwrap()
});

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    // @field: 1-based index, stable across original/translation/status
    pub index: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Subtitle text, may be empty
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry without validation
    pub fn new(index: usize, start_time_ms: u64, end_time_ms: u64, text: String) -> Self {
        SubtitleEntry {
            index,
            start_time_ms,
            end_time_ms,
            text,
        }
    }

    // @creates: Validated subtitle entry
    // @validates: Positive index and end after start
    pub fn new_validated(index: usize, start_time_ms: u64, end_time_ms: u64, text: String) -> Result<Self, SubtitleError> {
        if end_time_ms <= start_time_ms {
            return Err(SubtitleError::InvalidTimeRange {
                index,
                start_ms: start_time_ms,
                end_ms: end_time_ms,
            });
        }

        Ok(SubtitleEntry::new(index, start_time_ms, end_time_ms, text))
    }

    /// Parse an SRT timestamp (HH:MM:SS,mmm) to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64> {
        let parts: Vec<&str> = timestamp.trim().split(&[':', ',', '.'][..]).collect();

        if parts.len() != 4 {
            return Err(anyhow!("Invalid timestamp format: {}", timestamp));
        }

        let hours: u64 = parts[0].parse().context("Failed to parse hours")?;
        let minutes: u64 = parts[1].parse().context("Failed to parse minutes")?;
        let seconds: u64 = parts[2].parse().context("Failed to parse seconds")?;
        let millis = parse_millis(parts[3]).context("Failed to parse milliseconds")?;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(anyhow!("Invalid time components in timestamp: {}", timestamp));
        }

        timestamp_ms(hours, minutes, seconds, millis)
            .ok_or_else(|| anyhow!("Timestamp out of range: {}", timestamp))
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_time_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_time_ms)
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }

    /// Start offset in seconds
    pub fn start_seconds(&self) -> f64 {
        self.start_time_ms as f64 / 1000.0
    }

    /// End offset in seconds
    pub fn end_seconds(&self) -> f64 {
        self.end_time_ms as f64 / 1000.0
    }

    /// Text as it is written to disk: trailing whitespace and blank lines removed,
    /// since a blank line would terminate the block.
    pub fn normalized_text(&self) -> String {
        self.text
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        let text = self.normalized_text();
        if !text.is_empty() {
            writeln!(f, "{}", text)?;
        }
        writeln!(f)
    }
}

/// Millisecond field, right-padded so that ",5" reads as 500ms
fn parse_millis(raw: &str) -> Result<u64> {
    if raw.is_empty() || raw.len() > 3 {
        return Err(anyhow!("Invalid millisecond field: {}", raw));
    }
    let padded = format!("{:0<3}", raw);
    Ok(padded.parse()?)
}

/// Millisecond offset of a timestamp, or None when it does not fit in u64
fn timestamp_ms(hours: u64, minutes: u64, seconds: u64, millis: u64) -> Option<u64> {
    hours
        .checked_mul(3_600_000)?
        .checked_add(minutes * 60_000 + seconds * 1_000 + millis)
}

/// Collection of subtitle entries read from (or destined for) one file
#[derive(Debug, Clone)]
pub struct SubtitleCollection {
    /// Source filename
    pub source_file: PathBuf,

    /// List of subtitle entries, in file order
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleCollection {
    /// Create a new, empty subtitle collection
    pub fn new(source_file: PathBuf) -> Self {
        SubtitleCollection {
            source_file,
            entries: Vec::new(),
        }
    }

    /// Read a sequence that must exist. Any failure is fatal to the caller.
    pub fn load_required<P: AsRef<Path>>(path: P) -> Result<Self, ReviewError> {
        let path = path.as_ref();
        let unreadable = |reason: String| ReviewError::SourceUnreadable {
            path: path.to_path_buf(),
            reason,
        };

        let content = FileManager::read_to_string(path).map_err(|e| unreadable(format!("{:#}", e)))?;
        let entries = Self::parse_srt_string(&content).map_err(|e| unreadable(e.to_string()))?;

        let mut seen = HashSet::with_capacity(entries.len());
        if let Some(duplicate) = entries.iter().find(|e| !seen.insert(e.index)) {
            return Err(unreadable(SubtitleError::DuplicateIndex { index: duplicate.index }.to_string()));
        }

        debug!("Loaded {} entries from {}", entries.len(), path.display());

        Ok(SubtitleCollection {
            source_file: path.to_path_buf(),
            entries,
        })
    }

    /// Read a sequence that may be absent. Missing, unreadable and unparseable
    /// files all yield an empty collection.
    pub fn load_optional<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let mut collection = SubtitleCollection::new(path.to_path_buf());

        if !FileManager::file_exists(path) {
            debug!("No subtitle file at {}, starting empty", path.display());
            return collection;
        }

        match FileManager::read_to_string(path) {
            Ok(content) => match Self::parse_srt_string(&content) {
                Ok(entries) => collection.entries = entries,
                Err(e) => warn!("Ignoring unparseable subtitle file {}: {}", path.display(), e),
            },
            Err(e) => warn!("Ignoring unreadable subtitle file {}: {:#}", path.display(), e),
        }

        collection
    }

    /// Compose entries back into SRT text, preserving indices and order
    pub fn compose(entries: &[SubtitleEntry]) -> String {
        entries.iter().map(|entry| entry.to_string()).collect()
    }

    /// Parse SRT format string into subtitle entries.
    ///
    /// Parsing is strict: the first malformed block aborts with a line-numbered
    /// error. Entries keep their file order and their own indices, and a block
    /// with no text lines becomes an entry with empty text.
    pub fn parse_srt_string(content: &str) -> Result<Vec<SubtitleEntry>, SubtitleError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut entries = Vec::new();
        let mut lines = content.lines().enumerate().peekable();

        loop {
            // Skip separators between blocks
            while lines.peek().is_some_and(|(_, line)| line.trim().is_empty()) {
                lines.next();
            }

            let Some((line_no, index_line)) = lines.next() else {
                break;
            };

            let index = index_line
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|index| *index > 0)
                .ok_or_else(|| SubtitleError::InvalidIndex {
                    line: line_no + 1,
                    content: index_line.to_string(),
                })?;

            let Some((timing_no, timing_line)) = lines.next() else {
                return Err(SubtitleError::UnexpectedEof { index });
            };

            let (start_ms, end_ms) = Self::parse_timing_line(timing_line).ok_or_else(|| {
                SubtitleError::InvalidTiming {
                    line: timing_no + 1,
                    content: timing_line.to_string(),
                }
            })?;

            let mut text_lines: Vec<&str> = Vec::new();
            while let Some(&(_, line)) = lines.peek() {
                if line.trim().is_empty() {
                    break;
                }
                text_lines.push(line.trim_end());
                lines.next();
            }

            entries.push(SubtitleEntry::new_validated(index, start_ms, end_ms, text_lines.join("\n"))?);
        }

        Ok(entries)
    }

    /// Parse a "start --> end" line into millisecond offsets
    fn parse_timing_line(line: &str) -> Option<(u64, u64)> {
        let caps = TIMING_REGEX.captures(line.trim())?;
        let field = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or_default();

        let to_ms = |base: usize| -> Option<u64> {
            let hours: u64 = field(base).parse().ok()?;
            let minutes: u64 = field(base + 1).parse().ok()?;
            let seconds: u64 = field(base + 2).parse().ok()?;
            let millis = parse_millis(field(base + 3)).ok()?;
            if minutes >= 60 || seconds >= 60 {
                return None;
            }
            timestamp_ms(hours, minutes, seconds, millis)
        };

        Some((to_ms(1)?, to_ms(5)?))
    }
}

impl fmt::Display for SubtitleCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Collection")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        Ok(())
    }
}
