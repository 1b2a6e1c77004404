/*!
 * Error types for the acolyte review engine.
 *
 * This module contains custom error types for the different layers of the
 * application, using the thiserror crate for ergonomic error definitions.
 * Construction-time variants abort a session; per-operation variants are
 * reported to the caller and leave in-memory state untouched.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while parsing subtitle-format text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubtitleError {
    /// A block did not start with a positive integer index
    #[error("Invalid subtitle index at line {line}: '{content}'")]
    InvalidIndex {
        /// 1-based line number
        line: usize,
        /// Offending line
        content: String,
    },

    /// The line after an index was not a valid timing line
    #[error("Invalid timing line at line {line}: '{content}'")]
    InvalidTiming {
        /// 1-based line number
        line: usize,
        /// Offending line
        content: String,
    },

    /// Timing where end is not after start
    #[error("Invalid time range for entry {index}: end {end_ms}ms <= start {start_ms}ms")]
    InvalidTimeRange {
        /// Entry index
        index: usize,
        /// Start offset in ms
        start_ms: u64,
        /// End offset in ms
        end_ms: u64,
    },

    /// Input ended in the middle of an entry header
    #[error("Unexpected end of input after entry {index}")]
    UnexpectedEof {
        /// Index of the truncated entry
        index: usize,
    },

    /// Two entries share an index in a sequence that requires uniqueness
    #[error("Duplicate subtitle index {index}")]
    DuplicateIndex {
        /// The repeated index
        index: usize,
    },
}

/// Errors from the playback boundary. All of them are non-fatal to a session.
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// No media file configured, or the configured file does not exist
    #[error("Media unavailable: {0}")]
    MediaUnavailable(String),

    /// Neither a supported player nor an extractor could be resolved
    #[error("No player available: {0}")]
    NoPlayerAvailable(String),

    /// The external tool could not be started
    #[error("Failed to launch {tool}: {source}")]
    SpawnFailed {
        /// Tool name
        tool: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The external tool ran but reported failure
    #[error("Clip extraction failed: {0}")]
    ExtractionFailed(String),

    /// The external tool exceeded the configured time bound
    #[error("Clip extraction timed out after {0} seconds")]
    Timeout(u64),

    /// The clip cache directory could not be prepared
    #[error("Failed to prepare clip cache at {path}: {source}")]
    CacheDirectory {
        /// Cache directory path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors from the alignment engine and its persistence backends
#[derive(Error, Debug)]
pub enum ReviewError {
    /// The authoritative original sequence could not be read or parsed
    #[error("Cannot read original subtitles at {path}: {reason}")]
    SourceUnreadable {
        /// Original file path
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// The original sequence parsed but contained no entries
    #[error("Original subtitles contain no entries")]
    EmptySource,

    /// A status record exists but cannot be trusted
    #[error("Status record at {path} is corrupt: {reason}")]
    StatusRecordCorrupt {
        /// Status file path
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// A draft document exists but does not match the expected layout
    #[error("Draft document at {path} is corrupt: {reason}")]
    DraftCorrupt {
        /// Draft file path
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// No entry carries the requested index
    #[error("No entry found with index {0}")]
    EntryNotFound(usize),

    /// A configuration command was issued without any field to change
    #[error("At least one of original language, target language or audio file must be given")]
    EmptyConfigUpdate,

    /// A single artifact could not be written; earlier artifacts are kept
    #[error("Failed to write {path}: {source}")]
    WriteFailure {
        /// Artifact path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Error from the playback boundary
    #[error(transparent)]
    Playback(#[from] PlaybackError),
}

impl ReviewError {
    /// Whether this error must abort the session instead of being reported
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ReviewError::SourceUnreadable { .. }
                | ReviewError::EmptySource
                | ReviewError::StatusRecordCorrupt { .. }
                | ReviewError::DraftCorrupt { .. }
        )
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from subtitle parsing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from the review engine
    #[error("Review error: {0}")]
    Review(#[from] ReviewError),

    /// Error from playback
    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
