/*!
 * # Acolyte - subtitle translation review
 *
 * A Rust library for reviewing subtitle translations side by side.
 *
 * ## Features
 *
 * - Strict, lossless SRT parsing and writing
 * - Alignment of an original and a translated subtitle file by index
 * - Per-entry verified/unverified review state
 * - Cursor-based review sessions with a previous/current/next window
 * - Two persistence layouts: split files (original, translation, status)
 *   or a single JSON draft document
 * - Draft commands (translate, fix, config, status toggle, export)
 * - Best-effort media playback and cached clip extraction
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: SRT parsing and composition
 * - `review`: Alignment and review-state engine:
 *   - `review::alignment`: Merging sources into pairs
 *   - `review::session`: Cursor, window and edits
 *   - `review::store`: Backend trait, with `review::split_store` for split files
 * - `draft`: JSON draft document, its backend and one-shot commands
 * - `playback`: Player launch and clip extraction with a cache
 * - `file_utils`: File system operations and derived paths
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod draft;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod playback;
pub mod review;
pub mod subtitle_processor;

// Re-export main types for easier usage
pub use app_config::Config;
pub use draft::{DraftDocument, DraftStore};
pub use errors::{AppError, PlaybackError, ReviewError, SubtitleError};
pub use review::{merge_pairs, ReviewSession, ReviewStatus, ReviewStore, SplitFileStore, SubtitlePair};
pub use subtitle_processor::{SubtitleCollection, SubtitleEntry};
