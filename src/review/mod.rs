/*!
 * Alignment and review-state engine.
 *
 * This module handles:
 * - Merging original, translation and status sources into pairs
 * - Cursor navigation and in-place edits over those pairs
 * - Persisting the pairs through a backend-agnostic store
 */

pub mod alignment;
pub mod pair;
pub mod session;
pub mod split_store;
pub mod store;

pub use alignment::{merge_pairs, StatusRecord};
pub use pair::{ReviewStatus, SubtitlePair, ViewWindow};
pub use session::{ReviewProgress, ReviewSession};
pub use split_store::{SplitFileStore, DEFAULT_TRANSLATION_SUFFIX};
pub use store::ReviewStore;
