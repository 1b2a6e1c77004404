/*!
 * Composite draft workflow: one JSON document per subtitle file.
 */

pub mod commands;
pub mod model;
pub mod store;

pub use commands::{CommandOutcome, DraftAction};
pub use model::{DraftConfigUpdate, DraftDocument, DraftEntry, DraftMetadata};
pub use store::DraftStore;
