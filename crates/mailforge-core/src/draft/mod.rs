//! Draft persistence for in-progress documents.
//!
//! While a document is being edited it is snapshotted to a keyed store:
//! periodically while it is non-empty, and once after every burst of edits
//! settles. Starting a session restores the owner's draft; sending deletes
//! it.

mod autosave;
mod model;
mod repository;
mod session;

pub use autosave::{AutosaveConfig, Autosaver, MIN_AUTOSAVE_INTERVAL};
pub use model::{Draft, DraftKey};
pub use repository::DraftRepository;
pub use session::EditorSession;
