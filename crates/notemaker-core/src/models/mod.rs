//! Data models for NoteMaker

mod note;
mod session;

pub use note::{Note, NoteId};
pub use session::{EditSession, SessionMode};
