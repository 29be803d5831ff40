//! notemaker-core - Core library for NoteMaker
//!
//! This crate contains the note models, the list reconciliation reducer, the
//! remote GraphQL client, and the realtime subscription client shared by the
//! desktop app and the CLI.

pub mod api;
pub mod config;
pub mod error;
pub mod memory;
pub mod models;
pub mod realtime;
pub mod state;
pub mod util;
pub mod view;

pub use error::{Error, FailureKind, Result};
pub use models::{EditSession, Note, NoteId, SessionMode};
pub use state::{NoteEvent, NoteListState, SubmitRequest, SyncMode};
pub use view::{Confirmed, NoteListView};
