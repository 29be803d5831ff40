use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] notemaker_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No note text provided")]
    EmptyContent,
    #[error("Note ID cannot be empty")]
    EmptyNoteId,
    #[error("Note not found: {0}")]
    NoteNotFound(String),
    #[error(
        "No backend configured. Set NOTEMAKER_GRAPHQL_URL or add graphql_url to {}.",
        .0.display()
    )]
    NotConfigured(PathBuf),
    #[error("Timed out waiting for the backend to confirm the change")]
    PushTimeout,
    #[error("Live updates ended")]
    StreamEnded,
}
