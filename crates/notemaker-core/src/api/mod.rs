//! Remote notes API.
//!
//! `NotesApi` is the seam between list reconciliation and whatever backend
//! holds the notes: the managed GraphQL service or the in-process backend.

mod documents;
mod graphql;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Note, NoteId};

pub use documents::{
    CREATE_NOTE, DELETE_NOTE, LIST_NOTES, ON_CREATE_NOTE, ON_DELETE_NOTE, ON_UPDATE_NOTE,
    UPDATE_NOTE,
};
pub use graphql::{parse_graphql_response, GraphQlNotesClient};

/// Create/read/update/delete operations exposed by the notes backend.
#[async_trait]
pub trait NotesApi: Send + Sync {
    /// Fetch the whole collection, in backend order.
    async fn list_notes(&self) -> Result<Vec<Note>>;

    /// Create a note; the backend assigns the id.
    async fn create_note(&self, text: &str) -> Result<Note>;

    async fn update_note(&self, id: &NoteId, text: &str) -> Result<Note>;

    /// Delete a note, returning the id the backend confirmed.
    async fn delete_note(&self, id: &NoteId) -> Result<NoteId>;
}

#[async_trait]
impl<T: NotesApi + ?Sized> NotesApi for Arc<T> {
    async fn list_notes(&self) -> Result<Vec<Note>> {
        (**self).list_notes().await
    }

    async fn create_note(&self, text: &str) -> Result<Note> {
        (**self).create_note(text).await
    }

    async fn update_note(&self, id: &NoteId, text: &str) -> Result<Note> {
        (**self).update_note(id, text).await
    }

    async fn delete_note(&self, id: &NoteId) -> Result<NoteId> {
        (**self).delete_note(id).await
    }
}
