//! Note list view controller.
//!
//! `perform_submit` and `perform_delete` are the remote effects shared by
//! every front end. Both hand back what the backend confirmed. `NoteListView`
//! pairs them with an owned `NoteListState` for front ends that drive the
//! flow sequentially.


use crate::api::NotesApi;
use crate::error::Result;
use crate::models::{EditSession, Note, NoteId};
use crate::state::{NoteEvent, NoteListState, SubmitRequest, SyncMode};

/// A mutation the backend accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmed<T> {
    /// What the backend returned: the stored note, or the deleted id
    pub value: T,
    /// Event to apply to local state now. `None` in `Subscription` mode,
    /// where the push channel delivers it instead.
    pub local_event: Option<NoteEvent>,
}

impl<T> Confirmed<T> {
    fn new(mode: SyncMode, value: T, event: NoteEvent) -> Self {
        let local_event = match mode {
            SyncMode::Direct => Some(event),
            SyncMode::Subscription => None,
        };
        Self { value, local_event }
    }
}

/// Run a submit against the backend.
pub async fn perform_submit<A: NotesApi + ?Sized>(
    api: &A,
    mode: SyncMode,
    request: &SubmitRequest,
) -> Result<Confirmed<Note>> {
    Ok(match request {
        SubmitRequest::Create { text } => {
            let note = api.create_note(text).await?;
            Confirmed::new(mode, note.clone(), NoteEvent::Created(note))
        }
        SubmitRequest::Update { id, text } => {
            let note = api.update_note(id, text).await?;
            Confirmed::new(mode, note.clone(), NoteEvent::Updated(note))
        }
    })
}

/// Run a delete against the backend.
pub async fn perform_delete<A: NotesApi + ?Sized>(
    api: &A,
    mode: SyncMode,
    id: &NoteId,
) -> Result<Confirmed<NoteId>> {
    let deleted = api.delete_note(id).await?;
    Ok(Confirmed::new(mode, deleted.clone(), NoteEvent::Deleted(deleted)))
}

/// Owned list state bound to a backend.
#[derive(Debug)]
pub struct NoteListView<A> {
    api: A,
    mode: SyncMode,
    state: NoteListState,
}

impl<A: NotesApi> NoteListView<A> {
    pub fn new(api: A, mode: SyncMode) -> Self {
        Self {
            api,
            mode,
            state: NoteListState::default(),
        }
    }

    pub const fn mode(&self) -> SyncMode {
        self.mode
    }

    pub const fn state(&self) -> &NoteListState {
        &self.state
    }

    pub fn notes(&self) -> &[Note] {
        &self.state.notes
    }

    pub const fn session(&self) -> &EditSession {
        &self.state.session
    }

    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Load the full collection. On failure the collection is left as it was.
    pub async fn initialize(&mut self) -> Result<()> {
        let notes = self.api.list_notes().await?;
        tracing::debug!("Loaded {} notes", notes.len());
        self.state = self.state.with_notes(notes);
        Ok(())
    }

    /// Merge one pushed or confirmed change.
    pub fn on_event(&mut self, event: &NoteEvent) {
        self.state = self.state.apply(event);
    }

    pub fn select_for_edit(&mut self, note: &Note) {
        self.state = self.state.select_for_edit(note);
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.state = self.state.with_draft(text);
    }

    /// Create or update from the form and return the note the backend stored.
    ///
    /// In `Subscription` mode local state is left for the push to update.
    /// On failure the session and list are untouched, so the draft survives
    /// for another attempt.
    pub async fn submit(&mut self) -> Result<Note> {
        let request = self.state.submit_request();
        let confirmed = perform_submit(&self.api, self.mode, &request).await?;
        if let Some(event) = &confirmed.local_event {
            self.on_event(event);
        }
        Ok(confirmed.value)
    }

    /// Delete `note` and return the id the backend confirmed. On failure it
    /// stays in the list.
    pub async fn delete_note(&mut self, note: &Note) -> Result<NoteId> {
        let confirmed = perform_delete(&self.api, self.mode, &note.id).await?;
        if let Some(event) = &confirmed.local_event {
            self.on_event(event);
        }
        Ok(confirmed.value)
    }
}
