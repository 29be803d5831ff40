//! In-process notes backend.
//!
//! Behaves like the managed service: it assigns ids, lists newest first, and
//! pushes every confirmed mutation to all subscribers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::api::NotesApi;
use crate::error::{Error, Result};
use crate::models::{Note, NoteId};
use crate::realtime::NoteEventStream;
use crate::state::NoteEvent;

#[derive(Debug, Default)]
struct Store {
    /// Newest first
    notes: Vec<Note>,
    last_id: u64,
    subscribers: Vec<mpsc::UnboundedSender<NoteEvent>>,
}

impl Store {
    fn next_id(&mut self) -> NoteId {
        self.last_id += 1;
        NoteId::new(self.last_id.to_string())
    }

    fn publish(&mut self, event: &NoteEvent) {
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }
}

#[derive(Debug, Default)]
pub struct InMemoryNotesApi {
    store: Mutex<Store>,
    offline: AtomicBool,
}

impl InMemoryNotesApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with existing notes, listed in the given order.
    ///
    /// Ids assigned afterwards continue after the largest numeric seeded id.
    pub fn with_notes(notes: Vec<Note>) -> Self {
        let last_id = notes
            .iter()
            .filter_map(|note| note.id.as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self {
            store: Mutex::new(Store {
                notes,
                last_id,
                subscribers: Vec::new(),
            }),
            offline: AtomicBool::new(false),
        }
    }

    /// Receive every subsequent mutation as a push notification.
    pub fn subscribe(&self) -> NoteEventStream {
        let (tx, stream) = NoteEventStream::channel();
        self.lock().subscribers.push(tx);
        stream
    }

    /// Make every call fail as if the network were down.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Current backend contents, newest first.
    pub fn snapshot(&self) -> Vec<Note> {
        self.lock().notes.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(Error::Unreachable("in-memory backend is offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl NotesApi for InMemoryNotesApi {
    async fn list_notes(&self) -> Result<Vec<Note>> {
        self.ensure_online()?;
        Ok(self.snapshot())
    }

    async fn create_note(&self, text: &str) -> Result<Note> {
        self.ensure_online()?;
        let mut store = self.lock();
        let note = Note {
            id: store.next_id(),
            text: text.to_string(),
        };
        store.notes.insert(0, note.clone());
        store.publish(&NoteEvent::Created(note.clone()));
        tracing::debug!("In-memory backend created note {}", note.id);
        Ok(note)
    }

    async fn update_note(&self, id: &NoteId, text: &str) -> Result<Note> {
        self.ensure_online()?;
        let mut store = self.lock();
        let entry = store
            .notes
            .iter_mut()
            .find(|note| &note.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        entry.text = text.to_string();
        let note = entry.clone();
        store.publish(&NoteEvent::Updated(note.clone()));
        Ok(note)
    }

    async fn delete_note(&self, id: &NoteId) -> Result<NoteId> {
        self.ensure_online()?;
        let mut store = self.lock();
        let position = store
            .notes
            .iter()
            .position(|note| &note.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        let removed = store.notes.remove(position);
        store.publish(&NoteEvent::Deleted(removed.id.clone()));
        Ok(removed.id)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::FailureKind;

    #[tokio::test(flavor = "current_thread")]
    async fn assigns_sequential_ids_after_seed() {
        let api = InMemoryNotesApi::with_notes(vec![Note::new("1", "a"), Note::new("2", "b")]);
        let created = api.create_note("c").await.unwrap();
        assert_eq!(created, Note::new("3", "c"));
        assert_eq!(
            api.list_notes().await.unwrap(),
            vec![Note::new("3", "c"), Note::new("1", "a"), Note::new("2", "b")]
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn sparse_seed_ids_are_never_reused() {
        let api = InMemoryNotesApi::with_notes(vec![Note::new("2", "b")]);
        let created = api.create_note("x").await.unwrap();
        assert_eq!(created.id, NoteId::new("3"));

        let api = InMemoryNotesApi::with_notes(vec![Note::new("note-a", "a"), Note::new("1", "b")]);
        let first = api.create_note("x").await.unwrap();
        let second = api.create_note("y").await.unwrap();
        assert_eq!(first.id, NoteId::new("2"));
        assert_eq!(second.id, NoteId::new("3"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn unknown_ids_are_not_found() {
        let api = InMemoryNotesApi::new();
        let update = api.update_note(&NoteId::new("7"), "x").await.unwrap_err();
        assert_eq!(update.kind(), FailureKind::NotFound);
        let delete = api.delete_note(&NoteId::new("7")).await.unwrap_err();
        assert_eq!(delete.kind(), FailureKind::NotFound);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn subscribers_receive_every_mutation() {
        let api = InMemoryNotesApi::new();
        let mut first = api.subscribe();
        let mut second = api.subscribe();

        let note = api.create_note("hello").await.unwrap();
        api.update_note(&note.id, "hello again").await.unwrap();
        api.delete_note(&note.id).await.unwrap();

        for stream in [&mut first, &mut second] {
            assert_eq!(stream.try_next(), Some(NoteEvent::Created(note.clone())));
            assert_eq!(
                stream.try_next(),
                Some(NoteEvent::Updated(Note::new(note.id.clone(), "hello again")))
            );
            assert_eq!(stream.try_next(), Some(NoteEvent::Deleted(note.id.clone())));
            assert_eq!(stream.try_next(), None);
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn dropped_subscribers_are_pruned() {
        let api = InMemoryNotesApi::new();
        drop(api.subscribe());
        api.create_note("x").await.unwrap();
        assert!(api.lock().subscribers.is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn offline_backend_is_unreachable() {
        let api = InMemoryNotesApi::new();
        api.set_offline(true);
        let error = api.list_notes().await.unwrap_err();
        assert_eq!(error.kind(), FailureKind::NetworkUnreachable);
        api.set_offline(false);
        assert!(api.list_notes().await.unwrap().is_empty());
    }
}
