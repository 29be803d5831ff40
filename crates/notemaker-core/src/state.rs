//! Note list state and its reducer.
//!
//! `NoteListState` is an owned value. Every change is a `&self -> Self`
//! transform, so the merge rules can be exercised without any UI runtime.

use std::collections::HashSet;

use crate::models::{EditSession, Note, NoteId};

/// How list state follows remote mutations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncMode {
    /// Apply the mutation result as soon as the call returns.
    #[default]
    Direct,
    /// Leave list state to the push channel.
    Subscription,
}

impl SyncMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Subscription => "subscription",
        }
    }
}

impl std::str::FromStr for SyncMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "direct" | "polling" => Ok(Self::Direct),
            "subscription" | "realtime" => Ok(Self::Subscription),
            other => Err(format!(
                "unknown sync mode '{other}' (expected 'direct' or 'subscription')"
            )),
        }
    }
}

/// A confirmed remote change, from a mutation result or a push notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteEvent {
    Created(Note),
    Updated(Note),
    Deleted(NoteId),
}

impl NoteEvent {
    pub const fn note_id(&self) -> &NoteId {
        match self {
            Self::Created(note) | Self::Updated(note) => &note.id,
            Self::Deleted(id) => id,
        }
    }
}

/// The remote call a form submission turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRequest {
    Create { text: String },
    Update { id: NoteId, text: String },
}

/// Locally held notes plus the form session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteListState {
    pub notes: Vec<Note>,
    pub session: EditSession,
}

impl NoteListState {
    /// Replace the collection with a freshly listed one.
    ///
    /// Repeated ids keep their first occurrence.
    #[must_use]
    pub fn with_notes(&self, items: Vec<Note>) -> Self {
        let mut seen = HashSet::with_capacity(items.len());
        let notes = items
            .into_iter()
            .filter(|note| seen.insert(note.id.clone()))
            .collect();
        Self {
            notes,
            session: self.session.clone(),
        }
    }

    /// Merge one confirmed change into the list.
    #[must_use]
    pub fn apply(&self, event: &NoteEvent) -> Self {
        match event {
            NoteEvent::Created(created) => {
                let notes = if self.find(&created.id).is_some() {
                    self.replaced(created)
                } else {
                    std::iter::once(created.clone())
                        .chain(self.notes.iter().cloned())
                        .collect()
                };
                Self {
                    notes,
                    session: EditSession::default(),
                }
            }
            NoteEvent::Updated(updated) => Self {
                notes: self.replaced(updated),
                session: EditSession::default(),
            },
            NoteEvent::Deleted(id) => Self {
                notes: self
                    .notes
                    .iter()
                    .filter(|note| &note.id != id)
                    .cloned()
                    .collect(),
                session: self.session.clone(),
            },
        }
    }

    /// Load `note` into the form for editing.
    #[must_use]
    pub fn select_for_edit(&self, note: &Note) -> Self {
        Self {
            notes: self.notes.clone(),
            session: EditSession::editing(note),
        }
    }

    /// Replace the draft text, keeping the edit target.
    #[must_use]
    pub fn with_draft(&self, text: impl Into<String>) -> Self {
        Self {
            notes: self.notes.clone(),
            session: EditSession {
                editing_id: self.session.editing_id.clone(),
                draft_text: text.into(),
            },
        }
    }

    /// Back to composing a new, empty note.
    #[must_use]
    pub fn cleared_session(&self) -> Self {
        Self {
            notes: self.notes.clone(),
            session: EditSession::default(),
        }
    }

    /// The remote call the current form would submit.
    pub fn submit_request(&self) -> SubmitRequest {
        let text = self.session.draft_text.clone();
        match &self.session.editing_id {
            Some(id) => SubmitRequest::Update {
                id: id.clone(),
                text,
            },
            None => SubmitRequest::Create { text },
        }
    }

    pub fn find(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| &note.id == id)
    }

    fn replaced(&self, incoming: &Note) -> Vec<Note> {
        self.notes
            .iter()
            .map(|note| {
                if note.id == incoming.id {
                    incoming.clone()
                } else {
                    note.clone()
                }
            })
            .collect()
    }
}
