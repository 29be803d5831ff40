//! Edit session model

use super::{Note, NoteId};

/// Whether the form composes a new note or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Composing,
    Editing,
}

/// Ephemeral form state: which note is being edited, and the draft text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSession {
    /// Note being edited, `None` while composing a new note
    pub editing_id: Option<NoteId>,
    /// Current form text
    pub draft_text: String,
}

impl EditSession {
    /// Start editing `note`, copying its id and text into the form.
    #[must_use]
    pub fn editing(note: &Note) -> Self {
        Self {
            editing_id: Some(note.id.clone()),
            draft_text: note.text.clone(),
        }
    }

    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    #[must_use]
    pub const fn mode(&self) -> SessionMode {
        if self.is_editing() {
            SessionMode::Editing
        } else {
            SessionMode::Composing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_session_is_composing() {
        let session = EditSession::default();
        assert_eq!(session.mode(), SessionMode::Composing);
        assert!(session.draft_text.is_empty());
    }

    #[test]
    fn editing_copies_note_fields() {
        let note = Note::new("9", "draft me");
        let session = EditSession::editing(&note);
        assert_eq!(session.mode(), SessionMode::Editing);
        assert_eq!(session.editing_id, Some(NoteId::new("9")));
        assert_eq!(session.draft_text, "draft me");
    }
}
