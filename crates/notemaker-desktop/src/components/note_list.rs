//! Note list component

use dioxus::prelude::*;

use super::NoteCard;
use crate::state::AppState;

/// Preview length for a single row
const PREVIEW_LEN: usize = 60;

/// List of notes, newest first
#[component]
pub fn NoteList() -> Element {
    let state = use_context::<AppState>();
    let view = state.view.read();
    let editing_id = view.session.editing_id.clone();

    rsx! {
        ul {
            class: "note-list",
            style: "
                list-style: none;
                padding: 0;
                margin: 0;
                width: 100%;
                max-width: 420px;
            ",

            if view.notes.is_empty() {
                li {
                    style: "
                        padding: 20px;
                        text-align: center;
                        color: #7a6a6a;
                    ",
                    "No notes yet"
                }
            } else {
                for note in view.notes.iter().cloned() {
                    {
                        let is_selected = editing_id.as_ref() == Some(&note.id);
                        let preview = note.preview(PREVIEW_LEN);
                        let note_key = note.id.clone();

                        rsx! {
                            NoteCard {
                                key: "{note_key}",
                                note,
                                preview,
                                is_selected,
                            }
                        }
                    }
                }
            }
        }
    }
}
