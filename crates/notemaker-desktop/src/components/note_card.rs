//! Note card component

use dioxus::prelude::*;

use notemaker_core::view::perform_delete;
use notemaker_core::Note;

use crate::state::AppState;

/// A single note row. Clicking the text selects it for editing.
#[component]
pub fn NoteCard(note: Note, preview: String, is_selected: bool) -> Element {
    let mut state = use_context::<AppState>();
    let mut is_deleting = use_signal(|| false);

    let border_left = if is_selected {
        "3px solid #c0392b"
    } else {
        "3px solid transparent"
    };
    let bg = if is_selected { "#fff3f3" } else { "#ffffff" };

    let select_note = note.clone();
    let delete_id = note.id.clone();

    rsx! {
        li {
            class: if is_selected { "note-item selected" } else { "note-item" },
            style: "
                display: flex;
                align-items: center;
                justify-content: space-between;
                margin-bottom: 6px;
                padding: 10px 12px;
                border-radius: 4px;
                border-left: {border_left};
                background: {bg};
                box-shadow: 0 1px 2px rgba(0, 0, 0, 0.08);
            ",

            span {
                class: "note-text",
                style: "
                    flex: 1;
                    cursor: pointer;
                    overflow: hidden;
                    text-overflow: ellipsis;
                    white-space: nowrap;
                ",
                title: "{note.text}",
                onclick: move |_| {
                    state.update(|current| current.select_for_edit(&select_note));
                },
                "{preview}"
            }

            button {
                class: "note-delete",
                style: "
                    margin-left: 12px;
                    border: none;
                    background: transparent;
                    font-size: 1.2rem;
                    cursor: pointer;
                    color: #9b2c2c;
                ",
                title: "Delete note",
                disabled: is_deleting(),
                onclick: move |_| {
                    let Some(api) = state.api() else {
                        return;
                    };
                    let id = delete_id.clone();
                    let mode = (state.mode)();

                    is_deleting.set(true);
                    spawn(async move {
                        match perform_delete(api.as_ref(), mode, &id).await {
                            Ok(confirmed) => {
                                tracing::info!("Deleted note {}", confirmed.value);
                                if let Some(event) = &confirmed.local_event {
                                    state.apply(event);
                                }
                            }
                            Err(error) => {
                                tracing::error!("Failed to delete note {}: {}", id, error);
                                state.show_notice(error.user_notice());
                            }
                        }
                        is_deleting.set(false);
                    });
                },
                "×"
            }
        }
    }
}
