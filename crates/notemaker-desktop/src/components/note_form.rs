//! Note form component

use dioxus::prelude::*;

use notemaker_core::view::perform_submit;
use notemaker_core::NoteListState;

use crate::state::AppState;

/// Text input that creates a note, or modifies the selected one
#[component]
pub fn NoteForm() -> Element {
    let mut state = use_context::<AppState>();
    let session = state.view.read().session.clone();
    let is_editing = session.is_editing();
    let mut is_saving = use_signal(|| false);

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        if is_saving() {
            return;
        }
        let Some(api) = state.api() else {
            return;
        };
        let request = state.view.read().submit_request();
        let mode = (state.mode)();

        is_saving.set(true);
        spawn(async move {
            match perform_submit(api.as_ref(), mode, &request).await {
                Ok(confirmed) => {
                    tracing::info!("Saved note {}", confirmed.value.id);
                    // Subscription mode waits for the push instead
                    if let Some(event) = &confirmed.local_event {
                        state.apply(event);
                    }
                }
                Err(error) => {
                    // Draft and edit target stay as they were
                    tracing::error!("Failed to save note: {}", error);
                    state.show_notice(error.user_notice());
                }
            }
            is_saving.set(false);
        });
    };

    let cancel_edit = move |_| {
        state.update(NoteListState::cleared_session);
    };

    rsx! {
        form {
            class: "note-form",
            style: "display: flex; gap: 8px; margin-bottom: 16px;",
            onsubmit: submit,

            input {
                r#type: "text",
                class: "input",
                style: "
                    padding: 8px;
                    font-size: 1.1rem;
                    min-width: 260px;
                    border: 1px solid #c9c9c9;
                    border-radius: 4px;
                ",
                placeholder: "Write your note!",
                value: "{session.draft_text}",
                autofocus: true,
                oninput: move |evt| {
                    let text = evt.value();
                    state.update(|current| current.with_draft(text));
                },
            }

            button {
                r#type: "submit",
                style: "padding: 8px 12px; font-size: 1.1rem; cursor: pointer;",
                disabled: is_saving(),
                if is_editing { "Modify" } else { "Add Note" }
            }

            if is_editing {
                button {
                    r#type: "button",
                    style: "padding: 8px 12px; font-size: 1.1rem; cursor: pointer;",
                    onclick: cancel_edit,
                    "Cancel"
                }
            }
        }
    }
}
