//! Main application component

use std::sync::Arc;

use dioxus::prelude::*;

use notemaker_core::config::BackendConfig;
use notemaker_core::{NoteListState, SyncMode};

use crate::services::NotesBackend;
use crate::state::{ready_to_load, AppState};
use crate::views::Home;

/// Root application component
#[component]
pub fn App() -> Element {
    // State signals
    let view = use_signal(NoteListState::default);
    let mut backend: Signal<Option<Arc<NotesBackend>>> = use_signal(|| None);
    let mut mode = use_signal(SyncMode::default);
    let mut load_error = use_signal(|| None::<String>);
    let notice = use_signal(|| None::<String>);
    let reload_version = use_signal(|| 0u64);
    let mut backend_initialized = use_signal(|| false);
    // Set once the push stream is open (or failed to open)
    let mut push_settled = use_signal(|| false);

    let mut state = use_context_provider(|| AppState {
        view,
        backend,
        mode,
        load_error,
        notice,
        reload_version,
    });

    // Resolve configuration and pick the backend (only once)
    use_effect(move || {
        if backend_initialized() {
            return;
        }
        backend_initialized.set(true); // Mark immediately to prevent double init

        let resolved = BackendConfig::from_env().and_then(|config| {
            let selected = NotesBackend::from_config(&config)?;
            Ok((config.mode, selected))
        });
        match resolved {
            Ok((sync_mode, selected)) => {
                tracing::info!("Sync mode: {}", sync_mode.as_str());
                mode.set(sync_mode);
                if selected.is_local() {
                    state.show_notice("No backend configured. Notes are kept in memory.");
                }
                backend.set(Some(Arc::new(selected)));
            }
            Err(error) => {
                tracing::error!("Failed to configure notes backend: {}", error);
                load_error.set(Some(error.to_string()));
            }
        }
    });

    // Initial load, and again on every retry. In subscription mode the push
    // stream opens first so no change falls between the two.
    use_effect(move || {
        let attempt = (state.reload_version)();
        if !ready_to_load(mode(), push_settled()) {
            return;
        }
        let Some(api) = state.api() else {
            return;
        };

        spawn(async move {
            match api.list_notes().await {
                Ok(notes) => {
                    tracing::info!("Loaded {} notes (attempt {})", notes.len(), attempt);
                    state.update(|current| current.with_notes(notes));
                    state.load_error.set(None);
                }
                Err(error) => {
                    tracing::error!("Failed to load notes: {}", error);
                    state.load_error.set(Some(error.user_notice()));
                }
            }
        });
    });

    // Push notifications drive the list in subscription mode
    use_effect(move || {
        if mode() != SyncMode::Subscription {
            return;
        }
        let Some(selected) = backend() else {
            return;
        };

        spawn(async move {
            let subscribed = selected.subscribe().await;
            push_settled.set(true);
            let mut events = match subscribed {
                Ok(events) => events,
                Err(error) => {
                    tracing::error!("Failed to subscribe to note events: {}", error);
                    state.show_notice(error.user_notice());
                    return;
                }
            };
            while let Some(event) = events.next().await {
                tracing::debug!("Applying pushed event for note {}", event.note_id());
                state.apply(&event);
            }
            tracing::warn!("Note event stream ended");
            state.show_notice("Live updates stopped. Reload to reconnect.");
        });
    });

    rsx! {
        div {
            class: "app-container",
            style: "
                min-height: 100vh;
                font-family: system-ui, -apple-system, sans-serif;
                background: #ffdfdf;
                color: #1f1f1f;
            ",
            Home {}
        }
    }
}
