//! Application state management
//!
//! Global state accessible via Dioxus context providers.

use std::sync::Arc;
use std::time::Duration;

use dioxus::prelude::*;

use notemaker_core::api::NotesApi;
use notemaker_core::{NoteEvent, NoteListState, SyncMode};

use crate::services::NotesBackend;

/// How long a transient notice stays visible
const NOTICE_SECS: u64 = 4;

/// Whether the list query may run.
///
/// Subscription mode waits for the push stream, so a change made between the
/// query and the subscription is still delivered.
pub const fn ready_to_load(mode: SyncMode, push_settled: bool) -> bool {
    match mode {
        SyncMode::Direct => true,
        SyncMode::Subscription => push_settled,
    }
}

/// Global application state
#[derive(Clone, Copy)]
pub struct AppState {
    /// Notes and the form session
    pub view: Signal<NoteListState>,
    /// Backend, once configuration has been resolved
    pub backend: Signal<Option<Arc<NotesBackend>>>,
    /// Direct or subscription-driven list updates
    pub mode: Signal<SyncMode>,
    /// Last list-load failure, shown with a retry button
    pub load_error: Signal<Option<String>>,
    /// Transient failure notice
    pub notice: Signal<Option<String>>,
    /// Bumped to re-run the list query
    pub reload_version: Signal<u64>,
}

impl AppState {
    pub fn api(&self) -> Option<Arc<dyn NotesApi>> {
        self.backend.read().as_ref().map(|backend| backend.api())
    }

    /// Replace list state with `transform(current)`.
    pub fn update(&mut self, transform: impl FnOnce(&NoteListState) -> NoteListState) {
        let next = transform(&self.view.read());
        self.view.set(next);
    }

    /// Merge a confirmed change into the list.
    pub fn apply(&mut self, event: &NoteEvent) {
        self.update(|state| state.apply(event));
    }

    /// Show `message` for a few seconds.
    pub fn show_notice(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.notice.set(Some(message.clone()));

        let mut notice = self.notice;
        spawn(async move {
            tokio::time::sleep(Duration::from_secs(NOTICE_SECS)).await;
            if notice.read().as_deref() == Some(message.as_str()) {
                notice.set(None);
            }
        });
    }

    pub fn retry_load(&mut self) {
        self.load_error.set(None);
        *self.reload_version.write() += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_mode_loads_immediately() {
        assert!(ready_to_load(SyncMode::Direct, false));
    }

    #[test]
    fn subscription_mode_loads_after_push_stream() {
        assert!(!ready_to_load(SyncMode::Subscription, false));
        assert!(ready_to_load(SyncMode::Subscription, true));
    }
}
