use std::env;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use notemaker_core::api::{GraphQlNotesClient, NotesApi};
use notemaker_core::config::BackendConfig;
use notemaker_core::realtime::{NoteEventStream, SubscriptionClient};
use notemaker_core::{Note, NoteEvent, NoteId, NoteListView, SyncMode};
use serde::Serialize;

use crate::error::CliError;

/// Overrides the config file location
pub const CONFIG_PATH_ENV: &str = "NOTEMAKER_CONFIG";

/// How long a mutation waits for its push confirmation in subscription mode
pub const PUSH_TIMEOUT: Duration = Duration::from_secs(10);

const PREVIEW_LEN: usize = 60;

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub backend: BackendConfig,
    pub path: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct NoteListItem {
    pub id: String,
    pub note: String,
    pub preview: String,
}

/// A loaded note list, plus the push channel when running in subscription mode.
pub struct Session<A> {
    pub view: NoteListView<A>,
    events: Option<NoteEventStream>,
}

impl<A: NotesApi> Session<A> {
    pub const fn new(view: NoteListView<A>, events: Option<NoteEventStream>) -> Self {
        Self { view, events }
    }

    pub fn require(&self, id: &NoteId) -> Result<Note, CliError> {
        self.view
            .state()
            .find(id)
            .cloned()
            .ok_or_else(|| CliError::NoteNotFound(id.to_string()))
    }

    /// Apply pushed events until one satisfies `confirms`.
    ///
    /// Returns immediately without a push channel, since direct mode has
    /// already applied the mutation result.
    pub async fn settle(
        &mut self,
        timeout: Duration,
        confirms: impl Fn(&NoteEvent) -> bool,
    ) -> Result<(), CliError> {
        let Some(events) = self.events.as_mut() else {
            return Ok(());
        };
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            let event = tokio::time::timeout_at(deadline, events.next())
                .await
                .map_err(|_| CliError::PushTimeout)?
                .ok_or(CliError::StreamEnded)?;
            tracing::debug!("Applying pushed event for note {}", event.note_id());
            self.view.on_event(&event);
            if confirms(&event) {
                return Ok(());
            }
        }
    }

    /// Next pushed event, already merged into the view.
    pub async fn next_event(&mut self) -> Option<NoteEvent> {
        let event = self.events.as_mut()?.next().await?;
        self.view.on_event(&event);
        Some(event)
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("notemaker")
        .join("config.json")
}

pub fn resolve_config_path(cli_path: Option<&Path>) -> PathBuf {
    cli_path
        .map(Path::to_path_buf)
        .or_else(|| env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
        .unwrap_or_else(default_config_path)
}

pub fn load_config(
    cli_path: Option<&Path>,
    mode_override: Option<SyncMode>,
) -> Result<LoadedConfig, CliError> {
    let path = resolve_config_path(cli_path);
    let mut backend = BackendConfig::load_from_path(&path)?;
    if let Some(mode) = mode_override {
        backend.mode = mode;
    }
    tracing::debug!(
        "Loaded config from {} (mode: {})",
        path.display(),
        backend.mode.as_str()
    );
    Ok(LoadedConfig { backend, path })
}

/// Connect to the configured backend and load the note list.
///
/// In subscription mode the push channel is opened before the initial load
/// so no change falls between the two.
pub async fn open_session(config: &LoadedConfig) -> Result<Session<GraphQlNotesClient>, CliError> {
    if !config.backend.is_remote() {
        return Err(CliError::NotConfigured(config.path.clone()));
    }

    let client = GraphQlNotesClient::from_config(&config.backend)?;
    let events = match config.backend.mode {
        SyncMode::Direct => None,
        SyncMode::Subscription => Some(
            SubscriptionClient::from_config(&config.backend)?
                .connect()
                .await?,
        ),
    };

    let mut view = NoteListView::new(client, config.backend.mode);
    view.initialize().await?;
    Ok(Session::new(view, events))
}

pub fn resolve_note_text(text_parts: &[String]) -> Result<String, CliError> {
    if let Some(text) = normalize_content(&text_parts.join(" ")) {
        return Ok(text);
    }

    if let Some(text) = read_piped_stdin()? {
        return Ok(text);
    }

    Err(CliError::EmptyContent)
}

pub fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn normalize_note_identifier(id: &str) -> Result<NoteId, CliError> {
    id.parse::<NoteId>().map_err(|_| CliError::EmptyNoteId)
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_content(&buffer))
}

pub fn note_to_list_item(note: &Note) -> NoteListItem {
    NoteListItem {
        id: note.id.to_string(),
        note: note.text.clone(),
        preview: note.preview(PREVIEW_LEN),
    }
}

pub fn format_note_lines(notes: &[Note]) -> Vec<String> {
    let width = notes
        .iter()
        .map(|note| note.id.as_str().chars().count())
        .max()
        .unwrap_or(0);

    notes
        .iter()
        .map(|note| format!("{:<width$}  {}", note.id.as_str(), note.preview(PREVIEW_LEN)))
        .collect()
}

pub fn describe_event(event: &NoteEvent) -> String {
    match event {
        NoteEvent::Created(note) => format!("+ {}  {}", note.id, note.preview(PREVIEW_LEN)),
        NoteEvent::Updated(note) => format!("~ {}  {}", note.id, note.preview(PREVIEW_LEN)),
        NoteEvent::Deleted(id) => format!("- {id}"),
    }
}
