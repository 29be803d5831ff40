use notemaker_core::api::NotesApi;
use notemaker_core::{Note, NoteEvent};

use crate::commands::common::{open_session, resolve_note_text, LoadedConfig, Session, PUSH_TIMEOUT};
use crate::error::CliError;

pub async fn run_add(config: &LoadedConfig, text_parts: &[String]) -> Result<(), CliError> {
    let text = resolve_note_text(text_parts)?;
    let mut session = open_session(config).await?;

    let note = add_note(&mut session, &text).await?;
    println!("{}", note.id);
    Ok(())
}

/// Submit `text` as a new note and return it once it is in the list.
pub async fn add_note<A: NotesApi>(session: &mut Session<A>, text: &str) -> Result<Note, CliError> {
    session.view.set_draft(text);
    let created = session.view.submit().await?;
    session
        .settle(PUSH_TIMEOUT, |event| {
            matches!(event, NoteEvent::Created(note) if note.id == created.id)
        })
        .await?;

    Ok(created)
}
