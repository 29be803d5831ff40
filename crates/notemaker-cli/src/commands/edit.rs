use notemaker_core::api::NotesApi;
use notemaker_core::{Note, NoteEvent, NoteId};

use crate::commands::common::{
    normalize_note_identifier, open_session, resolve_note_text, LoadedConfig, Session,
    PUSH_TIMEOUT,
};
use crate::error::CliError;

pub async fn run_edit(config: &LoadedConfig, id: &str, text_parts: &[String]) -> Result<(), CliError> {
    let note_id = normalize_note_identifier(id)?;
    let text = resolve_note_text(text_parts)?;
    let mut session = open_session(config).await?;

    let updated = edit_note(&mut session, &note_id, &text).await?;
    println!("{}", updated.id);
    Ok(())
}

/// Select `id` for editing, replace its text, and return the stored note.
pub async fn edit_note<A: NotesApi>(
    session: &mut Session<A>,
    id: &NoteId,
    text: &str,
) -> Result<Note, CliError> {
    let note = session.require(id)?;

    session.view.select_for_edit(&note);
    session.view.set_draft(text);
    let updated = session.view.submit().await?;
    session
        .settle(PUSH_TIMEOUT, |event| {
            matches!(event, NoteEvent::Updated(pushed) if pushed.id == updated.id)
        })
        .await?;

    Ok(updated)
}
