use notemaker_core::api::NotesApi;
use notemaker_core::{NoteEvent, NoteId};

use crate::commands::common::{
    normalize_note_identifier, open_session, LoadedConfig, Session, PUSH_TIMEOUT,
};
use crate::error::CliError;

pub async fn run_delete(config: &LoadedConfig, id: &str) -> Result<(), CliError> {
    let note_id = normalize_note_identifier(id)?;
    let mut session = open_session(config).await?;

    let deleted = delete_note(&mut session, &note_id).await?;
    println!("{deleted}");
    Ok(())
}

pub async fn delete_note<A: NotesApi>(
    session: &mut Session<A>,
    id: &NoteId,
) -> Result<NoteId, CliError> {
    let note = session.require(id)?;

    let deleted = session.view.delete_note(&note).await?;
    session
        .settle(PUSH_TIMEOUT, |event| {
            matches!(event, NoteEvent::Deleted(pushed) if *pushed == deleted)
        })
        .await?;

    Ok(deleted)
}
