use notemaker_core::SyncMode;

use crate::commands::common::{describe_event, open_session, LoadedConfig};
use crate::error::CliError;

/// Print every pushed change with the resulting list size.
pub async fn run_watch(config: &LoadedConfig) -> Result<(), CliError> {
    let mut subscribed = config.clone();
    subscribed.backend.mode = SyncMode::Subscription;

    let mut session = open_session(&subscribed).await?;
    println!("Watching {} notes", session.view.notes().len());

    while let Some(event) = session.next_event().await {
        println!(
            "{}  ({} notes)",
            describe_event(&event),
            session.view.notes().len()
        );
    }

    Err(CliError::StreamEnded)
}
