//! Notes backend service for the desktop application

use std::sync::Arc;

use notemaker_core::api::{GraphQlNotesClient, NotesApi};
use notemaker_core::config::BackendConfig;
use notemaker_core::memory::InMemoryNotesApi;
use notemaker_core::realtime::{NoteEventStream, SubscriptionClient};
use notemaker_core::Result;

/// The backend the window talks to.
///
/// Falls back to an in-process backend when no GraphQL endpoint is configured.
#[derive(Debug, Clone)]
pub enum NotesBackend {
    Remote {
        client: Arc<GraphQlNotesClient>,
        realtime: Option<SubscriptionClient>,
    },
    Local(Arc<InMemoryNotesApi>),
}

impl NotesBackend {
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        if !config.is_remote() {
            tracing::info!("Running in local-only mode (no NOTEMAKER_GRAPHQL_URL)");
            return Ok(Self::Local(Arc::new(InMemoryNotesApi::new())));
        }

        let client = GraphQlNotesClient::from_config(config)?;
        tracing::info!("Using notes backend at {}", client.endpoint());
        let realtime = config
            .realtime_url
            .is_some()
            .then(|| SubscriptionClient::from_config(config))
            .transpose()?;

        Ok(Self::Remote {
            client: Arc::new(client),
            realtime,
        })
    }

    pub fn api(&self) -> Arc<dyn NotesApi> {
        match self {
            Self::Remote { client, .. } => client.clone(),
            Self::Local(api) => api.clone(),
        }
    }

    /// Open the push channel for subscription mode.
    pub async fn subscribe(&self) -> Result<NoteEventStream> {
        match self {
            Self::Remote {
                realtime: Some(realtime),
                ..
            } => realtime.connect().await,
            Self::Remote { realtime: None, .. } => Err(notemaker_core::Error::Config(
                "subscription mode needs a realtime endpoint".to_string(),
            )),
            Self::Local(api) => Ok(api.subscribe()),
        }
    }

    pub const fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_selects_local_backend() {
        let backend = NotesBackend::from_config(&BackendConfig::default()).unwrap();
        assert!(backend.is_local());
    }

    #[test]
    fn remote_config_selects_graphql_backend() {
        let config =
            BackendConfig::from_json(r#"{ "graphql_url": "https://api.example.com/graphql" }"#)
                .unwrap();
        let backend = NotesBackend::from_config(&config).unwrap();
        assert!(matches!(
            backend,
            NotesBackend::Remote {
                realtime: Some(_),
                ..
            }
        ));
    }
}
