//! GraphQL-over-HTTP client for the managed notes backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use super::documents::{CREATE_NOTE, DELETE_NOTE, LIST_NOTES, UPDATE_NOTE};
use super::NotesApi;
use crate::config::{BackendConfig, Credentials};
use crate::error::{Error, Result};
use crate::models::{Note, NoteId};
use crate::util::{compact_text, is_http_url, normalize_text_option};

const REQUEST_TIMEOUT_SECS: u64 = 20;

#[derive(Clone)]
pub struct GraphQlNotesClient {
    endpoint: String,
    credentials: Credentials,
    client: reqwest::Client,
}

impl std::fmt::Debug for GraphQlNotesClient {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("GraphQlNotesClient")
            .field("endpoint", &self.endpoint)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl GraphQlNotesClient {
    pub fn new(endpoint: impl Into<String>, credentials: Credentials) -> Result<Self> {
        let endpoint = normalize_text_option(Some(endpoint.into()))
            .ok_or_else(|| Error::Config("GraphQL endpoint must not be empty".to_string()))?;
        if !is_http_url(&endpoint) {
            return Err(Error::Config(
                "GraphQL endpoint must include http:// or https://".to_string(),
            ));
        }

        Ok(Self {
            endpoint,
            credentials,
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        let endpoint = config
            .graphql_url
            .clone()
            .ok_or_else(|| Error::Config("no GraphQL endpoint configured".to_string()))?;
        Self::new(endpoint, config.credentials.clone())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        field: &str,
        query: &str,
        variables: Value,
    ) -> Result<T> {
        tracing::debug!(operation = field, "Sending GraphQL request");

        let mut request = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&json!({ "query": query, "variables": variables }));
        if let Some(api_key) = &self.credentials.api_key {
            request = request.header("x-api-key", api_key);
        }
        if let Some(token) = &self.credentials.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(map_send_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_send_error)?;

        if !status.is_success() {
            let error = error_for_status(status, &body);
            tracing::warn!(operation = field, "GraphQL request failed: {}", error);
            return Err(error);
        }

        parse_graphql_response(&body, field).inspect_err(|error| {
            tracing::warn!(operation = field, "GraphQL operation failed: {}", error);
        })
    }
}

#[async_trait]
impl NotesApi for GraphQlNotesClient {
    async fn list_notes(&self) -> Result<Vec<Note>> {
        let connection: NoteConnection = self.execute("listNotes", LIST_NOTES, json!({})).await?;
        let notes: Vec<Note> = connection.items.into_iter().flatten().collect();
        tracing::info!("Listed {} notes", notes.len());
        Ok(notes)
    }

    async fn create_note(&self, text: &str) -> Result<Note> {
        let note: Note = self
            .execute(
                "createNote",
                CREATE_NOTE,
                json!({ "input": { "note": text } }),
            )
            .await?;
        tracing::info!("Created note {}", note.id);
        Ok(note)
    }

    async fn update_note(&self, id: &NoteId, text: &str) -> Result<Note> {
        let note: Note = self
            .execute(
                "updateNote",
                UPDATE_NOTE,
                json!({ "input": { "id": id, "note": text } }),
            )
            .await?;
        tracing::info!("Updated note {}", note.id);
        Ok(note)
    }

    async fn delete_note(&self, id: &NoteId) -> Result<NoteId> {
        let deleted: DeletedNote = self
            .execute("deleteNote", DELETE_NOTE, json!({ "input": { "id": id } }))
            .await?;
        tracing::info!("Deleted note {}", deleted.id);
        Ok(deleted.id)
    }
}

/// Decode a GraphQL response body and extract `data.<field>`.
pub fn parse_graphql_response<T: DeserializeOwned>(body: &str, field: &str) -> Result<T> {
    let envelope: GraphQlEnvelope = serde_json::from_str(body).map_err(|error| {
        Error::Protocol(format!(
            "invalid GraphQL response: {error}: {}",
            compact_text(body)
        ))
    })?;

    if !envelope.errors.is_empty() {
        return Err(classify_errors(&envelope.errors));
    }

    let value = envelope
        .data
        .and_then(|mut data| data.get_mut(field).map(Value::take))
        .filter(|value| !value.is_null())
        .ok_or_else(|| Error::NotFound(format!("{field} returned no data")))?;

    Ok(serde_json::from_value(value)?)
}

#[derive(Debug, Deserialize)]
struct GraphQlEnvelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
    #[serde(default, rename = "errorType")]
    error_type: Option<String>,
    #[serde(default)]
    extensions: Option<GraphQlErrorExtensions>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorExtensions {
    #[serde(default)]
    code: Option<String>,
}

impl GraphQlError {
    fn code(&self) -> &str {
        self.error_type
            .as_deref()
            .or_else(|| self.extensions.as_ref().and_then(|ext| ext.code.as_deref()))
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct NoteConnection {
    #[serde(default)]
    items: Vec<Option<Note>>,
}

#[derive(Debug, Deserialize)]
struct DeletedNote {
    id: NoteId,
}

fn classify_errors(errors: &[GraphQlError]) -> Error {
    let message = errors
        .iter()
        .map(|error| error.message.trim())
        .collect::<Vec<_>>()
        .join("; ");

    let codes = errors
        .iter()
        .map(|error| error.code().to_ascii_lowercase())
        .collect::<Vec<_>>();

    if codes.iter().any(|code| {
        code.contains("unauthorized") || code.contains("unauthenticated") || code == "forbidden"
    }) {
        Error::Unauthorized(message)
    } else if codes
        .iter()
        .any(|code| code.contains("conditionalcheckfailed") || code.contains("not_found"))
    {
        Error::NotFound(message)
    } else {
        Error::Validation(message)
    }
}

fn error_for_status(status: StatusCode, body: &str) -> Error {
    let detail = if body.trim().is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", compact_text(body), status.as_u16())
    };

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        Error::Unauthorized(detail)
    } else if status == StatusCode::NOT_FOUND {
        Error::Config(format!("GraphQL endpoint not found: {detail}"))
    } else if status.is_server_error() {
        Error::Unreachable(detail)
    } else {
        Error::Validation(detail)
    }
}

fn map_send_error(error: reqwest::Error) -> Error {
    if error.is_connect() || error.is_timeout() {
        Error::Unreachable(error.to_string())
    } else {
        Error::Http(error)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::FailureKind;

    #[test]
    fn parses_list_items_and_skips_nulls() {
        let body = r#"{
          "data": {
            "listNotes": {
              "items": [
                { "id": "1", "note": "a" },
                null,
                { "id": "2", "note": "b" }
              ]
            }
          }
        }"#;

        let connection: NoteConnection = parse_graphql_response(body, "listNotes").unwrap();
        let notes: Vec<Note> = connection.items.into_iter().flatten().collect();
        assert_eq!(notes, vec![Note::new("1", "a"), Note::new("2", "b")]);
    }

    #[test]
    fn parses_mutation_payload() {
        let body = r#"{ "data": { "createNote": { "id": "3", "note": "c" } } }"#;
        let note: Note = parse_graphql_response(body, "createNote").unwrap();
        assert_eq!(note, Note::new("3", "c"));
    }

    #[test]
    fn parses_delete_payload() {
        let body = r#"{ "data": { "deleteNote": { "id": "2" } } }"#;
        let deleted: DeletedNote = parse_graphql_response(body, "deleteNote").unwrap();
        assert_eq!(deleted.id, NoteId::new("2"));
    }

    #[test]
    fn null_field_is_not_found() {
        let body = r#"{ "data": { "updateNote": null } }"#;
        let error = parse_graphql_response::<Note>(body, "updateNote").unwrap_err();
        assert_eq!(error.kind(), FailureKind::NotFound);
    }

    #[test]
    fn conditional_check_failure_is_not_found() {
        let body = r#"{
          "data": { "deleteNote": null },
          "errors": [{
            "message": "The conditional request failed",
            "errorType": "DynamoDB:ConditionalCheckFailedException"
          }]
        }"#;
        let error = parse_graphql_response::<DeletedNote>(body, "deleteNote").unwrap_err();
        assert_eq!(error.kind(), FailureKind::NotFound);
    }

    #[test]
    fn unauthorized_error_type_is_classified() {
        let body = r#"{ "errors": [{ "message": "Not Authorized to access createNote", "errorType": "Unauthorized" }] }"#;
        let error = parse_graphql_response::<Note>(body, "createNote").unwrap_err();
        assert_eq!(error.kind(), FailureKind::Unauthorized);
    }

    #[test]
    fn extension_codes_are_classified() {
        let body = r#"{ "errors": [{ "message": "login required", "extensions": { "code": "UNAUTHENTICATED" } }] }"#;
        let error = parse_graphql_response::<Note>(body, "createNote").unwrap_err();
        assert_eq!(error.kind(), FailureKind::Unauthorized);
    }

    #[test]
    fn other_errors_are_validation_with_joined_messages() {
        let body = r#"{ "errors": [
            { "message": "Variable 'input' has an invalid value" },
            { "message": "note is required" }
        ] }"#;
        let error = parse_graphql_response::<Note>(body, "createNote").unwrap_err();
        assert_eq!(error.kind(), FailureKind::BackendValidation);
        assert!(error.to_string().contains("invalid value; note is required"));
    }

    #[test]
    fn malformed_body_is_protocol_error() {
        let error = parse_graphql_response::<Note>("<html>502</html>", "createNote").unwrap_err();
        assert!(matches!(error, Error::Protocol(_)));
    }

    #[test]
    fn status_errors_are_classified() {
        assert_eq!(
            error_for_status(StatusCode::UNAUTHORIZED, "").kind(),
            FailureKind::Unauthorized
        );
        assert_eq!(
            error_for_status(StatusCode::SERVICE_UNAVAILABLE, "down").kind(),
            FailureKind::NetworkUnreachable
        );
        assert_eq!(
            error_for_status(StatusCode::BAD_REQUEST, "{}").kind(),
            FailureKind::BackendValidation
        );
    }

    #[test]
    fn client_rejects_non_http_endpoint() {
        assert!(GraphQlNotesClient::new("api.example.com/graphql", Credentials::default()).is_err());
        assert!(GraphQlNotesClient::new("  ", Credentials::default()).is_err());
    }

    #[test]
    fn client_debug_redacts_credentials() {
        let client = GraphQlNotesClient::new(
            "https://api.example.com/graphql",
            Credentials {
                api_key: Some("da2-secret".to_string()),
                auth_token: None,
            },
        )
        .unwrap();
        let debug = format!("{client:?}");
        assert!(debug.contains("https://api.example.com/graphql"));
        assert!(!debug.contains("da2-secret"));
    }
}
