//! `graphql-transport-ws` frames and note payload decoding.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::api::{ON_CREATE_NOTE, ON_DELETE_NOTE, ON_UPDATE_NOTE};
use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::models::{Note, NoteId};
use crate::state::NoteEvent;

/// WebSocket subprotocol spoken by the realtime endpoint.
pub const SUBPROTOCOL: &str = "graphql-transport-ws";

/// The three push channels, keyed by subscription id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Created,
    Updated,
    Deleted,
}

impl Channel {
    pub const ALL: [Self; 3] = [Self::Created, Self::Updated, Self::Deleted];

    pub const fn id(self) -> &'static str {
        match self {
            Self::Created => "note-created",
            Self::Updated => "note-updated",
            Self::Deleted => "note-deleted",
        }
    }

    pub const fn field(self) -> &'static str {
        match self {
            Self::Created => "onCreateNote",
            Self::Updated => "onUpdateNote",
            Self::Deleted => "onDeleteNote",
        }
    }

    pub const fn document(self) -> &'static str {
        match self {
            Self::Created => ON_CREATE_NOTE,
            Self::Updated => ON_UPDATE_NOTE,
            Self::Deleted => ON_DELETE_NOTE,
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|channel| channel.id() == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    ConnectionInit { payload: Value },
    Subscribe { id: String, payload: SubscribePayload },
    Pong,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscribePayload {
    pub query: String,
}

impl ClientMessage {
    pub fn connection_init(credentials: &Credentials) -> Self {
        let mut payload = Map::new();
        if let Some(api_key) = &credentials.api_key {
            payload.insert("x-api-key".to_string(), json!(api_key));
        }
        if let Some(token) = &credentials.auth_token {
            payload.insert("Authorization".to_string(), json!(format!("Bearer {token}")));
        }
        Self::ConnectionInit {
            payload: Value::Object(payload),
        }
    }

    pub fn subscribe(channel: Channel) -> Self {
        Self::Subscribe {
            id: channel.id().to_string(),
            payload: SubscribePayload {
                query: channel.document().to_string(),
            },
        }
    }

    pub fn to_text(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    ConnectionAck {
        #[serde(default)]
        payload: Option<Value>,
    },
    Next {
        id: String,
        payload: Value,
    },
    Error {
        id: String,
        #[serde(default)]
        payload: Value,
    },
    Complete {
        id: String,
    },
    Ping {
        #[serde(default)]
        payload: Option<Value>,
    },
    Pong {
        #[serde(default)]
        payload: Option<Value>,
    },
}

/// What the connection task should do with one inbound text frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameAction {
    Ack,
    Event(NoteEvent),
    Reply(ClientMessage),
    /// The server ended or failed one subscription
    ChannelEnded { id: String, reason: Option<String> },
    Ignore,
}

/// Interpret one inbound text frame.
pub fn process_frame(text: &str) -> Result<FrameAction> {
    let message: ServerMessage = serde_json::from_str(text)
        .map_err(|error| Error::Protocol(format!("invalid realtime frame: {error}")))?;

    Ok(match message {
        ServerMessage::ConnectionAck { .. } => FrameAction::Ack,
        ServerMessage::Next { id, payload } => match decode_next(&id, &payload)? {
            Some(event) => FrameAction::Event(event),
            None => FrameAction::Ignore,
        },
        ServerMessage::Error { id, payload } => FrameAction::ChannelEnded {
            id,
            reason: Some(compact_errors(&payload)),
        },
        ServerMessage::Complete { id } => FrameAction::ChannelEnded { id, reason: None },
        ServerMessage::Ping { .. } => FrameAction::Reply(ClientMessage::Pong),
        ServerMessage::Pong { .. } => FrameAction::Ignore,
    })
}

#[derive(Debug, Deserialize)]
struct DeletedPayload {
    id: NoteId,
}

/// Decode a `next` payload for one of the note channels.
///
/// Unknown subscription ids decode to `None`.
pub fn decode_next(id: &str, payload: &Value) -> Result<Option<NoteEvent>> {
    let Some(channel) = Channel::from_id(id) else {
        tracing::debug!(subscription = id, "Ignoring payload for unknown subscription");
        return Ok(None);
    };

    if let Some(errors) = payload.get("errors").filter(|errors| !errors.is_null()) {
        return Err(Error::Validation(compact_errors(errors)));
    }

    let data = payload
        .get("data")
        .and_then(|data| data.get(channel.field()))
        .filter(|value| !value.is_null())
        .cloned()
        .ok_or_else(|| {
            Error::Protocol(format!("{} payload carried no data", channel.field()))
        })?;

    let event = match channel {
        Channel::Created => NoteEvent::Created(serde_json::from_value::<Note>(data)?),
        Channel::Updated => NoteEvent::Updated(serde_json::from_value::<Note>(data)?),
        Channel::Deleted => NoteEvent::Deleted(serde_json::from_value::<DeletedPayload>(data)?.id),
    };
    Ok(Some(event))
}

fn compact_errors(errors: &Value) -> String {
    match errors {
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.get("message")
                    .and_then(Value::as_str)
                    .map_or_else(|| item.to_string(), str::to_string)
            })
            .collect::<Vec<_>>()
            .join("; "),
        Value::Null => "unknown error".to_string(),
        other => other.to_string(),
    }
}
