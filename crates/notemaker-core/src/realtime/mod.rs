//! Realtime push notifications.
//!
//! The three note channels (created, updated, deleted) are merged into one
//! ordered `NoteEventStream`, so a single reducer consumes them in arrival
//! order.

mod protocol;

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::SEC_WEBSOCKET_PROTOCOL;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::config::{BackendConfig, Credentials};
use crate::error::{Error, Result};
use crate::state::NoteEvent;

pub use protocol::{
    decode_next, process_frame, Channel, ClientMessage, FrameAction, ServerMessage, SUBPROTOCOL,
};

const ACK_TIMEOUT_SECS: u64 = 10;

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Single inbound channel of note events.
#[derive(Debug)]
pub struct NoteEventStream {
    rx: mpsc::UnboundedReceiver<NoteEvent>,
}

impl NoteEventStream {
    /// Create a stream and the sender that feeds it.
    pub fn channel() -> (mpsc::UnboundedSender<NoteEvent>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { rx })
    }

    /// Next event, or `None` once every sender is gone.
    pub async fn next(&mut self) -> Option<NoteEvent> {
        self.rx.recv().await
    }

    /// Next already-delivered event, without waiting.
    pub fn try_next(&mut self) -> Option<NoteEvent> {
        self.rx.try_recv().ok()
    }
}

/// Connects to the realtime endpoint and subscribes to all note channels.
#[derive(Clone)]
pub struct SubscriptionClient {
    url: String,
    credentials: Credentials,
}

impl std::fmt::Debug for SubscriptionClient {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("SubscriptionClient")
            .field("url", &self.url)
            .field("credentials", &self.credentials)
            .finish()
    }
}

impl SubscriptionClient {
    pub fn new(url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            url: url.into(),
            credentials,
        }
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        let url = config
            .realtime_url
            .clone()
            .ok_or_else(|| Error::Config("no realtime endpoint configured".to_string()))?;
        Ok(Self::new(url, config.credentials.clone()))
    }

    /// Open the socket, complete the handshake, subscribe, and hand the
    /// socket to a background task.
    pub async fn connect(&self) -> Result<NoteEventStream> {
        let mut request = self.url.as_str().into_client_request()?;
        request
            .headers_mut()
            .insert(SEC_WEBSOCKET_PROTOCOL, HeaderValue::from_static(SUBPROTOCOL));

        let (mut ws, _response) = connect_async(request)
            .await
            .map_err(|error| Error::Unreachable(error.to_string()))?;
        tracing::info!("Connected to realtime endpoint {}", self.url);

        send(&mut ws, &ClientMessage::connection_init(&self.credentials)).await?;
        tokio::time::timeout(
            Duration::from_secs(ACK_TIMEOUT_SECS),
            wait_for_ack(&mut ws),
        )
        .await
        .map_err(|_| Error::Unreachable("realtime handshake timed out".to_string()))??;

        for channel in Channel::ALL {
            send(&mut ws, &ClientMessage::subscribe(channel)).await?;
            tracing::debug!(subscription = channel.id(), "Subscribed to {}", channel.field());
        }

        let (tx, stream) = NoteEventStream::channel();
        tokio::spawn(run_connection(ws, tx));
        Ok(stream)
    }
}

async fn send(ws: &mut WsStream, message: &ClientMessage) -> Result<()> {
    ws.send(Message::Text(message.to_text()?.into())).await?;
    Ok(())
}

async fn wait_for_ack(ws: &mut WsStream) -> Result<()> {
    while let Some(frame) = ws.next().await {
        match frame? {
            Message::Text(text) => match process_frame(text.as_str())? {
                FrameAction::Ack => return Ok(()),
                FrameAction::Reply(reply) => send(ws, &reply).await?,
                other => tracing::debug!("Ignoring frame before ack: {:?}", other),
            },
            Message::Close(Some(frame)) if is_auth_close(u16::from(frame.code)) => {
                return Err(Error::Unauthorized(frame.reason.as_str().to_string()));
            }
            Message::Close(_) => break,
            _ => {}
        }
    }
    Err(Error::Unreachable(
        "realtime endpoint closed during handshake".to_string(),
    ))
}

/// `graphql-transport-ws` close codes for rejected credentials.
const fn is_auth_close(code: u16) -> bool {
    matches!(code, 4401 | 4403)
}

async fn run_connection(mut ws: WsStream, tx: mpsc::UnboundedSender<NoteEvent>) {
    while let Some(frame) = ws.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => {
                tracing::info!("Realtime endpoint closed the connection");
                break;
            }
            Ok(_) => continue,
            Err(error) => {
                tracing::warn!("Realtime connection failed: {}", error);
                break;
            }
        };

        match process_frame(text.as_str()) {
            Ok(FrameAction::Event(event)) => {
                tracing::debug!(note_id = %event.note_id(), "Received note event");
                if tx.send(event).is_err() {
                    tracing::debug!("Event stream dropped; closing realtime connection");
                    break;
                }
            }
            Ok(FrameAction::Reply(reply)) => {
                if let Err(error) = send(&mut ws, &reply).await {
                    tracing::warn!("Failed to answer realtime ping: {}", error);
                    break;
                }
            }
            Ok(FrameAction::ChannelEnded { id, reason }) => match reason {
                Some(reason) => tracing::warn!(subscription = %id, "Subscription failed: {}", reason),
                None => tracing::info!(subscription = %id, "Subscription completed by server"),
            },
            Ok(FrameAction::Ack | FrameAction::Ignore) => {}
            Err(error) => tracing::warn!("Dropping realtime frame: {}", error),
        }
    }

    if let Err(error) = ws.close(None).await {
        tracing::debug!("Realtime close failed: {}", error);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::oneshot;
    use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
    use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
    use tokio_tungstenite::tungstenite::protocol::CloseFrame;

    use super::*;
    use crate::error::FailureKind;
    use crate::models::{Note, NoteId};

    type ServerSocket = WebSocketStream<TcpStream>;

    async fn bind() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}/graphql", listener.local_addr().unwrap());
        (listener, url)
    }

    /// Accept one client and agree on the subprotocol it asked for.
    async fn accept(listener: &TcpListener) -> ServerSocket {
        let (stream, _) = listener.accept().await.unwrap();
        let agree = |_request: &Request,
                     mut response: Response|
         -> std::result::Result<Response, ErrorResponse> {
            response
                .headers_mut()
                .insert(SEC_WEBSOCKET_PROTOCOL, HeaderValue::from_static(SUBPROTOCOL));
            Ok(response)
        };
        tokio_tungstenite::accept_hdr_async(stream, agree)
            .await
            .unwrap()
    }

    async fn recv_json(ws: &mut ServerSocket) -> Value {
        loop {
            match ws.next().await.unwrap().unwrap() {
                Message::Text(text) => return serde_json::from_str(text.as_str()).unwrap(),
                Message::Close(frame) => panic!("client closed early: {frame:?}"),
                _ => {}
            }
        }
    }

    async fn send_json(ws: &mut ServerSocket, value: Value) {
        ws.send(Message::text(value.to_string())).await.unwrap();
    }

    fn created_frame(id: &str, text: &str) -> Value {
        json!({
            "type": "next",
            "id": "note-created",
            "payload": { "data": { "onCreateNote": { "id": id, "note": text } } }
        })
    }

    #[tokio::test(flavor = "current_thread")]
    async fn stream_delivers_in_send_order() {
        let (tx, mut stream) = NoteEventStream::channel();
        tx.send(NoteEvent::Created(Note::new("1", "a"))).unwrap();
        tx.send(NoteEvent::Deleted(NoteId::new("1"))).unwrap();
        drop(tx);

        assert_eq!(
            stream.next().await,
            Some(NoteEvent::Created(Note::new("1", "a")))
        );
        assert_eq!(
            stream.next().await,
            Some(NoteEvent::Deleted(NoteId::new("1")))
        );
        assert_eq!(stream.next().await, None);
    }

    #[test]
    fn auth_close_codes() {
        assert!(is_auth_close(4403));
        assert!(is_auth_close(4401));
        assert!(!is_auth_close(1000));
    }

    #[test]
    fn from_config_requires_realtime_url() {
        assert!(SubscriptionClient::from_config(&BackendConfig::default()).is_err());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn connect_to_closed_port_is_unreachable() {
        let client = SubscriptionClient::new("ws://127.0.0.1:9/graphql", Credentials::default());
        let error = client.connect().await.unwrap_err();
        assert_eq!(error.kind(), FailureKind::NetworkUnreachable);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn connect_handshakes_subscribes_and_forwards_events() {
        let (listener, url) = bind().await;
        let (dropped_tx, dropped_rx) = oneshot::channel::<()>();

        let server = tokio::spawn(async move {
            let mut ws = accept(&listener).await;

            let init = recv_json(&mut ws).await;
            assert_eq!(init["type"], "connection_init");
            assert_eq!(init["payload"]["x-api-key"], "da2-key");
            send_json(&mut ws, json!({ "type": "connection_ack" })).await;

            let mut subscribed = Vec::new();
            for _ in 0..3 {
                let frame = recv_json(&mut ws).await;
                assert_eq!(frame["type"], "subscribe");
                subscribed.push(frame["id"].as_str().unwrap().to_string());
            }
            assert_eq!(subscribed, ["note-created", "note-updated", "note-deleted"]);

            send_json(&mut ws, json!({ "type": "ping" })).await;
            assert_eq!(recv_json(&mut ws).await, json!({ "type": "pong" }));

            send_json(&mut ws, created_frame("1", "a")).await;
            send_json(
                &mut ws,
                json!({
                    "type": "next",
                    "id": "note-deleted",
                    "payload": { "data": { "onDeleteNote": { "id": "1" } } }
                }),
            )
            .await;

            // Once the client drops its stream, the next event ends the task.
            dropped_rx.await.unwrap();
            send_json(&mut ws, created_frame("2", "b")).await;
            loop {
                match ws.next().await {
                    Some(Ok(Message::Close(_))) | None => return true,
                    Some(Ok(_)) => {}
                    Some(Err(_)) => return false,
                }
            }
        });

        let credentials = Credentials {
            api_key: Some("da2-key".to_string()),
            auth_token: None,
        };
        let mut events = SubscriptionClient::new(url, credentials)
            .connect()
            .await
            .unwrap();

        assert_eq!(
            events.next().await,
            Some(NoteEvent::Created(Note::new("1", "a")))
        );
        assert_eq!(
            events.next().await,
            Some(NoteEvent::Deleted(NoteId::new("1")))
        );

        drop(events);
        dropped_tx.send(()).unwrap();
        assert!(server.await.unwrap(), "client should close the socket");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn rejected_credentials_close_is_unauthorized() {
        let (listener, url) = bind().await;

        let server = tokio::spawn(async move {
            let mut ws = accept(&listener).await;
            let init = recv_json(&mut ws).await;
            assert_eq!(init["type"], "connection_init");
            ws.close(Some(CloseFrame {
                code: CloseCode::from(4403),
                reason: "Forbidden".into(),
            }))
            .await
            .unwrap();
        });

        let error = SubscriptionClient::new(url, Credentials::default())
            .connect()
            .await
            .unwrap_err();
        assert_eq!(error.kind(), FailureKind::Unauthorized);
        server.await.unwrap();
    }

    #[tokio::test(flavor = "current_thread")]
    async fn close_during_handshake_is_unreachable() {
        let (listener, url) = bind().await;

        let server = tokio::spawn(async move {
            let mut ws = accept(&listener).await;
            recv_json(&mut ws).await;
            ws.close(None).await.unwrap();
        });

        let error = SubscriptionClient::new(url, Credentials::default())
            .connect()
            .await
            .unwrap_err();
        assert_eq!(error.kind(), FailureKind::NetworkUnreachable);
        server.await.unwrap();
    }
}
