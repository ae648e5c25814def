use futures_util::{Stream, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info};

use crate::capture::SnapshotCapturer;

/// Moonraker WebSocket carrying printer notifications.
pub type ControlChannel = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error("failed to connect to control channel {0}: {1}")]
    Connect(String, String),
    #[error("control channel error: {0}")]
    Stream(tungstenite::Error),
}

/// Marker token that requests a frame, e.g. the `SNAP` echoed by `M118 SNAP`.
#[derive(Debug, Clone)]
pub struct Trigger {
    marker: String,
}

impl Trigger {
    pub fn new(marker: &str) -> Self {
        Self {
            marker: marker.to_string(),
        }
    }

    pub fn matches(&self, payload: &str) -> bool {
        payload.contains(&self.marker)
    }
}

pub async fn connect(url: &str) -> Result<ControlChannel, ListenerError> {
    let (channel, response) = tokio_tungstenite::connect_async(url)
        .await
        .map_err(|e| ListenerError::Connect(url.to_string(), e.to_string()))?;
    info!(url, status = %response.status(), "connected to control channel");
    Ok(channel)
}

/// Receive messages until the channel closes, capturing a frame for each trigger.
///
/// Each capture is awaited before the next message is read, so a trigger that
/// arrives mid-capture waits in the transport until the capture finishes.
/// Returns `Ok(())` on a close frame or end of stream; transport errors end the
/// loop with no reconnect.
pub async fn run<S>(
    messages: S,
    trigger: &Trigger,
    capturer: &SnapshotCapturer,
) -> Result<(), ListenerError>
where
    S: Stream<Item = Result<Message, tungstenite::Error>>,
{
    let mut messages = std::pin::pin!(messages);
    let mut triggers: u64 = 0;

    while let Some(message) = messages.next().await {
        let message = message.map_err(ListenerError::Stream)?;

        if let Message::Close(frame) = &message {
            info!(triggers, frame = ?frame, "control channel closed by peer");
            return Ok(());
        }

        match payload(&message) {
            Some(payload) if trigger.matches(payload) => {
                triggers += 1;
                debug!(triggers, "trigger received");
                capturer.capture().await;
            }
            _ => {}
        }
    }

    info!(triggers, "control channel stream ended");
    Ok(())
}

/// Text payload of a data message, if it has one worth inspecting.
fn payload(message: &Message) -> Option<&str> {
    match message {
        Message::Text(text) => Some(text.as_str()),
        Message::Binary(data) => std::str::from_utf8(data).ok(),
        _ => None,
    }
}
