//! WebSocket transport for the client.
//!
//! Provides [`WebSocketTransport`], which owns at most one socket task per
//! connection attempt. This is a thin layer that just moves text frames and
//! reports lifecycle as [`ChannelEvent`]s - protocol logic remains in the
//! Sans-IO [`Client`](crate::Client).

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::{connection::AttemptId, event::ChannelEvent};

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Stream error.
    #[error("stream error: {0}")]
    Stream(String),

    /// No channel for the attempt.
    #[error("no open channel for attempt {0}")]
    NoChannel(AttemptId),
}

/// Commands for a running socket task.
#[derive(Debug)]
enum Outgoing {
    Text(String),
    Close,
}

/// Handle to one socket task.
struct Channel {
    attempt: AttemptId,
    to_socket: mpsc::UnboundedSender<Outgoing>,
    task: tokio::task::JoinHandle<()>,
}

/// WebSocket channel owner.
///
/// Lifecycle and inbound text from every attempt is delivered on the receiver
/// returned by [`WebSocketTransport::new`].
pub struct WebSocketTransport {
    events: mpsc::UnboundedSender<ChannelEvent>,
    channel: Option<Channel>,
}

impl WebSocketTransport {
    /// Create a transport and the receiver its channel events arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ChannelEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        (Self { events, channel: None }, rx)
    }

    /// Spawn a socket task for `attempt`. Any previous task is aborted.
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(&mut self, attempt: AttemptId, endpoint: String) {
        self.stop();

        let (to_socket, from_client) = mpsc::unbounded_channel();
        let events = self.events.clone();
        let handle = tokio::spawn(async move {
            if let Err(err) = run_channel(attempt, &endpoint, from_client, &events).await {
                tracing::warn!(%attempt, %err, "channel failed");
                let _ = events.send(ChannelEvent::Error { attempt, reason: err.to_string() });
            }
            let _ = events.send(ChannelEvent::Closed { attempt });
        });

        self.channel = Some(Channel { attempt, to_socket, task: handle });
    }

    /// Queue a text frame on the attempt's socket.
    pub fn send(&self, attempt: AttemptId, text: String) -> Result<(), TransportError> {
        self.channel_for(attempt)?
            .to_socket
            .send(Outgoing::Text(text))
            .map_err(|_| TransportError::NoChannel(attempt))
    }

    /// Request a graceful close of the attempt's socket.
    pub fn close(&self, attempt: AttemptId) -> Result<(), TransportError> {
        self.channel_for(attempt)?
            .to_socket
            .send(Outgoing::Close)
            .map_err(|_| TransportError::NoChannel(attempt))
    }

    /// Wait up to `limit` for the attempt's socket task to finish, e.g. after
    /// [`Self::close`]. The task is aborted if it is still running.
    pub async fn finish(&mut self, attempt: AttemptId, limit: Duration) {
        let Some(mut channel) = self.channel.take_if(|c| c.attempt == attempt) else {
            return;
        };
        if tokio::time::timeout(limit, &mut channel.task).await.is_err() {
            tracing::debug!(%attempt, "channel did not finish in time");
            channel.task.abort();
        }
    }

    /// Drop the attempt's socket without reporting its lifecycle.
    pub fn abandon(&mut self, attempt: AttemptId) {
        if self.channel.as_ref().is_some_and(|c| c.attempt == attempt) {
            self.stop();
        }
    }

    /// Abort the socket task, if any.
    pub fn stop(&mut self) {
        if let Some(channel) = self.channel.take() {
            tracing::debug!(attempt = %channel.attempt, "stopping channel");
            channel.task.abort();
        }
    }

    fn channel_for(&self, attempt: AttemptId) -> Result<&Channel, TransportError> {
        self.channel
            .as_ref()
            .filter(|c| c.attempt == attempt)
            .ok_or(TransportError::NoChannel(attempt))
    }
}

/// Run one socket, bridging between channels and the WebSocket.
async fn run_channel(
    attempt: AttemptId,
    endpoint: &str,
    mut from_client: mpsc::UnboundedReceiver<Outgoing>,
    events: &mpsc::UnboundedSender<ChannelEvent>,
) -> Result<(), TransportError> {
    let (socket, _response) =
        connect_async(endpoint).await.map_err(|e| TransportError::Connection(e.to_string()))?;
    let (mut sink, mut stream) = socket.split();

    let _ = events.send(ChannelEvent::Opened { attempt });

    let mut closing = false;
    loop {
        tokio::select! {
            outgoing = from_client.recv(), if !closing => match outgoing {
                Some(Outgoing::Text(text)) => {
                    sink.send(Message::Text(text))
                        .await
                        .map_err(|e| TransportError::Stream(format!("send failed: {e}")))?;
                },
                Some(Outgoing::Close) | None => {
                    closing = true;
                    sink.send(Message::Close(None))
                        .await
                        .map_err(|e| TransportError::Stream(format!("close failed: {e}")))?;
                },
            },
            incoming = stream.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    let _ = events.send(ChannelEvent::Message { attempt, text });
                },
                Some(Ok(Message::Close(_))) | None => return Ok(()),
                Some(Ok(_)) => {},
                Some(Err(e)) => return Err(TransportError::Stream(e.to_string())),
            },
        }
    }
}
