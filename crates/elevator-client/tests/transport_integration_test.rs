//! Integration tests for the WebSocket transport.
//!
//! These tests run a real WebSocket server on a loopback port and drive the
//! transport against it, checking the lifecycle events the client consumes.

#![cfg(feature = "transport")]
#![allow(clippy::unwrap_used)]

use std::time::Duration;

use elevator_client::{AttemptId, ChannelEvent, transport::WebSocketTransport};
use futures::{SinkExt, StreamExt};
use tokio::{net::TcpListener, sync::mpsc, time::timeout};
use tokio_tungstenite::{accept_async, tungstenite::Message};

/// Start a server that answers every text frame with a snapshot and returns
/// its address.
async fn start_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut socket = accept_async(stream).await.unwrap();
                // Reads continue after a Close so the close reply is flushed
                while let Some(Ok(message)) = socket.next().await {
                    if message.is_text() {
                        let reply = r#"{"current_floor":2,"current_load":1}"#;
                        socket.send(Message::Text(reply.into())).await.unwrap();
                    }
                }
            });
        }
    });

    format!("ws://{addr}")
}

async fn next_event(rx: &mut mpsc::UnboundedReceiver<ChannelEvent>) -> ChannelEvent {
    timeout(Duration::from_secs(5), rx.recv()).await.unwrap().unwrap()
}

#[tokio::test]
async fn open_send_receive_close() {
    let url = start_server().await;
    let (mut transport, mut events) = WebSocketTransport::new();
    let attempt = AttemptId::new(1);

    transport.open(attempt, url);
    assert_eq!(next_event(&mut events).await, ChannelEvent::Opened { attempt });

    transport.send(attempt, r#"{"type":"configure"}"#.into()).unwrap();
    let ChannelEvent::Message { attempt: from, text } = next_event(&mut events).await else {
        unreachable!("expected message");
    };
    assert_eq!(from, attempt);
    assert!(text.contains("current_floor"));

    transport.close(attempt).unwrap();
    assert_eq!(next_event(&mut events).await, ChannelEvent::Closed { attempt });
}

#[tokio::test]
async fn finish_waits_for_graceful_close() {
    let url = start_server().await;
    let (mut transport, mut events) = WebSocketTransport::new();
    let attempt = AttemptId::new(3);

    transport.open(attempt, url);
    assert_eq!(next_event(&mut events).await, ChannelEvent::Opened { attempt });

    transport.close(attempt).unwrap();
    transport.finish(attempt, Duration::from_secs(5)).await;

    assert_eq!(events.try_recv().unwrap(), ChannelEvent::Closed { attempt });
    assert!(transport.send(attempt, "{}".into()).is_err());
}

#[tokio::test]
async fn refused_connection_reports_error_then_close() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (mut transport, mut events) = WebSocketTransport::new();
    let attempt = AttemptId::new(7);
    transport.open(attempt, format!("ws://{addr}"));

    assert!(matches!(next_event(&mut events).await, ChannelEvent::Error { attempt: a, .. } if a == attempt));
    assert_eq!(next_event(&mut events).await, ChannelEvent::Closed { attempt });
}

#[tokio::test]
async fn send_to_other_attempt_fails() {
    let url = start_server().await;
    let (mut transport, _events) = WebSocketTransport::new();
    transport.open(AttemptId::new(1), url);

    assert!(transport.send(AttemptId::new(2), "{}".into()).is_err());

    transport.abandon(AttemptId::new(1));
    assert!(transport.send(AttemptId::new(1), "{}".into()).is_err());
}
