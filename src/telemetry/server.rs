//! WebSocket broadcast of [`FlightTelemetry`] frames.
//!
//! Adapted from the dashboard's `WebSocketServer`: one broadcast channel,
//! one task per connection forwarding frames as JSON text messages. Unlike
//! the dashboard, there is no command channel and no client-to-server
//! state mutation — a telemetry client can watch, never steer.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, info, warn};

use crate::ingest::IngestHandle;

use super::FlightTelemetry;

/// Broadcasts [`FlightTelemetry`] to every connected client.
pub struct TelemetryServer {
    port: u16,
    tx: Arc<broadcast::Sender<FlightTelemetry>>,
}

impl TelemetryServer {
    pub fn new(port: u16, tx: Arc<broadcast::Sender<FlightTelemetry>>) -> Self {
        Self { port, tx }
    }

    /// Accept connections until the process shuts down.
    pub async fn run(self) -> Result<()> {
        let addr = format!("127.0.0.1:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind telemetry listener on {addr}"))?;

        info!("telemetry server listening on {addr}");

        loop {
            match listener.accept().await {
                Ok((stream, peer_addr)) => {
                    let tx = self.tx.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, peer_addr, tx).await {
                            warn!("telemetry connection error for {peer_addr}: {e}");
                        }
                        debug!("telemetry client {peer_addr} disconnected");
                    });
                }
                Err(e) => {
                    warn!("failed to accept telemetry connection: {e}");
                }
            }
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    tx: Arc<broadcast::Sender<FlightTelemetry>>,
) -> Result<()> {
    let ws_stream = accept_async(stream)
        .await
        .context("telemetry WebSocket handshake failed")?;

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let mut rx = tx.subscribe();

    let welcome = serde_json::json!({
        "type": "connection",
        "status": "connected",
        "message": "flight telemetry (read-only)",
    });
    ws_sender
        .send(Message::Text(welcome.to_string()))
        .await
        .context("failed to send telemetry welcome message")?;

    loop {
        tokio::select! {
            frame = rx.recv() => {
                match frame {
                    Ok(telemetry) => {
                        let json = serde_json::to_string(&telemetry)?;
                        if ws_sender.send(Message::Text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("telemetry client {peer_addr} lagged, dropped {skipped} frames");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            incoming = ws_receiver.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {} // read-only feed: anything else is ignored
                    Some(Err(e)) => {
                        debug!("telemetry client {peer_addr} read error: {e}");
                        break;
                    }
                }
            }
        }
    }

    let _ = ws_sender.send(Message::Close(None)).await;
    Ok(())
}

/// Poll [`IngestHandle`] at `hz` and broadcast a fresh [`FlightTelemetry`]
/// frame each tick. Runs for the life of the process; errors broadcasting
/// to zero subscribers are expected (no clients yet) and are not logged.
pub async fn publish_loop(handle: IngestHandle, tx: Arc<broadcast::Sender<FlightTelemetry>>, hz: u32) {
    let mut ticker = tokio::time::interval(Duration::from_millis(1000 / hz.max(1) as u64));
    loop {
        ticker.tick().await;
        let frame = FlightTelemetry::snapshot(&handle, chrono::Utc::now());
        let _ = tx.send(frame);
    }
}
