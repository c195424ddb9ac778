//! Live update channel
//!
//! Maintains a long-lived WebSocket connection to the backend and forwards
//! parsed push messages to the main event loop over a tokio channel.
//! Messages are dispatched by their `type` tag: `metrics_update` patches
//! named summary metrics, `alert` surfaces a notification; unknown tags are
//! ignored. Connection loss is non-fatal: the listener reports the state
//! change and reconnects after a fixed delay until it is shut down.

use std::collections::HashMap;
use std::time::Duration;

use futures_util::StreamExt;
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_tungstenite::tungstenite;

/// Delay between reconnect attempts after the channel drops
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Severity of a pushed alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}

/// A message pushed over the live update channel
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveMessage {
    /// New values for named summary metrics
    MetricsUpdate { metrics: HashMap<String, f64> },
    /// A notification to surface to the user
    Alert { level: AlertLevel, message: String },
}

/// Connection state of the live channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveStatus {
    /// Attempting the initial or a fresh connection
    Connecting,
    /// Connected and receiving messages
    Connected,
    /// Connection dropped; waiting to retry
    Reconnecting,
}

/// Events delivered to the UI event loop
#[derive(Debug, Clone, PartialEq)]
pub enum LiveEvent {
    /// A parsed message from the channel
    Message(LiveMessage),
    /// The connection state changed
    Status(LiveStatus),
}

/// Handle for the background live update listener
pub struct LiveHandle {
    /// Channel for receiving live events
    pub receiver: mpsc::Receiver<LiveEvent>,
    /// Flag to signal shutdown
    shutdown_tx: mpsc::Sender<()>,
}

impl LiveHandle {
    /// Spawns the listener task against the given WebSocket URL
    ///
    /// The task reconnects indefinitely until shut down; every state change
    /// and parsed message is delivered through `receiver`.
    pub fn spawn(ws_url: String) -> Self {
        let (event_tx, event_rx) = mpsc::channel(64);
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        tokio::spawn(async move {
            loop {
                let _ = event_tx.send(LiveEvent::Status(LiveStatus::Connecting)).await;

                tokio::select! {
                    _ = run_connection(&ws_url, &event_tx) => {}
                    _ = shutdown_rx.recv() => break,
                }

                let _ = event_tx
                    .send(LiveEvent::Status(LiveStatus::Reconnecting))
                    .await;

                tokio::select! {
                    _ = sleep(RECONNECT_DELAY) => {}
                    _ = shutdown_rx.recv() => break,
                }
            }
        });

        Self {
            receiver: event_rx,
            shutdown_tx,
        }
    }

    /// Shuts down the background listener
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

/// Runs a single connection until it drops or errors
async fn run_connection(
    ws_url: &str,
    events: &mpsc::Sender<LiveEvent>,
) -> Result<(), tungstenite::Error> {
    let (ws, _) = tokio_tungstenite::connect_async(ws_url).await?;
    let _ = events.send(LiveEvent::Status(LiveStatus::Connected)).await;

    let (_write, mut read) = ws.split();
    while let Some(message) = read.next().await {
        let message = message?;
        if let Ok(text) = message.into_text() {
            // Messages with unknown type tags fail to parse and are skipped.
            if let Ok(parsed) = serde_json::from_str::<LiveMessage>(&text) {
                if events.send(LiveEvent::Message(parsed)).await.is_err() {
                    // Receiver gone; the app is shutting down.
                    return Ok(());
                }
            }
        }
    }

    Ok(())
}

/// Checks for a pending live event without blocking
///
/// # Returns
/// * `Some(LiveEvent)` if an event was available
/// * `None` if no events are pending
pub fn try_recv(handle: &mut LiveHandle) -> Option<LiveEvent> {
    handle.receiver.try_recv().ok()
}
