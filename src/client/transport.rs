//! WebSocket transport — connects a `RoomClient` to the room server.
//!
//! DESIGN
//! ======
//! One loop per client: connect, announce `Connected` (which queues the
//! join), then pump server events into the client and queued outbox events
//! onto the socket until either side drops. Reconnects use exponential
//! backoff starting at one second and capped at ten, reset after every
//! successful connect.
//!
//! The client sits behind a `std::sync::Mutex` so a UI thread can read it
//! between events. The lock is never held across an await.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::{Sink, SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

use crate::client::{Lifecycle, RoomClient};
use crate::event::{self, ClientEvent};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

// =============================================================================
// BACKOFF
// =============================================================================

pub const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
pub const MAX_BACKOFF: Duration = Duration::from_secs(10);

/// Doubling reconnect delay with an upper bound.
#[derive(Clone, Debug)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    current: Duration,
}

impl Backoff {
    #[must_use]
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self { initial, max, current: initial }
    }

    /// Delay to wait now. Doubles the next one.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = (self.current * 2).min(self.max);
        delay
    }

    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(INITIAL_BACKOFF, MAX_BACKOFF)
    }
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),
    #[error("failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Why a connected session ended.
enum Exit {
    /// The server closed the socket or the stream ended.
    Disconnected,
    /// Every outbox sender was dropped; the client is shutting down.
    OutboxClosed,
}

// =============================================================================
// LOOP
// =============================================================================

fn lock<C>(client: &Mutex<C>) -> MutexGuard<'_, C> {
    client.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Deliver a lifecycle event and collect what the client wants to publish.
fn drive_lifecycle<C: RoomClient>(client: &Mutex<C>, event: Lifecycle) -> Vec<ClientEvent> {
    let mut out = Vec::new();
    lock(client).on_lifecycle(event, &mut out);
    out
}

/// Keep `client` connected to `url` until `outgoing` is closed.
///
/// Events published through the sender side of `outgoing` are written to
/// the socket while connected and held in the channel while not. An event
/// whose write fails is held too and goes out right after the next join.
pub async fn run_client<C>(
    url: &str,
    client: Arc<Mutex<C>>,
    mut outgoing: mpsc::UnboundedReceiver<ClientEvent>,
    mut backoff: Backoff,
) where
    C: RoomClient + Send,
{
    let mut pending: Option<ClientEvent> = None;

    loop {
        drive_lifecycle(&client, Lifecycle::Connecting);

        match connect_async(url).await {
            Ok((socket, _response)) => {
                info!(%url, "transport: connected");
                backoff.reset();
                match connect_and_run(socket, &client, &mut outgoing, &mut pending).await {
                    Ok(Exit::OutboxClosed) => {
                        info!(%url, "transport: outbox closed, stopping");
                        return;
                    }
                    Ok(Exit::Disconnected) => info!(%url, "transport: disconnected"),
                    Err(e) => warn!(%url, error = %e, "transport: connection failed"),
                }
                drive_lifecycle(&client, Lifecycle::Disconnected);
            }
            Err(e) => {
                drive_lifecycle(&client, Lifecycle::ConnectError(e.to_string()));
            }
        }

        if pending.is_none() && outgoing.is_closed() && outgoing.is_empty() {
            return;
        }

        let delay = backoff.next_delay();
        debug!(delay_ms = delay.as_millis(), "transport: reconnecting");
        tokio::time::sleep(delay).await;
    }
}

async fn connect_and_run<C: RoomClient>(
    socket: Socket,
    client: &Mutex<C>,
    outgoing: &mut mpsc::UnboundedReceiver<ClientEvent>,
    pending: &mut Option<ClientEvent>,
) -> Result<Exit, TransportError> {
    let (mut write, mut read) = socket.split();

    for event in drive_lifecycle(client, Lifecycle::Connected) {
        write.send(Message::Text(event::encode(&event)?.into())).await?;
    }
    send_held(&mut write, pending).await?;

    loop {
        tokio::select! {
            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => match event::decode_server(text.as_str()) {
                        Ok(event) => {
                            let mut guard = lock(client);
                            guard.on_server_event(event);
                        }
                        Err(e) => warn!(error = %e, "transport: undecodable server event"),
                    },
                    Some(Ok(Message::Close(_))) | None => return Ok(Exit::Disconnected),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                }
            }
            event = outgoing.recv() => {
                let Some(event) = event else {
                    let _ = write.send(Message::Close(None)).await;
                    return Ok(Exit::OutboxClosed);
                };
                *pending = Some(event);
                send_held(&mut write, pending).await?;
            }
        }
    }
}

/// Write the held event, if any. It stays held unless the write succeeds.
async fn send_held<S>(write: &mut S, pending: &mut Option<ClientEvent>) -> Result<(), TransportError>
where
    S: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    let Some(held) = pending.as_ref() else {
        return Ok(());
    };
    let text = match event::encode(held) {
        Ok(text) => text,
        Err(e) => {
            *pending = None;
            return Err(e.into());
        }
    };
    write.send(Message::Text(text.into())).await?;
    *pending = None;
    Ok(())
}

#[cfg(test)]
#[path = "transport_test.rs"]
mod tests;
