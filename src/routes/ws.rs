//! WebSocket handler — bidirectional event relay.
//!
//! DESIGN
//! ======
//! On upgrade, generates a client ID and enters a `select!` loop:
//! - Incoming client events → parse + dispatch by event name
//! - Broadcast events from room peers → forward to client
//!
//! Handlers are pure business logic — they validate, mutate state, and
//! return an `Outcome`. The dispatch layer owns all outbound concerns:
//! reply to sender, broadcast to the room, or an error event.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → wait for `join`
//! 2. Client sends events → dispatch → handler returns Outcome
//! 3. Dispatch applies Outcome (reply / broadcast)
//! 4. Close → leave the joined room

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::event::{self, ClientEvent, ErrorCode, ServerEvent};
use crate::services;
use crate::services::school::SchoolError;
use crate::state::AppState;

/// Outbound buffer per connection. Broadcasts to a full buffer are dropped.
const CLIENT_CHANNEL_CAPACITY: usize = 256;

// =============================================================================
// OUTCOME
// =============================================================================

/// Result returned by handler functions. The dispatch layer uses this to
/// decide who receives what — handlers never send events directly.
#[derive(Debug)]
enum Outcome {
    /// Send these events to the sender only, in order.
    Reply(Vec<ServerEvent>),
    /// Send the event to every member of the school's room. The sender gets
    /// a copy only if it is a member.
    Broadcast { school_name: String, event: ServerEvent },
}

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    let limit = state.config.max_message_bytes();
    ws.max_message_size(limit)
        .on_upgrade(move |socket| run_ws(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let client_id = Uuid::new_v4();

    // Per-connection channel for receiving broadcast events from the room.
    let (client_tx, mut client_rx) = mpsc::channel::<ServerEvent>(CLIENT_CHANNEL_CAPACITY);

    info!(%client_id, "ws: client connected");

    // Track which school room this client has joined.
    let mut current_school: Option<String> = None;

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(msg) = msg else { break };
                let Ok(msg) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        let replies = process_inbound_text(&state, &mut current_school, client_id, &client_tx, &text).await;
                        for event in replies {
                            let _ = send_event(&mut socket, &event).await;
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Some(event) = client_rx.recv() => {
                if send_event(&mut socket, &event).await.is_err() {
                    break;
                }
            }
        }
    }

    if let Some(school_name) = current_school {
        services::room::part_room(&state, &school_name, client_id).await;
    }
    info!(%client_id, "ws: client disconnected");
}

// =============================================================================
// EVENT DISPATCH
// =============================================================================

/// Parse and process one inbound text frame and return events for the sender.
///
/// This keeps the websocket transport concerns separate from event handling,
/// so tests can exercise dispatch end-to-end without a socket.
async fn process_inbound_text(
    state: &AppState,
    current_school: &mut Option<String>,
    client_id: Uuid,
    client_tx: &mpsc::Sender<ServerEvent>,
    text: &str,
) -> Vec<ServerEvent> {
    let event = match event::decode_client(text) {
        Ok(event) => event,
        Err(e) => {
            warn!(%client_id, error = %e, "ws: invalid inbound event");
            return vec![ServerEvent::error_from(&e)];
        }
    };

    info!(%client_id, event = event.name(), school = %event.school_name(), "ws: recv event");

    let result = match event {
        ClientEvent::Join { school_name } => {
            handle_join(state, current_school, client_id, client_tx, school_name).await
        }
        ClientEvent::SubmitName { school_name, name } => services::room::submit_name(state, &school_name, &name)
            .await
            .map(|event| Outcome::Broadcast { school_name, event }),
        ClientEvent::UpdateSchoolSettings { school_name, settings } => {
            services::room::update_settings(state, &school_name, settings)
                .await
                .map(|event| Outcome::Broadcast { school_name, event })
        }
        ClientEvent::ClearNames { school_name } => services::room::clear_names(state, &school_name)
            .await
            .map(|event| Outcome::Broadcast { school_name, event }),
    };

    // Apply outcome — the dispatch layer owns all outbound logic.
    match result {
        Ok(Outcome::Reply(events)) => events,
        Ok(Outcome::Broadcast { school_name, event }) => {
            services::room::broadcast(state, &school_name, &event, None).await;
            Vec::new()
        }
        Err(e) => {
            warn!(%client_id, code = e.error_code(), error = %e, "ws: request rejected");
            vec![ServerEvent::error_from(&e)]
        }
    }
}

// =============================================================================
// JOIN HANDLER
// =============================================================================

async fn handle_join(
    state: &AppState,
    current_school: &mut Option<String>,
    client_id: Uuid,
    client_tx: &mpsc::Sender<ServerEvent>,
    school_name: String,
) -> Result<Outcome, SchoolError> {
    // Leave the current room if switching to a different one.
    if let Some(old) = current_school.take_if(|old| *old != school_name) {
        services::room::part_room(state, &old, client_id).await;
    }

    let snapshot = services::room::join_room(state, &school_name, client_id, client_tx.clone()).await?;
    *current_school = Some(school_name);

    Ok(Outcome::Reply(vec![
        ServerEvent::CurrentNames { names: snapshot.names },
        ServerEvent::UpdateSettings { settings: snapshot.settings },
    ]))
}

// =============================================================================
// HELPERS
// =============================================================================

async fn send_event(socket: &mut WebSocket, event: &ServerEvent) -> Result<(), ()> {
    let json = match event::encode(event) {
        Ok(j) => j,
        Err(e) => {
            warn!(error = %e, "ws: failed to serialize event");
            return Err(());
        }
    };
    if let ServerEvent::Error { message, code } = event {
        warn!(event = event.name(), code = code.as_deref().unwrap_or("-"), %message, "ws: send error event");
    } else {
        info!(event = event.name(), "ws: send event");
    }
    socket.send(Message::Text(json.into())).await.map_err(|_| ())
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
