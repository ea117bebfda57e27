//! Room service — join/part, roster and settings mutations, broadcast.
//!
//! DESIGN
//! ======
//! A room is the set of connections subscribed to one school. Mutations
//! update the school's state under the write lock and return the event the
//! caller should fan out; the websocket layer decides who receives what.
//!
//! Joining is idempotent: a connection is keyed by its client id, so a
//! re-join after reconnect replaces the old sender instead of adding a
//! second member.

use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

use crate::event::ServerEvent;
use crate::services::school::SchoolError;
use crate::settings::Settings;
use crate::state::AppState;
use crate::validate;

/// What a joining client is told about the room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSnapshot {
    pub names: Vec<String>,
    pub settings: Settings,
}

// =============================================================================
// JOIN / PART
// =============================================================================

/// Add a connection to a school's room and return the room's current state.
///
/// # Errors
///
/// Returns `NotFound` if the school does not exist.
pub async fn join_room(
    state: &AppState,
    school_name: &str,
    client_id: Uuid,
    tx: mpsc::Sender<ServerEvent>,
) -> Result<RoomSnapshot, SchoolError> {
    let mut schools = state.schools.write().await;
    let school = schools
        .get_mut(school_name)
        .ok_or_else(|| SchoolError::NotFound(school_name.to_owned()))?;

    school.clients.insert(client_id, tx);
    info!(school = %school_name, %client_id, members = school.clients.len(), "client joined room");

    Ok(RoomSnapshot { names: school.roster.snapshot(), settings: school.settings.clone() })
}

/// Remove a connection from a school's room. Unknown schools are ignored.
pub async fn part_room(state: &AppState, school_name: &str, client_id: Uuid) {
    let mut schools = state.schools.write().await;
    let Some(school) = schools.get_mut(school_name) else {
        return;
    };
    if school.clients.remove(&client_id).is_some() {
        info!(school = %school_name, %client_id, remaining = school.clients.len(), "client left room");
    }
}

// =============================================================================
// MUTATIONS
// =============================================================================

/// Validate and record a submitted name. Returns the `new_name` event for
/// the room.
///
/// # Errors
///
/// Returns `Incomplete` for a blank school or name, `InvalidName` if the
/// name fails validation, `NotFound` or `Inactive` if the school cannot
/// accept names.
pub async fn submit_name(state: &AppState, school_name: &str, name: &str) -> Result<ServerEvent, SchoolError> {
    let name = name.trim();
    if school_name.is_empty() || name.is_empty() {
        return Err(SchoolError::Incomplete);
    }
    validate::validate_student_name(name)?;

    let mut schools = state.schools.write().await;
    let school = schools
        .get_mut(school_name)
        .ok_or_else(|| SchoolError::NotFound(school_name.to_owned()))?;
    if !school.is_active {
        return Err(SchoolError::Inactive(school_name.to_owned()));
    }

    school.roster.push(name);
    info!(school = %school_name, %name, total = school.roster.total(), "name submitted");

    Ok(ServerEvent::NewName { name: name.to_owned(), names: school.roster.snapshot() })
}

/// Store a settings snapshot. Returns the `update_settings` event for the
/// room.
///
/// # Errors
///
/// Returns `NotFound` if the school does not exist, or `InvalidSettings` if
/// the logo is rejected.
pub async fn update_settings(
    state: &AppState,
    school_name: &str,
    settings: Settings,
) -> Result<ServerEvent, SchoolError> {
    let settings = settings.normalized();
    settings.validate(state.config.max_logo_bytes)?;

    let mut schools = state.schools.write().await;
    let school = schools
        .get_mut(school_name)
        .ok_or_else(|| SchoolError::NotFound(school_name.to_owned()))?;

    school.settings = settings.clone();
    info!(school = %school_name, has_logo = settings.has_logo(), "settings updated");

    Ok(ServerEvent::UpdateSettings { settings })
}

/// Empty a school's roster. Returns the empty `current_names` event for the
/// room.
///
/// # Errors
///
/// Returns `NotFound` if the school does not exist.
pub async fn clear_names(state: &AppState, school_name: &str) -> Result<ServerEvent, SchoolError> {
    let mut schools = state.schools.write().await;
    let school = schools
        .get_mut(school_name)
        .ok_or_else(|| SchoolError::NotFound(school_name.to_owned()))?;

    school.roster.clear();
    info!(school = %school_name, "roster cleared");

    Ok(ServerEvent::CurrentNames { names: Vec::new() })
}

// =============================================================================
// BROADCAST
// =============================================================================

/// Send an event to every member of a school's room, optionally excluding one.
pub async fn broadcast(state: &AppState, school_name: &str, event: &ServerEvent, exclude: Option<Uuid>) {
    let schools = state.schools.read().await;
    let Some(school) = schools.get(school_name) else {
        return;
    };

    for (client_id, tx) in &school.clients {
        if exclude == Some(*client_id) {
            continue;
        }
        // Best-effort: if a client's channel is full, skip it.
        let _ = tx.try_send(event.clone());
    }
}

#[cfg(test)]
#[path = "room_test.rs"]
mod tests;
