//! Event — the message types of the room channel.
//!
//! ARCHITECTURE
//! ============
//! Every message between a client and the room server is one JSON text frame
//! shaped `{"event": <name>, "data": <payload>}`. Clients send `ClientEvent`s,
//! the server answers and broadcasts `ServerEvent`s. Rooms are keyed by the
//! school's URL name, which client events carry explicitly.
//!
//! DESIGN
//! ======
//! - Both directions are closed enums, so an unknown event name is a parse
//!   error rather than a silently ignored frame.
//! - Errors reported over the wire carry a grepable code next to the human
//!   message; any typed error implementing `ErrorCode` can be converted.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

// =============================================================================
// CLIENT -> SERVER
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Subscribe to a school's room.
    Join { school_name: String },
    /// Admin pushes a new settings snapshot. A missing snapshot means
    /// defaults.
    UpdateSchoolSettings {
        school_name: String,
        #[serde(default)]
        settings: Settings,
    },
    /// Entry client adds a name. Missing fields decode as empty and are
    /// rejected as incomplete by the room.
    SubmitName {
        #[serde(default)]
        school_name: String,
        #[serde(default)]
        name: String,
    },
    /// Admin empties the roster.
    ClearNames { school_name: String },
}

impl ClientEvent {
    /// Wire name of the event.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Join { .. } => "join",
            Self::UpdateSchoolSettings { .. } => "update_school_settings",
            Self::SubmitName { .. } => "submit_name",
            Self::ClearNames { .. } => "clear_names",
        }
    }

    /// Room the event is scoped to.
    #[must_use]
    pub fn school_name(&self) -> &str {
        match self {
            Self::Join { school_name }
            | Self::UpdateSchoolSettings { school_name, .. }
            | Self::SubmitName { school_name, .. }
            | Self::ClearNames { school_name } => school_name,
        }
    }
}

// =============================================================================
// SERVER -> CLIENT
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Current or changed settings for the room.
    UpdateSettings { settings: Settings },
    /// Full roster snapshot, sent on join and after a clear.
    CurrentNames { names: Vec<String> },
    /// Roster after one submission, with the name just added.
    NewName { name: String, names: Vec<String> },
    /// Server-reported failure. Sent to the originating client only.
    Error {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<String>,
    },
}

impl ServerEvent {
    /// Plain error without a code.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error { message: message.into(), code: None }
    }

    /// Structured error from a typed error.
    #[must_use]
    pub fn error_from(err: &(impl ErrorCode + ?Sized)) -> Self {
        Self::Error { message: err.to_string(), code: Some(err.error_code().to_owned()) }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::UpdateSettings { .. } => "update_settings",
            Self::CurrentNames { .. } => "current_names",
            Self::NewName { .. } => "new_name",
            Self::Error { .. } => "error",
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

// =============================================================================
// ERROR CODES
// =============================================================================

/// Grepable error code for structured error events.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;
}

// =============================================================================
// CODEC
// =============================================================================

#[derive(Debug, thiserror::Error)]
#[error("invalid event: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

impl ErrorCode for DecodeError {
    fn error_code(&self) -> &'static str {
        "E_INVALID_EVENT"
    }
}

/// Parse one inbound text frame from a client.
///
/// # Errors
///
/// Returns an error if the text is not a well-formed client event.
pub fn decode_client(text: &str) -> Result<ClientEvent, DecodeError> {
    Ok(serde_json::from_str(text)?)
}

/// Parse one inbound text frame from the server.
///
/// # Errors
///
/// Returns an error if the text is not a well-formed server event.
pub fn decode_server(text: &str) -> Result<ServerEvent, DecodeError> {
    Ok(serde_json::from_str(text)?)
}

/// Serialize any event to its text frame.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode<T: Serialize>(event: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(event)
}

#[cfg(test)]
#[path = "event_test.rs"]
mod tests;
