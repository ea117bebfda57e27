//! Client-side room controllers.
//!
//! DESIGN
//! ======
//! Each role (admin, display, entry) is a plain state object mutated through
//! `&mut self` on a single thread. Outbound events go through an `Outbox`;
//! inbound events and connection lifecycle changes arrive through the
//! `RoomClient` trait, which is all a transport needs to drive any role.
//! Rendering is expressed as view models (`Style`, name tiles, notices) that
//! a UI layer paints verbatim.
//!
//! The shared `Session` owns the room name, the connection status and the
//! current transient notice, and implements the join-on-connect rule every
//! role follows.

pub mod admin;
pub mod display;
pub mod entry;
pub mod transport;

use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::event::{ClientEvent, ServerEvent};

// =============================================================================
// OUTBOX
// =============================================================================

/// Sink for events a client publishes to its room.
pub trait Outbox {
    fn publish(&mut self, event: ClientEvent);
}

impl Outbox for Vec<ClientEvent> {
    fn publish(&mut self, event: ClientEvent) {
        self.push(event);
    }
}

impl Outbox for mpsc::UnboundedSender<ClientEvent> {
    fn publish(&mut self, event: ClientEvent) {
        if let Err(e) = self.send(event) {
            warn!(event = e.0.name(), "client: outbox closed, event dropped");
        }
    }
}

// =============================================================================
// CONNECTION
// =============================================================================

/// WebSocket connection status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// Transport-level lifecycle events delivered to a client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Connecting,
    Connected,
    Disconnected,
    ConnectError(String),
}

// =============================================================================
// NOTICES
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient user-facing message. A newer notice replaces an older one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    pub shown_at: Instant,
    pub ttl: Duration,
}

impl Notice {
    pub fn success(text: impl Into<String>, ttl: Duration) -> Self {
        Self { kind: NoticeKind::Success, text: text.into(), shown_at: Instant::now(), ttl }
    }

    pub fn error(text: impl Into<String>, ttl: Duration) -> Self {
        Self { kind: NoticeKind::Error, text: text.into(), shown_at: Instant::now(), ttl }
    }

    #[must_use]
    pub fn is_visible_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) < self.ttl
    }
}

pub const DISCONNECTED_TEXT: &str = "Disconnected from server";
pub const CONNECT_ERROR_TEXT: &str = "Could not connect to server";

// =============================================================================
// SESSION
// =============================================================================

/// State every role shares: room, connection status, current notice.
#[derive(Clone, Debug)]
pub struct Session {
    school_name: String,
    status: ConnectionStatus,
    notice: Option<Notice>,
    notice_ttl: Duration,
}

impl Session {
    pub fn new(school_name: impl Into<String>, notice_ttl: Duration) -> Self {
        Self { school_name: school_name.into(), status: ConnectionStatus::default(), notice: None, notice_ttl }
    }

    #[must_use]
    pub fn school_name(&self) -> &str {
        &self.school_name
    }

    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    /// Most recent notice, expired or not.
    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// The notice a UI should show at `now`.
    #[must_use]
    pub fn visible_notice(&self, now: Instant) -> Option<&Notice> {
        self.notice.as_ref().filter(|n| n.is_visible_at(now))
    }

    pub fn notify_success(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice::success(text, self.notice_ttl));
    }

    pub fn notify_error(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice::error(text, self.notice_ttl));
    }

    #[must_use]
    pub fn join_event(&self) -> ClientEvent {
        ClientEvent::Join { school_name: self.school_name.clone() }
    }

    /// Join on every connect, since room membership does not survive a
    /// transport reconnect. Failures only surface a notice.
    pub fn on_lifecycle(&mut self, event: Lifecycle, out: &mut dyn Outbox) {
        match event {
            Lifecycle::Connecting => self.status = ConnectionStatus::Connecting,
            Lifecycle::Connected => {
                self.status = ConnectionStatus::Connected;
                info!(school = %self.school_name, "client: connected, joining room");
                out.publish(self.join_event());
            }
            Lifecycle::Disconnected => {
                self.status = ConnectionStatus::Disconnected;
                self.notify_error(DISCONNECTED_TEXT);
            }
            Lifecycle::ConnectError(reason) => {
                self.status = ConnectionStatus::Disconnected;
                warn!(school = %self.school_name, %reason, "client: connect error");
                self.notify_error(CONNECT_ERROR_TEXT);
            }
        }
    }

    /// Log and surface a server-reported error. No retry.
    pub fn on_server_error(&mut self, message: &str, code: Option<&str>) {
        warn!(school = %self.school_name, code = code.unwrap_or("-"), %message, "client: server error");
        self.notify_error(message);
    }
}

// =============================================================================
// ROOM CLIENT
// =============================================================================

/// What a transport needs to drive a role.
pub trait RoomClient {
    fn session(&self) -> &Session;

    fn session_mut(&mut self) -> &mut Session;

    /// Apply one event received from the room.
    fn on_server_event(&mut self, event: ServerEvent);

    fn on_lifecycle(&mut self, event: Lifecycle, out: &mut dyn Outbox) {
        self.session_mut().on_lifecycle(event, out);
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
