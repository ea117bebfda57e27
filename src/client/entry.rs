//! Entry client — the kiosk where a student types their name.
//!
//! The input stays focused after every submission so the next student can
//! type right away. Validation beyond "not blank" happens on the server.

use std::time::Duration;

use crate::client::{Outbox, RoomClient, Session};
use crate::event::{ClientEvent, ServerEvent};

pub const ENTRY_NOTICE_TTL: Duration = Duration::from_secs(3);

pub const NAME_SUBMITTED_TEXT: &str = "Name submitted";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryError {
    #[error("please enter a name")]
    EmptyName,
}

pub struct EntryClient {
    session: Session,
    input: String,
    focused: bool,
}

impl EntryClient {
    pub fn new(school_name: impl Into<String>) -> Self {
        Self { session: Session::new(school_name, ENTRY_NOTICE_TTL), input: String::new(), focused: true }
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input = value.into();
    }

    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Publish the trimmed input. Returns the submitted name.
    ///
    /// # Errors
    ///
    /// Returns [`EntryError::EmptyName`], without publishing, when the input
    /// is blank after trimming. The input is left as typed.
    pub fn submit(&mut self, out: &mut dyn Outbox) -> Result<String, EntryError> {
        let name = self.input.trim();
        if name.is_empty() {
            self.session.notify_error(EntryError::EmptyName.to_string());
            return Err(EntryError::EmptyName);
        }

        let name = name.to_owned();
        out.publish(ClientEvent::SubmitName { school_name: self.session.school_name().to_owned(), name: name.clone() });
        self.input.clear();
        self.focused = true;
        self.session.notify_success(NAME_SUBMITTED_TEXT);
        Ok(name)
    }
}

impl RoomClient for EntryClient {
    fn session(&self) -> &Session {
        &self.session
    }

    fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    fn on_server_event(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::Error { message, code } => self.session.on_server_error(&message, code.as_deref()),
            ServerEvent::UpdateSettings { .. } | ServerEvent::CurrentNames { .. } | ServerEvent::NewName { .. } => {}
        }
    }
}

#[cfg(test)]
#[path = "entry_test.rs"]
mod tests;
