//! Display client — the public screen of a school's room.
//!
//! Renders the broadcast settings and the roster. Every roster update
//! replaces the cached roster wholesale; only names that were not on screen
//! before get the entrance animation.

use std::time::Duration;

use crate::client::{RoomClient, Session};
use crate::event::ServerEvent;
use crate::roster;
use crate::settings::{Settings, Style};

pub const DISPLAY_NOTICE_TTL: Duration = Duration::from_secs(5);

/// Shown in place of the roster while it is empty.
pub const NO_NAMES_PLACEHOLDER: &str = "No names yet";

/// One rendered roster entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameTile {
    pub name: String,
    /// Play the entrance animation. Otherwise the tile is rendered settled:
    /// fully visible and unscaled.
    pub animate: bool,
}

pub struct DisplayClient {
    session: Session,
    settings: Settings,
    style: Style,
    names: Vec<String>,
    tiles: Vec<NameTile>,
    highlighted: Option<String>,
}

impl DisplayClient {
    /// Start from the settings the display page was loaded with.
    pub fn new(school_name: impl Into<String>, initial: Settings) -> Self {
        Self {
            session: Session::new(school_name, DISPLAY_NOTICE_TTL),
            style: Style::from_settings(&initial),
            settings: initial,
            names: Vec::new(),
            tiles: Vec::new(),
            highlighted: None,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Cached roster, newest first.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn tiles(&self) -> &[NameTile] {
        &self.tiles
    }

    /// Names animating in the current render.
    #[must_use]
    pub fn animated(&self) -> Vec<&str> {
        self.tiles.iter().filter(|t| t.animate).map(|t| t.name.as_str()).collect()
    }

    /// The name whose submission caused the latest render.
    #[must_use]
    pub fn highlighted(&self) -> Option<&str> {
        self.highlighted.as_deref()
    }

    #[must_use]
    pub fn placeholder(&self) -> Option<&'static str> {
        self.tiles.is_empty().then_some(NO_NAMES_PLACEHOLDER)
    }

    fn apply_settings(&mut self, settings: Settings) {
        self.style = Style::from_settings(&settings);
        self.settings = settings;
    }

    fn show_snapshot(&mut self, names: Vec<String>) {
        self.tiles = names.iter().map(|name| NameTile { name: name.clone(), animate: false }).collect();
        self.names = names;
        self.highlighted = None;
    }

    fn show_update(&mut self, name: String, names: Vec<String>) {
        let added = roster::added(&self.names, &names);
        self.tiles = names
            .iter()
            .map(|n| NameTile { name: n.clone(), animate: added.contains(n.as_str()) })
            .collect();
        self.names = names;
        self.highlighted = Some(name);
    }
}

impl RoomClient for DisplayClient {
    fn session(&self) -> &Session {
        &self.session
    }

    fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    fn on_server_event(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::UpdateSettings { settings } => self.apply_settings(settings),
            ServerEvent::CurrentNames { names } => self.show_snapshot(names),
            ServerEvent::NewName { name, names } => self.show_update(name, names),
            ServerEvent::Error { message, code } => self.session.on_server_error(&message, code.as_deref()),
        }
    }
}

#[cfg(test)]
#[path = "display_test.rs"]
mod tests;
