//! Admin client — edits a school's display settings.
//!
//! DESIGN
//! ======
//! Three copies of the settings exist here:
//! - `settings`: last snapshot known from the room (authoritative cache)
//! - `form`: what the admin is typing
//! - `preview`: what the local preview paints
//!
//! Editing the form only repaints the preview. Submitting publishes the form
//! plus the cached logo. A logo upload publishes the cached settings with the
//! new logo merged in, without waiting for a submit. A broadcast from the
//! room replaces the cache only; the form keeps what the admin typed and the
//! preview is repainted from the form plus the broadcast logo.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::client::{Outbox, RoomClient, Session};
use crate::event::{ClientEvent, ServerEvent};
use crate::settings::{Settings, Style};

pub const ADMIN_NOTICE_TTL: Duration = Duration::from_secs(5);

pub const SETTINGS_SAVED_TEXT: &str = "Settings saved";
pub const LOGO_UPLOADED_TEXT: &str = "Logo uploaded";

/// Editable subset of the settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingsForm {
    pub background_color: String,
    pub text_color: String,
    pub font_size: String,
}

impl SettingsForm {
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            background_color: settings.background_color.clone(),
            text_color: settings.text_color.clone(),
            font_size: settings.font_size.clone(),
        }
    }

    #[must_use]
    pub fn to_settings(&self, logo: Option<String>) -> Settings {
        Settings {
            background_color: self.background_color.clone(),
            text_color: self.text_color.clone(),
            font_size: self.font_size.clone(),
            logo,
        }
    }
}

impl Default for SettingsForm {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogoError {
    #[error("logo file is empty")]
    Empty,
    #[error("logo must be an image, got {0:?}")]
    NotImage(String),
}

/// Encode raw image bytes as a `data:` URI.
#[must_use]
pub fn logo_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

pub struct AdminClient {
    session: Session,
    settings: Settings,
    form: SettingsForm,
    preview: Style,
}

impl AdminClient {
    /// Start from the settings the admin page was loaded with.
    pub fn new(school_name: impl Into<String>, initial: Settings) -> Self {
        Self {
            session: Session::new(school_name, ADMIN_NOTICE_TTL),
            form: SettingsForm::from_settings(&initial),
            preview: Style::from_settings(&initial),
            settings: initial,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn form(&self) -> &SettingsForm {
        &self.form
    }

    #[must_use]
    pub fn preview(&self) -> &Style {
        &self.preview
    }

    // =========================================================================
    // LIVE PREVIEW
    // =========================================================================

    pub fn set_background_color(&mut self, value: impl Into<String>) {
        self.form.background_color = value.into();
        self.refresh_preview();
    }

    pub fn set_text_color(&mut self, value: impl Into<String>) {
        self.form.text_color = value.into();
        self.refresh_preview();
    }

    pub fn set_font_size(&mut self, value: impl Into<String>) {
        self.form.font_size = value.into();
        self.refresh_preview();
    }

    /// Put the form back to the default colors and size. Not published.
    pub fn reset_defaults(&mut self) {
        self.form = SettingsForm::default();
        self.refresh_preview();
    }

    fn refresh_preview(&mut self) {
        self.preview = Style::from_settings(&self.form.to_settings(self.settings.logo.clone()));
    }

    // =========================================================================
    // PUBLISH
    // =========================================================================

    /// Publish the form, keeping the last known logo. Returns the snapshot.
    pub fn submit(&mut self, out: &mut dyn Outbox) -> Settings {
        let snapshot = self.form.to_settings(self.settings.logo.clone());
        out.publish(ClientEvent::UpdateSchoolSettings {
            school_name: self.session.school_name().to_owned(),
            settings: snapshot.clone(),
        });
        self.preview = Style::from_settings(&snapshot);
        self.session.notify_success(SETTINGS_SAVED_TEXT);
        snapshot
    }

    /// Merge an uploaded logo into the cached settings and publish at once.
    ///
    /// # Errors
    ///
    /// Returns an error, without publishing, if the file is empty or its
    /// MIME type is not `image/*`.
    pub fn upload_logo(&mut self, mime: &str, bytes: &[u8], out: &mut dyn Outbox) -> Result<(), LogoError> {
        if bytes.is_empty() {
            self.session.notify_error(LogoError::Empty.to_string());
            return Err(LogoError::Empty);
        }
        if !mime.starts_with("image/") {
            let err = LogoError::NotImage(mime.to_owned());
            self.session.notify_error(err.to_string());
            return Err(err);
        }

        self.settings.logo = Some(logo_data_uri(mime, bytes));
        out.publish(ClientEvent::UpdateSchoolSettings {
            school_name: self.session.school_name().to_owned(),
            settings: self.settings.clone(),
        });
        self.refresh_preview();
        self.session.notify_success(LOGO_UPLOADED_TEXT);
        Ok(())
    }

    /// Ask the server to empty the roster.
    pub fn clear_names(&mut self, out: &mut dyn Outbox) {
        out.publish(ClientEvent::ClearNames { school_name: self.session.school_name().to_owned() });
    }
}

impl RoomClient for AdminClient {
    fn session(&self) -> &Session {
        &self.session
    }

    fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    fn on_server_event(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::UpdateSettings { settings } => {
                self.settings = settings;
                self.refresh_preview();
            }
            ServerEvent::Error { message, code } => self.session.on_server_error(&message, code.as_deref()),
            ServerEvent::CurrentNames { .. } | ServerEvent::NewName { .. } => {}
        }
    }
}

#[cfg(test)]
#[path = "admin_test.rs"]
mod tests;
