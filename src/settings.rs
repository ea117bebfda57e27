//! Display settings — the snapshot an admin pushes to a school's room.
//!
//! DESIGN
//! ======
//! `Settings` is the wire shape: every field has a default so partial
//! payloads deserialize the way the server has always treated them. `Style`
//! is the render-side view of the same snapshot: what a display or preview
//! should actually paint, with empty strings replaced by defaults and the
//! logo present only when there is something to show.

use serde::{Deserialize, Serialize};

// =============================================================================
// DEFAULTS
// =============================================================================

pub const DEFAULT_BACKGROUND_COLOR: &str = "#ffffff";
pub const DEFAULT_TEXT_COLOR: &str = "#000000";
pub const DEFAULT_FONT_SIZE: &str = "24px";

/// Upper bound on an encoded logo when no configuration says otherwise.
pub const DEFAULT_MAX_LOGO_BYTES: usize = 2 * 1024 * 1024;

// =============================================================================
// SETTINGS
// =============================================================================

/// Per-school display customization. Last write wins; no versioning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub background_color: String,
    pub text_color: String,
    pub font_size: String,
    /// Logo as a `data:` URI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            background_color: DEFAULT_BACKGROUND_COLOR.into(),
            text_color: DEFAULT_TEXT_COLOR.into(),
            font_size: DEFAULT_FONT_SIZE.into(),
            logo: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("logo must be a data URI")]
    LogoNotDataUri,
    #[error("logo is too large ({len} bytes, max {max})")]
    LogoTooLarge { len: usize, max: usize },
}

impl crate::event::ErrorCode for SettingsError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::LogoNotDataUri => "E_LOGO_FORMAT",
            Self::LogoTooLarge { .. } => "E_LOGO_TOO_LARGE",
        }
    }
}

impl Settings {
    /// True when the snapshot carries a non-empty logo.
    #[must_use]
    pub fn has_logo(&self) -> bool {
        self.logo.as_deref().is_some_and(|logo| !logo.is_empty())
    }

    /// Collapse an empty logo string to `None`.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if !self.has_logo() {
            self.logo = None;
        }
        self
    }

    /// Check the logo against the server's acceptance rules.
    ///
    /// # Errors
    ///
    /// Returns an error if the logo is not a `data:` URI or is longer than
    /// `max_logo_bytes`.
    pub fn validate(&self, max_logo_bytes: usize) -> Result<(), SettingsError> {
        let Some(logo) = self.logo.as_deref().filter(|logo| !logo.is_empty()) else {
            return Ok(());
        };
        if !logo.starts_with("data:") {
            return Err(SettingsError::LogoNotDataUri);
        }
        if logo.len() > max_logo_bytes {
            return Err(SettingsError::LogoTooLarge { len: logo.len(), max: max_logo_bytes });
        }
        Ok(())
    }
}

// =============================================================================
// STYLE
// =============================================================================

/// What a display or preview paints for a given settings snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    pub background_color: String,
    pub text_color: String,
    pub font_size: String,
    /// Image source for the logo element. `None` hides the element.
    pub logo: Option<String>,
}

impl Style {
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            background_color: or_default(&settings.background_color, DEFAULT_BACKGROUND_COLOR),
            text_color: or_default(&settings.text_color, DEFAULT_TEXT_COLOR),
            font_size: or_default(&settings.font_size, DEFAULT_FONT_SIZE),
            logo: settings.logo.clone().filter(|logo| !logo.is_empty()),
        }
    }

    #[must_use]
    pub fn logo_visible(&self) -> bool {
        self.logo.is_some()
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

fn or_default(value: &str, default: &str) -> String {
    if value.is_empty() { default.to_owned() } else { value.to_owned() }
}

// =============================================================================
// TESTS
// =============================================================================
