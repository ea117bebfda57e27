//! School service — create, list, inspect, toggle and delete schools.
//!
//! DESIGN
//! ======
//! A school is addressed by its URL name, derived from the submitted name by
//! `validate::school_slug`. The display name is free text and falls back to
//! the submitted name. Schools live only in memory.

use serde::Serialize;
use tracing::{info, warn};

use crate::event::{ErrorCode, ServerEvent};
use crate::settings::{Settings, SettingsError};
use crate::state::{AppState, SchoolState};
use crate::validate::{self, NameError};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SchoolError {
    #[error("school not found: {0}")]
    NotFound(String),
    #[error("school already exists: {0}")]
    AlreadyExists(String),
    #[error("school is not active: {0}")]
    Inactive(String),
    #[error("incomplete data")]
    Incomplete,
    #[error(transparent)]
    InvalidName(#[from] NameError),
    #[error(transparent)]
    InvalidSettings(#[from] SettingsError),
}

impl ErrorCode for SchoolError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_SCHOOL_NOT_FOUND",
            Self::AlreadyExists(_) => "E_SCHOOL_EXISTS",
            Self::Inactive(_) => "E_SCHOOL_INACTIVE",
            Self::Incomplete => "E_INCOMPLETE",
            Self::InvalidName(e) => e.error_code(),
            Self::InvalidSettings(e) => e.error_code(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchoolSummary {
    pub name: String,
    pub display_name: String,
    pub is_active: bool,
    pub total_names: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchoolDetail {
    #[serde(flatten)]
    pub summary: SchoolSummary,
    pub settings: Settings,
    pub recent_names: Vec<String>,
}

fn summarize(name: &str, school: &SchoolState) -> SchoolSummary {
    SchoolSummary {
        name: name.to_owned(),
        display_name: school.display_name.clone(),
        is_active: school.is_active,
        total_names: school.roster.total(),
    }
}

// =============================================================================
// CRUD
// =============================================================================

/// Create a school from a human-entered name.
///
/// # Errors
///
/// Returns `InvalidName` if the name fails validation, or `AlreadyExists` if
/// a school with the same URL name is present.
pub async fn create_school(
    state: &AppState,
    school_name: &str,
    display_name: Option<&str>,
) -> Result<SchoolSummary, SchoolError> {
    validate::validate_school_name(school_name)?;

    let url_name = validate::school_slug(school_name);
    let display_name = display_name
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| school_name.trim());

    let mut schools = state.schools.write().await;
    if schools.contains_key(&url_name) {
        return Err(SchoolError::AlreadyExists(url_name));
    }
    let school = SchoolState::new(display_name, state.config.roster_limit);
    let summary = summarize(&url_name, &school);
    schools.insert(url_name.clone(), school);

    info!(school = %url_name, %display_name, "school created");
    Ok(summary)
}

/// All schools, ordered by URL name.
pub async fn list_schools(state: &AppState) -> Vec<SchoolSummary> {
    let schools = state.schools.read().await;
    let mut list: Vec<SchoolSummary> = schools.iter().map(|(name, s)| summarize(name, s)).collect();
    list.sort_by(|a, b| a.name.cmp(&b.name));
    list
}

/// # Errors
///
/// Returns `NotFound` if no such school exists.
pub async fn get_school(state: &AppState, name: &str) -> Result<SchoolDetail, SchoolError> {
    let schools = state.schools.read().await;
    let school = schools.get(name).ok_or_else(|| SchoolError::NotFound(name.to_owned()))?;
    Ok(SchoolDetail {
        summary: summarize(name, school),
        settings: school.settings.clone(),
        recent_names: school.roster.snapshot(),
    })
}

/// Flip a school between active and inactive.
///
/// # Errors
///
/// Returns `NotFound` if no such school exists.
pub async fn toggle_school(state: &AppState, name: &str) -> Result<SchoolSummary, SchoolError> {
    let mut schools = state.schools.write().await;
    let school = schools.get_mut(name).ok_or_else(|| SchoolError::NotFound(name.to_owned()))?;
    school.is_active = !school.is_active;
    info!(school = %name, is_active = school.is_active, "school toggled");
    Ok(summarize(name, school))
}

/// Remove a school. Connected room members are told the school is gone.
///
/// # Errors
///
/// Returns `NotFound` if no such school exists.
pub async fn delete_school(state: &AppState, name: &str) -> Result<(), SchoolError> {
    let removed = state.schools.write().await.remove(name);
    let Some(school) = removed else {
        return Err(SchoolError::NotFound(name.to_owned()));
    };

    let notice = ServerEvent::error_from(&SchoolError::NotFound(name.to_owned()));
    for tx in school.clients.values() {
        let _ = tx.try_send(notice.clone());
    }
    info!(school = %name, members = school.clients.len(), "school deleted");
    Ok(())
}

/// Create the configured startup schools. Existing ones are left alone.
pub async fn seed_schools(state: &AppState, names: &[String]) {
    for name in names {
        match create_school(state, name, None).await {
            Ok(_) | Err(SchoolError::AlreadyExists(_)) => {}
            Err(e) => warn!(school = %name, error = %e, "skipping seed school"),
        }
    }
}

#[cfg(test)]
#[path = "school_test.rs"]
mod tests;
