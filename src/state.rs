//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the configuration and a map of live schools keyed by URL name.
//! Each school owns its settings, its roster window, and the outbound
//! channels of the connections currently in its room. Nothing is persisted.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

use crate::config::Config;
use crate::event::ServerEvent;
use crate::roster::Roster;
use crate::settings::Settings;

// =============================================================================
// SCHOOL STATE
// =============================================================================

/// Per-school live state.
pub struct SchoolState {
    pub display_name: String,
    pub is_active: bool,
    pub settings: Settings,
    pub roster: Roster,
    /// Room members: `client_id` -> sender for outgoing events.
    pub clients: HashMap<Uuid, mpsc::Sender<ServerEvent>>,
}

impl SchoolState {
    #[must_use]
    pub fn new(display_name: impl Into<String>, roster_limit: usize) -> Self {
        Self {
            display_name: display_name.into(),
            is_active: true,
            settings: Settings::default(),
            roster: Roster::new(roster_limit),
            clients: HashMap::new(),
        }
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub schools: Arc<RwLock<HashMap<String, SchoolState>>>,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config: Arc::new(config), schools: Arc::new(RwLock::new(HashMap::new())) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
