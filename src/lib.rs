//! Real-time name wall for school events.
//!
//! The server keeps one room per school: its display settings and a capped
//! roster of recently submitted student names. Admin, display and entry
//! clients join a room over a WebSocket and exchange `{event, data}` JSON
//! messages with it.

pub mod client;
pub mod config;
pub mod event;
pub mod roster;
pub mod routes;
pub mod services;
pub mod settings;
pub mod state;
pub mod validate;
