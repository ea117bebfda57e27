//! Domain services.
//!
//! DESIGN
//! ======
//! Services own the mutations of `AppState`; route handlers translate
//! between the wire (HTTP or websocket events) and these functions.

pub mod room;
pub mod school;
