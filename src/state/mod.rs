//! State management module
//!
//! Shared application state wiring the timer core to the HTTP handlers and
//! the background ticker.

pub mod app_state;

// Re-export main types
pub use app_state::{AppState, ControlError};
