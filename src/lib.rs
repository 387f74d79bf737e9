//! Round Bell - a state-managed HTTP server driving a boxing round timer
//!
//! This library provides a countdown state machine alternating work and rest
//! phases across a configured number of rounds, a background task ticking it
//! once per second, and an HTTP control surface over both.

pub mod api;
pub mod config;
pub mod state;
pub mod tasks;
pub mod timer;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use state::AppState;
pub use tasks::round_ticker_task;
pub use timer::{Phase, RoundTimer, TimerConfig, TimerSnapshot, ValidationError};
pub use utils::shutdown_signal;
