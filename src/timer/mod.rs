//! Round timer core
//!
//! The countdown state machine and its validation errors. Everything here is
//! synchronous and free of I/O; the async driver lives in `tasks`.

pub mod error;
pub mod machine;

// Re-export main types
pub use error::ValidationError;
pub use machine::{Phase, RoundTimer, TimerConfig, TimerSnapshot};
