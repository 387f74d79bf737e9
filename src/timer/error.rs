//! Validation errors for the round timer control surface

use thiserror::Error;

/// Errors returned by `configure` and `start`
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// The configured round count is zero
    #[error("number of rounds must be at least 1")]
    RoundsMustBePositive,

    /// Configuration was attempted while the timer is not idle
    #[error("timer is running: reset it before reconfiguring")]
    TimerRunning,
}
