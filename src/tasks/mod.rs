//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod round_ticker;

// Re-export main functions
pub use round_ticker::round_ticker_task;
