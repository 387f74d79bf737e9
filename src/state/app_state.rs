//! Shared application state
//!
//! `AppState` owns the round timer behind a mutex and publishes a snapshot
//! after every mutation: control operations notify the ticker task over a
//! broadcast channel, and every change (ticks included) lands on a watch
//! channel for the status endpoint.

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::{broadcast, watch};
use tracing::{error, info, warn};

use crate::timer::{RoundTimer, TimerConfig, TimerSnapshot, ValidationError};

/// Errors surfaced by the control surface
#[derive(Debug, Error)]
pub enum ControlError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to lock timer state: {0}")]
    Lock(String),
}

/// Main application state shared between the HTTP handlers and the ticker
#[derive(Debug)]
pub struct AppState {
    /// The round timer, single writer at a time via the mutex
    timer: Arc<Mutex<RoundTimer>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    last_action: Arc<Mutex<Option<String>>>,
    last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Control change notifications, drives the ticker task
    pub control_tx: broadcast::Sender<TimerSnapshot>,
    /// Live snapshot feed for status readers
    snapshot_tx: watch::Sender<TimerSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    _snapshot_rx: watch::Receiver<TimerSnapshot>,
}

impl AppState {
    /// Create a new AppState holding an idle timer with the given configuration
    pub fn new(port: u16, host: String, config: TimerConfig) -> Self {
        let (control_tx, _) = broadcast::channel(100);
        let (snapshot_tx, snapshot_rx) = watch::channel(TimerSnapshot::idle(config.rounds));

        Self {
            timer: Arc::new(Mutex::new(RoundTimer::new(config))),
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            control_tx,
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
        }
    }

    /// Apply a control operation to the timer and notify listeners
    fn mutate<F>(&self, action: &str, op: F) -> Result<TimerSnapshot, ControlError>
    where
        F: FnOnce(&mut RoundTimer) -> Result<(), ValidationError>,
    {
        let mut timer = self
            .timer
            .lock()
            .map_err(|e| ControlError::Lock(e.to_string()))?;

        op(&mut timer)?;
        let snapshot = timer.snapshot();
        drop(timer); // Release the lock before notifying

        // Update last action tracking
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        self.publish_snapshot(snapshot.clone());

        // Wake the ticker task (this starts or halts the countdown)
        if let Err(e) = self.control_tx.send(snapshot.clone()) {
            warn!("Failed to send control notification: {}", e);
        }

        Ok(snapshot)
    }

    /// Replace the timer configuration; only permitted while idle
    pub fn configure(&self, config: TimerConfig) -> Result<TimerSnapshot, ControlError> {
        info!(
            "Configuring timer: rounds={}, round={}s, rest={}s",
            config.rounds, config.round_secs, config.rest_secs
        );
        self.mutate("configure", |timer| timer.configure(config))
    }

    /// Start the countdown at round 1
    pub fn start(&self) -> Result<TimerSnapshot, ControlError> {
        info!("Starting round timer");
        self.mutate("start", |timer| timer.start())
    }

    /// Pause the countdown, keeping the remaining time
    pub fn pause(&self) -> Result<TimerSnapshot, ControlError> {
        info!("Pausing round timer");
        self.mutate("pause", |timer| {
            timer.pause();
            Ok(())
        })
    }

    /// Resume a paused countdown
    pub fn resume(&self) -> Result<TimerSnapshot, ControlError> {
        info!("Resuming round timer");
        self.mutate("resume", |timer| {
            timer.resume();
            Ok(())
        })
    }

    /// Stop any countdown and return to idle
    pub fn reset(&self) -> Result<TimerSnapshot, ControlError> {
        info!("Resetting round timer");
        self.mutate("reset", |timer| {
            timer.reset();
            Ok(())
        })
    }

    /// Advance the countdown by one second, called by the ticker task
    ///
    /// Re-checks that the timer is still running and unpaused under the lock,
    /// so an interval tick that raced with a pause, reset, or restart is
    /// discarded instead of mutating the fresh state. Returns `None` when the
    /// tick was discarded.
    pub fn advance_tick(&self) -> Option<TimerSnapshot> {
        let mut timer = match self.timer.lock() {
            Ok(timer) => timer,
            Err(e) => {
                error!("Failed to lock timer state for tick: {}", e);
                return None;
            }
        };

        if !timer.is_ticking() {
            return None;
        }

        timer.tick();
        let snapshot = timer.snapshot();
        drop(timer);

        self.publish_snapshot(snapshot.clone());
        Some(snapshot)
    }

    /// Get the current timer snapshot
    pub fn get_snapshot(&self) -> Result<TimerSnapshot, ControlError> {
        self.timer
            .lock()
            .map(|timer| timer.snapshot())
            .map_err(|e| ControlError::Lock(e.to_string()))
    }

    /// Subscribe to the live snapshot feed
    pub fn subscribe_snapshots(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshot_tx.subscribe()
    }

    fn publish_snapshot(&self, snapshot: TimerSnapshot) {
        if let Err(e) = self.snapshot_tx.send(snapshot) {
            warn!("Failed to send snapshot update: {}", e);
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::Phase;

    fn state() -> AppState {
        AppState::new(0, "127.0.0.1".to_string(), TimerConfig::new(2, 3, 2))
    }

    #[test]
    fn control_operations_publish_snapshots() {
        let state = state();
        let rx = state.subscribe_snapshots();

        let snap = state.start().unwrap();
        assert_eq!(snap.phase, Phase::Working);
        assert_eq!(rx.borrow().phase, Phase::Working);

        state.pause().unwrap();
        assert!(rx.borrow().paused);

        state.reset().unwrap();
        let snap = rx.borrow().clone();
        assert_eq!(snap.phase, Phase::Idle);
        assert_eq!(snap.remaining_secs, 0);
    }

    #[test]
    fn configure_while_running_is_rejected() {
        let state = state();
        state.start().unwrap();

        let err = state.configure(TimerConfig::new(5, 60, 30)).unwrap_err();
        assert!(matches!(
            err,
            ControlError::Validation(ValidationError::TimerRunning)
        ));
    }

    #[test]
    fn configure_rejects_zero_rounds_without_state_change() {
        let state = state();
        let err = state.configure(TimerConfig::new(0, 60, 30)).unwrap_err();
        assert!(matches!(
            err,
            ControlError::Validation(ValidationError::RoundsMustBePositive)
        ));
        assert_eq!(state.get_snapshot().unwrap().phase, Phase::Idle);
    }

    #[test]
    fn advance_tick_discards_stale_ticks() {
        let state = state();

        // Idle: nothing to advance
        assert!(state.advance_tick().is_none());

        state.start().unwrap();
        let snap = state.advance_tick().unwrap();
        assert_eq!(snap.remaining_secs, 2);

        // A tick racing with a pause is discarded
        state.pause().unwrap();
        assert!(state.advance_tick().is_none());
        assert_eq!(state.get_snapshot().unwrap().remaining_secs, 2);

        // Same after a reset
        state.reset().unwrap();
        assert!(state.advance_tick().is_none());
        assert_eq!(state.get_snapshot().unwrap().phase, Phase::Idle);
    }

    #[test]
    fn last_action_is_recorded() {
        let state = state();
        assert_eq!(state.get_last_action().0, None);

        state.start().unwrap();
        let (action, time) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("start"));
        assert!(time.is_some());
    }
}
