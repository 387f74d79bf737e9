//! Round timer state machine
//!
//! Pure countdown logic with no I/O and no knowledge of the scheduler that
//! drives it. The background ticker task (see `tasks::round_ticker`) calls
//! `tick()` once per elapsed second while the timer is running and unpaused.

use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// Current mode of the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Not started, or explicitly reset
    Idle,
    /// An active round is counting down
    Working,
    /// A rest interval between rounds is counting down
    Resting,
    /// The final round's work phase elapsed; terminal until reset
    Completed,
}

/// Timer configuration, immutable per run
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Number of work rounds, must be at least 1
    pub rounds: u32,
    /// Length of each work phase in seconds
    pub round_secs: u64,
    /// Length of each rest phase in seconds (skipped after the final round)
    pub rest_secs: u64,
}

impl TimerConfig {
    pub fn new(rounds: u32, round_secs: u64, rest_secs: u64) -> Self {
        Self {
            rounds,
            round_secs,
            rest_secs,
        }
    }

    /// Check the configuration invariant (`rounds >= 1`)
    ///
    /// Zero durations are legal; the corresponding phase expires on its
    /// first tick.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.rounds < 1 {
            return Err(ValidationError::RoundsMustBePositive);
        }
        Ok(())
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        // 3 rounds of 3 minutes with 1 minute rest
        Self::new(3, 180, 60)
    }
}

/// Read-only view of the timer, published to watchers after every mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: Phase,
    /// 1-based round index, 0 while idle
    pub current_round: u32,
    /// Configured round count
    pub rounds: u32,
    pub remaining_secs: u64,
    pub paused: bool,
}

impl TimerSnapshot {
    /// An idle snapshot, used to seed watch channels
    pub fn idle(rounds: u32) -> Self {
        Self {
            phase: Phase::Idle,
            current_round: 0,
            rounds,
            remaining_secs: 0,
            paused: false,
        }
    }

    /// Whether the countdown should be advancing (running and unpaused)
    pub fn is_ticking(&self) -> bool {
        matches!(self.phase, Phase::Working | Phase::Resting) && !self.paused
    }
}

/// The round timer: a countdown alternating work and rest phases across a
/// configured number of rounds
///
/// Exactly `rounds` work phases and `rounds - 1` rest phases occur, rest
/// strictly between consecutive rounds. The timer completes the moment the
/// final round's work phase expires; there is never a trailing rest phase.
#[derive(Debug, Clone)]
pub struct RoundTimer {
    config: TimerConfig,
    phase: Phase,
    current_round: u32,
    remaining_secs: u64,
    paused: bool,
}

impl RoundTimer {
    /// Create an idle timer holding the given configuration
    ///
    /// The configuration is not validated here; `start` re-checks it since
    /// callers may construct a timer before collecting user input.
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            current_round: 0,
            remaining_secs: 0,
            paused: false,
        }
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether `tick` would currently advance the countdown
    pub fn is_ticking(&self) -> bool {
        matches!(self.phase, Phase::Working | Phase::Resting) && !self.paused
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase,
            current_round: self.current_round,
            rounds: self.config.rounds,
            remaining_secs: self.remaining_secs,
            paused: self.paused,
        }
    }

    /// Replace the configuration
    ///
    /// Only permitted while idle; fails with `ValidationError::TimerRunning`
    /// otherwise. Rejects a zero round count without touching the current
    /// configuration.
    pub fn configure(&mut self, config: TimerConfig) -> Result<(), ValidationError> {
        if self.phase != Phase::Idle {
            return Err(ValidationError::TimerRunning);
        }
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Begin the countdown at round 1
    ///
    /// Re-validates the round count even though `configure` already did, so a
    /// configuration set through some other path still cannot start a timer
    /// with zero rounds. Starting while already running restarts from round 1.
    pub fn start(&mut self) -> Result<(), ValidationError> {
        self.config.validate()?;
        self.phase = Phase::Working;
        self.current_round = 1;
        self.remaining_secs = self.config.round_secs;
        self.paused = false;
        Ok(())
    }

    /// Halt the countdown without losing the remaining time
    ///
    /// No-op unless the timer is running and unpaused.
    pub fn pause(&mut self) {
        if matches!(self.phase, Phase::Working | Phase::Resting) && !self.paused {
            self.paused = true;
        }
    }

    /// Continue a paused countdown from the current remaining time
    ///
    /// No-op unless paused.
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
        }
    }

    /// Return to idle, clearing the round index and remaining time
    ///
    /// Always succeeds, from any phase.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.current_round = 0;
        self.remaining_secs = 0;
        self.paused = false;
    }

    /// Advance the countdown by one second
    ///
    /// Decrements the remaining time while it is above zero; at zero the
    /// phase transition fires and the new phase's full duration is loaded in
    /// the same tick, so the countdown never waits an extra second at zero.
    /// No-op while idle, completed, or paused.
    pub fn tick(&mut self) {
        if self.paused {
            return;
        }
        match self.phase {
            Phase::Working => {
                if self.remaining_secs > 0 {
                    self.remaining_secs -= 1;
                } else if self.current_round >= self.config.rounds {
                    // Final round done: complete immediately, no trailing rest
                    self.phase = Phase::Completed;
                    self.remaining_secs = 0;
                } else {
                    self.phase = Phase::Resting;
                    self.remaining_secs = self.config.rest_secs;
                }
            }
            Phase::Resting => {
                if self.remaining_secs > 0 {
                    self.remaining_secs -= 1;
                } else {
                    // Only reachable with current_round < rounds
                    self.phase = Phase::Working;
                    self.current_round += 1;
                    self.remaining_secs = self.config.round_secs;
                }
            }
            Phase::Idle | Phase::Completed => {}
        }
    }
}

impl Default for RoundTimer {
    fn default() -> Self {
        Self::new(TimerConfig::default())
    }
}
