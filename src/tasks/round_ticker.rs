//! Round ticker background task

use std::{sync::Arc, time::Duration};
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::state::AppState;

/// Background task that drives the round timer one second at a time
///
/// Waits on the control broadcast until a snapshot says the timer is running
/// and unpaused, then holds a one-second interval and advances the countdown
/// on every tick. Every control change drops the current interval: pause,
/// reset, and completion halt the countdown, while a restart begins a fresh
/// interval, so a tick scheduled before the change can never fire against a
/// reconfigured or freshly-started timer.
pub async fn round_ticker_task(state: Arc<AppState>) {
    info!("Starting round ticker task");

    let mut control_rx = state.control_tx.subscribe();

    loop {
        // Wait for a control change notification
        let mut snapshot = match control_rx.recv().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!("Error receiving control notification: {}", e);
                // Wait a bit before retrying
                sleep(Duration::from_secs(1)).await;
                continue;
            }
        };

        if !snapshot.is_ticking() {
            debug!(
                "Ticker idle: phase={:?}, paused={}",
                snapshot.phase, snapshot.paused
            );
            continue;
        }

        // Every control change gets a fresh interval: a tick scheduled
        // before a restart must never fire against the new run
        'countdown: while snapshot.is_ticking() {
            debug!(
                "Countdown running: round {} of {}, {}s remaining",
                snapshot.current_round, snapshot.rounds, snapshot.remaining_secs
            );

            let mut interval = tokio::time::interval(Duration::from_secs(1));
            // The first interval tick completes immediately; consume it so
            // a resume or restart does not skip ahead by a second
            interval.tick().await;

            loop {
                tokio::select! {
                    // One second elapsed, advance the countdown
                    _ = interval.tick() => {
                        match state.advance_tick() {
                            Some(snap) if snap.is_ticking() => {
                                debug!(
                                    "Tick: phase={:?}, round {} of {}, {}s remaining",
                                    snap.phase, snap.current_round, snap.rounds, snap.remaining_secs
                                );
                            }
                            Some(snap) => {
                                info!("Countdown finished in phase {:?}", snap.phase);
                                break 'countdown;
                            }
                            None => {
                                debug!("Stale tick discarded, stopping countdown");
                                break 'countdown;
                            }
                        }
                    }

                    // Control change while counting down: drop the current
                    // interval and either halt or start over with a fresh one
                    Ok(snap) = control_rx.recv() => {
                        if !snap.is_ticking() {
                            info!(
                                "Countdown halted: phase={:?}, paused={}",
                                snap.phase, snap.paused
                            );
                            break 'countdown;
                        }
                        debug!("Control change while running, restarting countdown interval");
                        snapshot = snap;
                        continue 'countdown;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{Phase, TimerConfig};
    use tokio::time::advance;

    fn spawn_ticker(config: TimerConfig) -> Arc<AppState> {
        let state = Arc::new(AppState::new(0, "127.0.0.1".to_string(), config));
        let ticker_state = Arc::clone(&state);
        tokio::spawn(async move {
            round_ticker_task(ticker_state).await;
        });
        state
    }

    /// Let the ticker task run until it parks on a timer or channel
    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_elapsed_second() {
        let state = spawn_ticker(TimerConfig::new(1, 3, 0));
        settle().await;

        state.start().unwrap();
        settle().await;

        let mut rx = state.subscribe_snapshots();

        advance(Duration::from_secs(1)).await;
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().remaining_secs, 2);

        advance(Duration::from_secs(1)).await;
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().remaining_secs, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_stops_ticks_until_resume() {
        let state = spawn_ticker(TimerConfig::new(1, 5, 0));
        settle().await;

        state.start().unwrap();
        settle().await;

        let mut rx = state.subscribe_snapshots();
        advance(Duration::from_secs(1)).await;
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().remaining_secs, 4);

        state.pause().unwrap();
        settle().await;

        // Elapsed time while paused changes nothing
        advance(Duration::from_secs(30)).await;
        settle().await;
        assert_eq!(state.get_snapshot().unwrap().remaining_secs, 4);

        state.resume().unwrap();
        settle().await;

        let mut rx = state.subscribe_snapshots();
        advance(Duration::from_secs(1)).await;
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().remaining_secs, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn runs_to_completion_and_stays_there() {
        // 2 rounds of 1s with 1s rest:
        // W(1)=1 .. 0, rest=1 .. 0, W(2)=1 .. 0, completed
        let state = spawn_ticker(TimerConfig::new(2, 1, 1));
        settle().await;

        state.start().unwrap();
        settle().await;

        for _ in 0..8 {
            advance(Duration::from_secs(1)).await;
            settle().await;
            if state.get_snapshot().unwrap().phase == Phase::Completed {
                break;
            }
        }
        assert_eq!(state.get_snapshot().unwrap().phase, Phase::Completed);

        // The ticker parked after completion; more time changes nothing
        advance(Duration::from_secs(10)).await;
        settle().await;
        let snap = state.get_snapshot().unwrap();
        assert_eq!(snap.phase, Phase::Completed);
        assert_eq!(snap.remaining_secs, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_discards_pending_tick() {
        let state = spawn_ticker(TimerConfig::new(1, 10, 0));
        settle().await;

        state.start().unwrap();
        settle().await;

        // Restart half a second into the first run; the old interval has a
        // tick pending at the 1s mark
        advance(Duration::from_millis(500)).await;
        settle().await;
        state.start().unwrap();
        settle().await;

        // That pending tick must not fire against the restarted run
        advance(Duration::from_millis(500)).await;
        settle().await;
        assert_eq!(state.get_snapshot().unwrap().remaining_secs, 10);

        // The first decrement comes a full second after the restart
        advance(Duration::from_millis(500)).await;
        settle().await;
        assert_eq!(state.get_snapshot().unwrap().remaining_secs, 9);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_cancels_countdown() {
        let state = spawn_ticker(TimerConfig::new(3, 10, 5));
        settle().await;

        state.start().unwrap();
        settle().await;

        advance(Duration::from_secs(2)).await;
        settle().await;
        assert_eq!(state.get_snapshot().unwrap().remaining_secs, 8);

        state.reset().unwrap();
        settle().await;

        // No stale tick may touch the reset state
        advance(Duration::from_secs(10)).await;
        settle().await;
        let snap = state.get_snapshot().unwrap();
        assert_eq!(snap.phase, Phase::Idle);
        assert_eq!(snap.remaining_secs, 0);
        assert_eq!(snap.current_round, 0);
    }
}
