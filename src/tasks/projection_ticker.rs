//! Projection re-evaluation background task

use std::{sync::Arc, time::Duration};
use tokio::{
    sync::broadcast::error::RecvError,
    time::{interval, MissedTickBehavior},
};
use tracing::{debug, error, info, warn};

use crate::{
    engine::{milestones, Milestone, Projection},
    state::{AppState, Phase},
};

/// Background task that re-projects the timer on a fixed cadence while it runs
///
/// Idle timers are not ticked; the task sleeps until the next state change.
/// Each tick recomputes from absolute timestamps, so missed ticks cost
/// nothing but a stale frame.
pub async fn projection_ticker_task(state: Arc<AppState>, tick: Duration) {
    info!("Starting projection ticker task ({}ms cadence)", tick.as_millis());

    let mut state_rx = state.state_change_tx.subscribe();
    let mut last = state.subscribe_projection().borrow().clone();

    // A timer restored mid-run is ticked without waiting for a change
    let mut phase = match state.get_timer_state() {
        Ok(timer_state) => timer_state.phase(),
        Err(e) => {
            error!("Failed to read timer state: {}", e);
            Phase::Idle
        }
    };

    loop {
        last = refresh(&state, &last);

        if phase == Phase::Running {
            debug!("Timer running, ticking every {}ms", tick.as_millis());
            let mut ticker = interval(tick);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        last = refresh(&state, &last);
                    }

                    changed = state_rx.recv() => {
                        let still_running = match changed {
                            Ok(phase) => phase == Phase::Running,
                            Err(RecvError::Lagged(_)) => state.is_running().unwrap_or(false),
                            Err(RecvError::Closed) => {
                                info!("State change channel closed, stopping projection ticker");
                                return;
                            }
                        };
                        last = refresh(&state, &last);
                        if !still_running {
                            debug!("Timer stopped, cancelling ticks");
                            break;
                        }
                    }
                }
            }
        }

        debug!("Timer idle, ticker waiting for next state change");
        phase = match state_rx.recv().await {
            Ok(phase) => phase,
            Err(RecvError::Lagged(skipped)) => {
                warn!("Ticker lagged behind {} state changes", skipped);
                if state.is_running().unwrap_or(false) { Phase::Running } else { Phase::Idle }
            }
            Err(RecvError::Closed) => {
                info!("State change channel closed, stopping projection ticker");
                return;
            }
        };
    }
}

/// Re-evaluate, log milestones crossed since `last`, and return the new projection.
fn refresh(state: &AppState, last: &Projection) -> Projection {
    match state.evaluate() {
        Ok(projection) => {
            for milestone in milestones(last, &projection) {
                match milestone {
                    Milestone::CycleCompleted { count } => {
                        info!("Cycle {} completed, earnings now {}", count, projection.earnings)
                    }
                    Milestone::GoalReached { count, goal } => {
                        info!("Goal reached: {} of {} cycles", count, goal)
                    }
                }
            }
            projection
        }
        Err(e) => {
            error!("Failed to evaluate projection: {}", e);
            last.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ManualClock;
    use crate::persistence::MemoryStore;

    #[tokio::test]
    async fn publishes_completed_cycle_while_running() {
        let clock = Arc::new(ManualClock::new(0));
        let state = Arc::new(AppState::new(
            0,
            "127.0.0.1".to_string(),
            clock.clone(),
            Arc::new(MemoryStore::new()),
        ));
        let mut rx = state.subscribe_projection();

        let task = tokio::spawn(projection_ticker_task(Arc::clone(&state), Duration::from_millis(5)));
        tokio::task::yield_now().await;

        state.start().unwrap();
        clock.advance(240_000);

        // only the ticker re-evaluates after the clock moves
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                rx.changed().await.unwrap();
                if rx.borrow_and_update().cycle_count == 1 {
                    break;
                }
            }
        })
        .await
        .expect("ticker never published the completed cycle");

        state.stop().unwrap();
        task.abort();
    }
}
