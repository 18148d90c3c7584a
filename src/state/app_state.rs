//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{info, warn};

use super::{ConfigPatch, CycleTimer, Phase, TimerConfig, TimerState};
use crate::{
    engine::{Clock, Projection},
    error::StateError,
    persistence::{self, KeyValueStore},
};

/// Main application state that owns the timer, its clock and its store
///
/// The timer sits behind a single lock and the clock is read while that lock
/// is held, so concurrent transitions observe a consistent `now`.
pub struct AppState {
    /// Timer state and configuration
    timer: Arc<Mutex<CycleTimer>>,
    clock: Arc<dyn Clock>,
    store: Arc<dyn KeyValueStore>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel announcing the phase after every transition or config change
    pub state_change_tx: broadcast::Sender<Phase>,
    /// Channel carrying the latest projection
    pub projection_tx: watch::Sender<Projection>,
    /// Keep the receiver alive to prevent channel closure
    pub _projection_rx: watch::Receiver<Projection>,
}

impl AppState {
    /// Create an AppState from whatever the store holds
    pub fn new(port: u16, host: String, clock: Arc<dyn Clock>, store: Arc<dyn KeyValueStore>) -> Self {
        let timer = persistence::load_timer(store.as_ref());
        let initial = timer.project(clock.now_ms());
        info!(
            "Restored timer: phase={:?} count={} banked={}ms",
            initial.phase,
            initial.cycle_count,
            timer.state().accumulated_offset_ms
        );

        let (state_change_tx, _) = broadcast::channel(100);
        let (projection_tx, projection_rx) = watch::channel(initial);

        Self {
            timer: Arc::new(Mutex::new(timer)),
            clock,
            store,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            state_change_tx,
            projection_tx,
            _projection_rx: projection_rx,
        }
    }

    /// Apply an update to the timer, persist it, and notify listeners
    fn update_timer<F, R>(&self, action: &str, updater: F) -> Result<(R, Projection), StateError>
    where
        F: FnOnce(&mut CycleTimer, i64) -> R,
    {
        let mut timer = self.timer.lock()
            .map_err(|_| StateError::LockPoisoned("timer state"))?;

        let now = self.clock.now_ms();
        let before = timer.clone();
        let outcome = updater(&mut *timer, now);

        if timer.config() != before.config() {
            persistence::save_config(self.store.as_ref(), timer.config());
        }
        if timer.state() != before.state() {
            persistence::save_state(self.store.as_ref(), timer.state());
        }

        let projection = if *timer.state() == TimerState::new() {
            Projection::zero(timer.config())
        } else {
            timer.project(now).carry_over(&self.projection_tx.borrow(), timer.config())
        };
        let phase = timer.state().phase();

        // Publish under the lock so a slower evaluate cannot overwrite it
        self.projection_tx.send_replace(projection.clone());
        drop(timer);

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        // Wake the projection ticker
        if let Err(e) = self.state_change_tx.send(phase) {
            warn!("No listeners for state change notification: {}", e);
        }

        Ok((outcome, projection))
    }

    /// Start the timer. Starting a running timer changes nothing.
    pub fn start(&self) -> Result<(bool, Projection), StateError> {
        self.update_timer("start", |timer, now| timer.start(now))
    }

    /// Pause the timer, banking the running segment
    pub fn stop(&self) -> Result<(Option<u64>, Projection), StateError> {
        self.update_timer("stop", |timer, now| timer.stop(now))
    }

    /// Discard all progress
    pub fn reset(&self) -> Result<Projection, StateError> {
        self.update_timer("reset", |timer, _| timer.reset())
            .map(|(_, projection)| projection)
    }

    /// Merge a configuration patch
    pub fn update_config(&self, patch: &ConfigPatch) -> Result<(TimerConfig, Projection), StateError> {
        self.update_timer("config", |timer, _| {
            timer.update_config(patch);
            timer.config().clone()
        })
    }

    /// Recompute the projection at the current instant and publish it
    pub fn evaluate(&self) -> Result<Projection, StateError> {
        let timer = self.timer.lock()
            .map_err(|_| StateError::LockPoisoned("timer state"))?;

        let projection = timer
            .project(self.clock.now_ms())
            .carry_over(&self.projection_tx.borrow(), timer.config());
        self.projection_tx.send_replace(projection.clone());
        drop(timer);

        Ok(projection)
    }

    /// Get current timer configuration
    pub fn get_config(&self) -> Result<TimerConfig, StateError> {
        self.timer.lock()
            .map(|timer| timer.config().clone())
            .map_err(|_| StateError::LockPoisoned("timer state"))
    }

    /// Get current timer state
    pub fn get_timer_state(&self) -> Result<TimerState, StateError> {
        self.timer.lock()
            .map(|timer| *timer.state())
            .map_err(|_| StateError::LockPoisoned("timer state"))
    }

    pub fn is_running(&self) -> Result<bool, StateError> {
        self.get_timer_state().map(|state| state.is_running())
    }

    /// Subscribe to published projections
    pub fn subscribe_projection(&self) -> watch::Receiver<Projection> {
        self.projection_tx.subscribe()
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
