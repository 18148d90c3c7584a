//! State holder for one cycle timer

use tracing::{debug, info};

use super::{ConfigPatch, TimerConfig, TimerState};
use crate::engine::projector::{project, Projection};

/// Owns the timer state and its configuration and exposes the lifecycle
/// transitions. Every method takes the current instant explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleTimer {
    state: TimerState,
    config: TimerConfig,
}

impl CycleTimer {
    pub fn new(config: TimerConfig, state: TimerState) -> Self {
        Self { state, config }
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Start accruing time. No-op if already running.
    pub fn start(&mut self, now_ms: i64) -> bool {
        let started = self.state.start(now_ms);
        if started {
            info!(
                "Timer started at {} with {}ms banked",
                now_ms, self.state.accumulated_offset_ms
            );
        } else {
            debug!("Start ignored, timer already running");
        }
        started
    }

    /// Pause and bank the running segment. No-op if idle.
    pub fn stop(&mut self, now_ms: i64) -> Option<u64> {
        let banked = self.state.stop(now_ms);
        match banked {
            Some(segment) => info!(
                "Timer stopped, banked {}ms (total {}ms)",
                segment, self.state.accumulated_offset_ms
            ),
            None => debug!("Stop ignored, timer already idle"),
        }
        banked
    }

    /// Discard all progress regardless of phase
    pub fn reset(&mut self) {
        info!(
            "Timer reset, discarding {}ms banked",
            self.state.accumulated_offset_ms
        );
        self.state.reset();
    }

    /// Merge a configuration patch. Elapsed time is left as is.
    pub fn update_config(&mut self, patch: &ConfigPatch) -> bool {
        let changed = self.config.apply(patch);
        if changed {
            info!(
                "Configuration updated: cycle={}m{}s reward={} goal={}",
                self.config.cycle_minutes,
                self.config.cycle_seconds,
                self.config.reward_per_cycle,
                self.config.goal_count
            );
        }
        changed
    }

    pub fn project(&self, now_ms: i64) -> Projection {
        project(&self.state, &self.config, now_ms)
    }
}
