//! Timer state structure and lifecycle transitions

use serde::{Deserialize, Serialize};

/// Whether time is currently accruing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
}

/// Timer state for tracking elapsed time across running segments
///
/// `accumulated_offset_ms` only grows on a running → idle transition and is
/// left untouched while the timer runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimerState {
    /// Epoch milliseconds at which the current running segment began
    pub start_timestamp_ms: Option<i64>,
    /// Elapsed milliseconds banked from earlier segments
    pub accumulated_offset_ms: u64,
}

impl TimerState {
    /// Create a new idle timer state with nothing banked
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a running timer state
    pub fn running(start_timestamp_ms: i64, accumulated_offset_ms: u64) -> Self {
        Self {
            start_timestamp_ms: Some(start_timestamp_ms),
            accumulated_offset_ms,
        }
    }

    /// Create an idle timer state holding banked time
    pub fn paused(accumulated_offset_ms: u64) -> Self {
        Self {
            start_timestamp_ms: None,
            accumulated_offset_ms,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.start_timestamp_ms.is_some() {
            Phase::Running
        } else {
            Phase::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.start_timestamp_ms.is_some()
    }

    /// Total elapsed time at `now_ms`, frozen at the offset while idle
    pub fn total_elapsed_ms(&self, now_ms: i64) -> u64 {
        match self.start_timestamp_ms {
            Some(start) => elapsed_between(start, now_ms).saturating_add(self.accumulated_offset_ms),
            None => self.accumulated_offset_ms,
        }
    }

    /// Begin a running segment. Returns `false` if one is already open.
    pub fn start(&mut self, now_ms: i64) -> bool {
        if self.is_running() {
            return false;
        }
        self.start_timestamp_ms = Some(now_ms);
        true
    }

    /// Close the running segment and bank its elapsed time.
    ///
    /// Returns the milliseconds banked, or `None` if the timer was idle.
    pub fn stop(&mut self, now_ms: i64) -> Option<u64> {
        let start = self.start_timestamp_ms.take()?;
        let segment = elapsed_between(start, now_ms);
        self.accumulated_offset_ms = self.accumulated_offset_ms.saturating_add(segment);
        Some(segment)
    }

    /// Discard the running segment and all banked time
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Milliseconds from `start` to `now`; a clock that moved backwards counts as zero.
fn elapsed_between(start_ms: i64, now_ms: i64) -> u64 {
    u64::try_from(now_ms.saturating_sub(start_ms)).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle() {
        let state = TimerState::new();
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.total_elapsed_ms(5_000), 0);
    }

    #[test]
    fn double_start_keeps_first_timestamp() {
        let mut state = TimerState::new();
        assert!(state.start(1_000));
        assert!(!state.start(2_000));
        assert_eq!(state.start_timestamp_ms, Some(1_000));
    }

    #[test]
    fn pause_resume_banks_only_running_segments() {
        let mut state = TimerState::new();
        state.start(0);
        assert_eq!(state.stop(3_000), Some(3_000));
        // gap between segments is not counted
        state.start(50_000);
        assert_eq!(state.stop(52_500), Some(2_500));
        assert_eq!(state.accumulated_offset_ms, 5_500);
        assert_eq!(state.total_elapsed_ms(1_000_000), 5_500);
    }

    #[test]
    fn stop_while_idle_is_noop() {
        let mut state = TimerState::paused(700);
        assert_eq!(state.stop(9_999), None);
        assert_eq!(state.accumulated_offset_ms, 700);
    }

    #[test]
    fn offset_does_not_move_while_running() {
        let mut state = TimerState::paused(1_000);
        state.start(10_000);
        assert_eq!(state.accumulated_offset_ms, 1_000);
        assert_eq!(state.total_elapsed_ms(12_000), 3_000);
        assert_eq!(state.accumulated_offset_ms, 1_000);
    }

    #[test]
    fn clock_going_backwards_counts_as_zero() {
        let mut state = TimerState::paused(400);
        state.start(10_000);
        assert_eq!(state.total_elapsed_ms(9_000), 400);
        assert_eq!(state.stop(9_000), Some(0));
        assert_eq!(state.accumulated_offset_ms, 400);
    }

    #[test]
    fn reset_clears_everything() {
        let mut state = TimerState::running(5, 10_000);
        state.reset();
        assert_eq!(state, TimerState::new());
    }
}
