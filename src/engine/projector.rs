//! Projection of timer state onto display values
//!
//! [`project`] is a pure function of `(state, config, now)`. It keeps no
//! memory between calls, so a caller that skips ticks (throttled, asleep,
//! backgrounded) gets the correct answer on the next call.

use serde::Serialize;

use super::format::{badge_percent, format_countdown};
use super::money::Cents;
use crate::state::{Phase, TimerConfig, TimerState};

/// Progress toward the configured goal count
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
    pub goal_count: u64,
    /// `min(cycle_count / goal_count × 100, 100)`
    pub percentage: f64,
    /// Floored percentage for the badge
    pub badge_percent: u32,
    pub reached: bool,
}

impl GoalProgress {
    pub fn new(cycle_count: u64, goal_count: u64) -> Self {
        let goal_count = goal_count.max(1);
        let percentage = (cycle_count as f64 / goal_count as f64 * 100.0).min(100.0);
        Self {
            goal_count,
            percentage,
            badge_percent: badge_percent(percentage),
            reached: cycle_count >= goal_count,
        }
    }
}

/// Read-only snapshot derived from state, config and the current instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub phase: Phase,
    pub cycle_count: u64,
    pub earnings: Cents,
    pub total_elapsed_ms: u64,
    pub cycle_duration_ms: u64,
    pub ms_into_cycle: u64,
    pub ms_remaining_in_cycle: u64,
    /// In `[0, 1)`
    pub progress_fraction: f64,
    pub progress_percent: f64,
    /// `MM:SS`; the full configured cycle while idle
    pub countdown: String,
    pub goal: GoalProgress,
    /// Cycle duration was zero, so no division took place
    pub degenerate: bool,
}

impl Projection {
    /// Projection of a timer with nothing banked and nothing running.
    ///
    /// Independent of the clock, so a reset never depends on `now`.
    pub fn zero(config: &TimerConfig) -> Self {
        project(&TimerState::new(), config, 0)
    }

    /// Keep the last known count when this projection could not compute one.
    pub fn carry_over(mut self, previous: &Projection, config: &TimerConfig) -> Self {
        if self.degenerate && previous.cycle_count > self.cycle_count {
            self.cycle_count = previous.cycle_count;
            self.earnings = config.reward_per_cycle.times(self.cycle_count);
            self.goal = GoalProgress::new(self.cycle_count, config.goal_count);
        }
        self
    }
}

/// Compute the projection at `now_ms`.
pub fn project(state: &TimerState, config: &TimerConfig, now_ms: i64) -> Projection {
    let phase = state.phase();
    let cycle_duration_ms = config.cycle_duration_ms();
    let total_elapsed_ms = state.total_elapsed_ms(now_ms);

    if cycle_duration_ms == 0 {
        return Projection {
            phase,
            cycle_count: 0,
            earnings: Cents::ZERO,
            total_elapsed_ms,
            cycle_duration_ms,
            ms_into_cycle: 0,
            ms_remaining_in_cycle: 0,
            progress_fraction: 0.0,
            progress_percent: 0.0,
            countdown: format_countdown(0),
            goal: GoalProgress::new(0, config.goal_count),
            degenerate: true,
        };
    }

    let cycle_count = total_elapsed_ms / cycle_duration_ms;
    let ms_into_cycle = total_elapsed_ms % cycle_duration_ms;
    let ms_remaining_in_cycle = cycle_duration_ms - ms_into_cycle;
    let progress_fraction = ms_into_cycle as f64 / cycle_duration_ms as f64;

    let (countdown, progress_fraction) = match phase {
        Phase::Running => (format_countdown(ms_remaining_in_cycle), progress_fraction),
        Phase::Idle => (format_countdown(cycle_duration_ms), 0.0),
    };

    Projection {
        phase,
        cycle_count,
        earnings: config.reward_per_cycle.times(cycle_count),
        total_elapsed_ms,
        cycle_duration_ms,
        ms_into_cycle,
        ms_remaining_in_cycle,
        progress_fraction,
        progress_percent: progress_fraction * 100.0,
        countdown,
        goal: GoalProgress::new(cycle_count, config.goal_count),
        degenerate: false,
    }
}

/// Notable changes between two consecutive projections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Milestone {
    CycleCompleted { count: u64 },
    GoalReached { count: u64, goal: u64 },
}

/// Milestones crossed going from `previous` to `next`.
pub fn milestones(previous: &Projection, next: &Projection) -> Vec<Milestone> {
    let mut crossed = Vec::new();
    if next.cycle_count > previous.cycle_count {
        crossed.push(Milestone::CycleCompleted { count: next.cycle_count });
    }
    if next.goal.reached && !previous.goal.reached {
        crossed.push(Milestone::GoalReached {
            count: next.cycle_count,
            goal: next.goal.goal_count,
        });
    }
    crossed
}
