//! State management module
//!
//! This module contains the timer state, its configuration, the state holder
//! that enforces the lifecycle, and the shared application state.

pub mod app_state;
pub mod cycle_timer;
pub mod timer_config;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use cycle_timer::CycleTimer;
pub use timer_config::{ConfigPatch, NumberInput, TimerConfig};
pub use timer_state::{Phase, TimerState};
