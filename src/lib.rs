//! Earn Now - an interval timer and reward counter
//!
//! This library tracks elapsed time against a configurable cycle length,
//! credits a reward for every completed cycle, and reports progress toward a
//! goal. The time accounting is a pure function of timer state,
//! configuration and the current instant; everything else feeds it or
//! renders it.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod persistence;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use engine::{project, Projection};
pub use state::{AppState, CycleTimer, TimerConfig, TimerState};
pub use utils::signals::shutdown_signal;
