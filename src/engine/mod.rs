//! Time-accounting engine
//!
//! Pure arithmetic that turns timer state, configuration and the current
//! instant into the values a renderer displays.

pub mod clock;
pub mod format;
pub mod money;
pub mod projector;

// Re-export main types
pub use clock::{Clock, ManualClock, SystemClock};
pub use money::Cents;
pub use projector::{milestones, project, GoalProgress, Milestone, Projection};
