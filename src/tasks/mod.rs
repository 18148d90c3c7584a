//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod projection_ticker;

// Re-export main functions
pub use projection_ticker::projection_ticker_task;
