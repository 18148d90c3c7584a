//! API response structures

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    engine::Projection,
    state::{Phase, TimerConfig},
};

/// API response structure for lifecycle endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub projection: Projection,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, projection: Projection) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            projection,
        }
    }

    /// Create a response whose status follows the projected phase
    pub fn for_phase(message: String, projection: Projection) -> Self {
        let status = match projection.phase {
            Phase::Running => "running",
            Phase::Idle => "idle",
        };
        Self::new(status.to_string(), message, projection)
    }
}

/// Configuration with the projection it produces
#[derive(Debug, Clone, Serialize)]
pub struct ConfigResponse {
    pub config: TimerConfig,
    pub cycle_duration_ms: u64,
    pub projection: Projection,
}

impl ConfigResponse {
    pub fn new(config: TimerConfig, projection: Projection) -> Self {
        Self {
            cycle_duration_ms: config.cycle_duration_ms(),
            config,
            projection,
        }
    }
}

/// Full status response
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub projection: Projection,
    pub config: TimerConfig,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
