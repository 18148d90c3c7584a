//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info};

use crate::state::{AppState, ConfigPatch};
use super::responses::{ApiResponse, ConfigResponse, HealthResponse, StatusResponse};

/// Handle POST /start - Start accruing cycles
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.start() {
        Ok((true, projection)) => {
            info!("Start endpoint called - timer running");
            Ok(Json(ApiResponse::for_phase("Timer started".to_string(), projection)))
        }
        Ok((false, projection)) => Ok(Json(ApiResponse::for_phase(
            "Timer already running".to_string(),
            projection,
        ))),
        Err(e) => {
            error!("Failed to start timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /stop - Pause and bank elapsed time
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.stop() {
        Ok((Some(banked), projection)) => {
            info!("Stop endpoint called - banked {}ms", banked);
            Ok(Json(ApiResponse::for_phase(
                format!("Timer paused after {}ms", banked),
                projection,
            )))
        }
        Ok((None, projection)) => Ok(Json(ApiResponse::for_phase(
            "Timer already paused".to_string(),
            projection,
        ))),
        Err(e) => {
            error!("Failed to stop timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /reset - Discard all progress
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.reset() {
        Ok(projection) => {
            info!("Reset endpoint called - progress cleared");
            Ok(Json(ApiResponse::for_phase("Timer reset".to_string(), projection)))
        }
        Err(e) => {
            error!("Failed to reset timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /config - Return current configuration
pub async fn get_config_handler(State(state): State<Arc<AppState>>) -> Result<Json<ConfigResponse>, StatusCode> {
    let config = state.get_config().map_err(|e| {
        error!("Failed to get config: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    let projection = state.evaluate().map_err(|e| {
        error!("Failed to evaluate projection: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(ConfigResponse::new(config, projection)))
}

/// Handle PATCH /config - Merge a partial configuration
pub async fn update_config_handler(
    State(state): State<Arc<AppState>>,
    Json(patch): Json<ConfigPatch>,
) -> Result<Json<ConfigResponse>, StatusCode> {
    if patch.is_empty() {
        info!("Config endpoint called with an empty patch");
    }

    match state.update_config(&patch) {
        Ok((config, projection)) => Ok(Json(ConfigResponse::new(config, projection))),
        Err(e) => {
            error!("Failed to update config: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Return current projection and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let projection = match state.evaluate() {
        Ok(p) => p,
        Err(e) => {
            error!("Failed to evaluate projection: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let config = match state.get_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to get config: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        projection,
        config,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
