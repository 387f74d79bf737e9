//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json};
use serde::Deserialize;
use tracing::{error, info, warn};

use super::responses::{format_clock, status_line, ApiResponse, HealthResponse, StatusResponse};
use crate::{
    state::{AppState, ControlError},
    timer::{TimerConfig, ValidationError},
};

/// Request body for POST /configure
///
/// Durations arrive as minute+second pairs the way a settings form collects
/// them; they are folded into total seconds before reaching the timer.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigureRequest {
    pub rounds: u32,
    #[serde(default)]
    pub round_minutes: u64,
    #[serde(default)]
    pub round_seconds: u64,
    #[serde(default)]
    pub rest_minutes: u64,
    #[serde(default)]
    pub rest_seconds: u64,
}

impl ConfigureRequest {
    pub fn to_config(&self) -> TimerConfig {
        TimerConfig::new(
            self.rounds,
            self.round_minutes * 60 + self.round_seconds,
            self.rest_minutes * 60 + self.rest_seconds,
        )
    }
}

type ControlResult = Result<(StatusCode, Json<ApiResponse>), StatusCode>;

/// Map a control failure to an HTTP response carrying the current snapshot
fn control_failure(state: &AppState, err: ControlError) -> ControlResult {
    match err {
        ControlError::Validation(e) => {
            warn!("Control operation rejected: {}", e);
            let code = match e {
                ValidationError::RoundsMustBePositive => StatusCode::UNPROCESSABLE_ENTITY,
                ValidationError::TimerRunning => StatusCode::CONFLICT,
            };
            let snapshot = state
                .get_snapshot()
                .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
            Ok((code, Json(ApiResponse::error(e.to_string(), snapshot))))
        }
        ControlError::Lock(e) => {
            error!("Control operation failed: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /configure - Replace the timer configuration
pub async fn configure_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ConfigureRequest>,
) -> ControlResult {
    match state.configure(request.to_config()) {
        Ok(snapshot) => {
            info!("Configure endpoint called - timer reconfigured");
            Ok((
                StatusCode::OK,
                Json(ApiResponse::ok("Timer configured".to_string(), snapshot)),
            ))
        }
        Err(e) => control_failure(&state, e),
    }
}

/// Handle POST /start - Begin the countdown at round 1
pub async fn start_handler(State(state): State<Arc<AppState>>) -> ControlResult {
    match state.start() {
        Ok(snapshot) => {
            info!("Start endpoint called - countdown started");
            Ok((
                StatusCode::OK,
                Json(ApiResponse::ok("Timer started".to_string(), snapshot)),
            ))
        }
        Err(e) => control_failure(&state, e),
    }
}

/// Handle POST /pause - Halt the countdown, keeping remaining time
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> ControlResult {
    match state.pause() {
        Ok(snapshot) => {
            info!("Pause endpoint called");
            Ok((
                StatusCode::OK,
                Json(ApiResponse::ok("Timer paused".to_string(), snapshot)),
            ))
        }
        Err(e) => control_failure(&state, e),
    }
}

/// Handle POST /resume - Continue a paused countdown
pub async fn resume_handler(State(state): State<Arc<AppState>>) -> ControlResult {
    match state.resume() {
        Ok(snapshot) => {
            info!("Resume endpoint called");
            Ok((
                StatusCode::OK,
                Json(ApiResponse::ok("Timer resumed".to_string(), snapshot)),
            ))
        }
        Err(e) => control_failure(&state, e),
    }
}

/// Handle POST /reset - Return the timer to idle
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> ControlResult {
    match state.reset() {
        Ok(snapshot) => {
            info!("Reset endpoint called");
            Ok((
                StatusCode::OK,
                Json(ApiResponse::ok("Timer reset".to_string(), snapshot)),
            ))
        }
        Err(e) => control_failure(&state, e),
    }
}

/// Handle GET /status - Return the live timer readout
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let snapshot = match state.get_snapshot() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to get timer snapshot: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        display: format_clock(snapshot.remaining_secs),
        status_line: status_line(&snapshot),
        timer: snapshot,
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
