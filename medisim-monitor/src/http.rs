/**
 * Read-only HTTP view of the running simulation
 *
 * Routes:
 * - GET /health            liveness probe, plain "ok"
 * - GET /system/health     counters and MQTT state
 * - GET /devices           latest state of every device
 * - GET /devices/{kind}    latest state of one device (404 when unknown)
 * - GET /logs              activity feed, newest first
 *
 * The tick driver is the only writer; handlers take a short lock and
 * clone what they return.
 */

use crate::feed::LogFeed;
use crate::health::{HealthTracker, MonitorHealth};
use crate::state::{DeviceBoard, Shared};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use medisim_engine::{DeviceKind, DeviceState, LogEntry};

#[derive(Clone)]
pub struct AppState {
    pub board: Shared<DeviceBoard>,
    pub feed: Shared<LogFeed>,
    pub health_tracker: HealthTracker,
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/system/health", get(get_system_health))
        .route("/devices", get(get_devices))
        .route("/devices/{kind}", get(get_device))
        .route("/logs", get(get_logs))
        .with_state(app_state)
}

// GET /system/health
async fn get_system_health(State(app): State<AppState>) -> Json<MonitorHealth> {
    Json(app.health_tracker.get_health(&app.board))
}

// GET /devices
async fn get_devices(State(app): State<AppState>) -> Json<Vec<DeviceState>> {
    Json(app.board.lock().values().cloned().collect())
}

// GET /devices/{kind}
async fn get_device(
    State(app): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<DeviceState>, StatusCode> {
    let kind: DeviceKind = kind.parse().map_err(|_| StatusCode::NOT_FOUND)?;
    let board = app.board.lock();
    let Some(state) = board.get(&kind) else {
        return Err(StatusCode::NOT_FOUND);
    };
    Ok(Json(state.clone()))
}

// GET /logs
async fn get_logs(State(app): State<AppState>) -> Json<Vec<LogEntry>> {
    Json(app.feed.lock().entries())
}
