use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::models::{CommandRequest, CommandResponse, ErrorResponse, StatusSnapshot};
use crate::workload::{SessionInfo, WorkloadController};

// ── Health ────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub session: Option<SessionInfo>,
}

pub async fn health(State(controller): State<Arc<WorkloadController>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        session: controller.session_info(),
    })
}

// ── Status channel ────────────────────────────────────────────────

pub async fn status(State(controller): State<Arc<WorkloadController>>) -> Json<StatusSnapshot> {
    Json(controller.get_status())
}

// ── Command channel ───────────────────────────────────────────────

/// Apply `{enabled, mode}`. A missing or unknown mode is treated as normal.
pub async fn command(
    State(controller): State<Arc<WorkloadController>>,
    payload: Result<Json<CommandRequest>, JsonRejection>,
) -> Result<Json<CommandResponse>, (StatusCode, Json<ErrorResponse>)> {
    let Json(request) = payload.map_err(|rejection| {
        log::warn!("[Server] Rejected command body: {}", rejection.body_text());
        (rejection.status(), Json(ErrorResponse::new(rejection.body_text())))
    })?;

    log::info!(
        "[Server] Command: enabled={} mode={}",
        request.enabled,
        request.mode
    );

    // Stopping a session joins threads or reaps a child; keep it off the runtime
    let result = tokio::task::spawn_blocking(move || {
        controller.set_command(request.enabled, request.mode)
    })
    .await;

    match result {
        Ok(Ok(snapshot)) => {
            log::debug!("[Server] Now {:?}", snapshot);
            Ok(Json(CommandResponse::ok(request)))
        }
        Ok(Err(e)) => {
            log::error!("[Server] Command failed: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(e.to_string())),
            ))
        }
        Err(join_error) => {
            log::error!("[Server] Command task panicked: {}", join_error);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("command task failed")),
            ))
        }
    }
}
