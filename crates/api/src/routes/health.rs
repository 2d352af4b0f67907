use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the background template is present.
    pub template_present: bool,
    /// Whether the card font is present.
    pub font_present: bool,
}

/// GET /health -- returns service status and composition asset presence.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let template_present = state.config.paths.template_path.is_file();
    let font_present = state.config.paths.font_path.is_file();

    let status = if template_present && font_present {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        template_present,
        font_present,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
