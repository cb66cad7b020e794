use axum::{Json, extract::State};
use serde::Serialize;

use crate::error::ServerError;
use crate::state::AppState;
use crate::usecase::stats::{StatsOutput, StatsUseCase};

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    #[serde(serialize_with = "scoreqr_core::serde::to_rfc3339_ms")]
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub stats: StatsOutput,
}

// ── GET /api/status ──────────────────────────────────────────────────────────

pub async fn status(State(state): State<AppState>) -> Result<Json<StatusResponse>, ServerError> {
    let usecase = StatsUseCase {
        repo: state.code_repo(),
    };
    let stats = usecase.execute().await?;
    Ok(Json(StatusResponse {
        status: "running",
        timestamp: chrono::Utc::now(),
        stats,
    }))
}
