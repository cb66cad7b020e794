use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::error::ServerError;
use crate::state::AppState;
use crate::usecase::sync::{CandidateCode, SyncCodesUseCase, SyncInput, SyncStats};

#[derive(Deserialize)]
pub struct SyncCandidateRequest {
    pub code: String,
    pub created_date: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Deserialize)]
pub struct SyncCodesRequest {
    pub codes: Vec<SyncCandidateRequest>,
    pub api_key: String,
}

#[derive(Serialize)]
pub struct SyncCodesResponse {
    pub success: bool,
    pub message: String,
    pub stats: SyncStats,
}

// ── POST /api/sync-codes ─────────────────────────────────────────────────────

pub async fn sync_codes(
    State(state): State<AppState>,
    Json(body): Json<SyncCodesRequest>,
) -> Result<Json<SyncCodesResponse>, ServerError> {
    let usecase = SyncCodesUseCase {
        repo: state.code_repo(),
        expected_api_key: state.expected_api_key.clone(),
    };
    let stats = usecase
        .execute(SyncInput {
            candidates: body
                .codes
                .into_iter()
                .map(|c| CandidateCode {
                    code: c.code,
                    created_date: c.created_date,
                })
                .collect(),
            api_key: body.api_key,
        })
        .await?;

    Ok(Json(SyncCodesResponse {
        success: true,
        message: format!("synced {} new codes", stats.added),
        stats,
    }))
}
