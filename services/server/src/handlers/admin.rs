use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use serde::{Deserialize, Serialize};

use scoreqr_core::apikey;
use scoreqr_core::pagination::PageRequest;

use crate::domain::types::{AuthCode, CodeSortBy, StatusFilter};
use crate::error::ServerError;
use crate::state::AppState;
use crate::usecase::admin::{
    CreateCodeInput, CreateCodeUseCase, DeleteCodeUseCase, GetCodeUseCase, ListCodesInput,
    ListCodesUseCase,
};

/// Admin routes carry the derived API key in this header; same credential as
/// the sync protocol, same constant-time comparison.
fn require_api_key(state: &AppState, headers: &HeaderMap) -> Result<(), ServerError> {
    let provided = headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !apikey::verify(&state.expected_api_key, provided) {
        return Err(ServerError::InvalidApiKey);
    }
    Ok(())
}

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CodeResponse {
    pub code: String,
    #[serde(serialize_with = "scoreqr_core::serde::to_rfc3339_ms")]
    pub created_date: chrono::DateTime<chrono::Utc>,
    pub activated: bool,
    #[serde(serialize_with = "scoreqr_core::serde::to_rfc3339_ms_opt")]
    pub activation_date: Option<chrono::DateTime<chrono::Utc>>,
    pub activation_ip: Option<String>,
    pub activation_user_agent: Option<String>,
    pub query_count: i32,
    #[serde(serialize_with = "scoreqr_core::serde::to_rfc3339_ms_opt")]
    pub last_query_date: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<AuthCode> for CodeResponse {
    fn from(c: AuthCode) -> Self {
        Self {
            code: c.code,
            created_date: c.created_date,
            activated: c.activated,
            activation_date: c.activation_date,
            activation_ip: c.activation_ip,
            activation_user_agent: c.activation_user_agent,
            query_count: c.query_count,
            last_query_date: c.last_query_date,
        }
    }
}

// ── GET /admin/codes ─────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct ListCodesQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub sort: Option<String>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

#[derive(Serialize)]
pub struct ListCodesResponse {
    pub items: Vec<CodeResponse>,
    pub total_count: u64,
    pub activated_count: u64,
    pub page: u32,
    pub per_page: u32,
}

pub async fn list_codes(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListCodesQuery>,
) -> Result<Json<ListCodesResponse>, ServerError> {
    require_api_key(&state, &headers)?;

    let status = query
        .status
        .as_deref()
        .map(StatusFilter::from_kebab_case)
        .unwrap_or(Some(StatusFilter::default()))
        .unwrap_or_default();
    let sort_by = query
        .sort
        .as_deref()
        .map(CodeSortBy::from_kebab_case)
        .unwrap_or(Some(CodeSortBy::default()))
        .unwrap_or_default();
    let page = PageRequest {
        per_page: query.per_page.unwrap_or(20),
        page: query.page.unwrap_or(1),
    }
    .clamped();

    let usecase = ListCodesUseCase {
        repo: state.code_repo(),
    };
    let output = usecase
        .execute(ListCodesInput {
            search: query.search,
            status,
            sort_by,
            page,
        })
        .await?;

    Ok(Json(ListCodesResponse {
        items: output.items.into_iter().map(CodeResponse::from).collect(),
        total_count: output.total_count,
        activated_count: output.activated_count,
        page: page.page,
        per_page: page.per_page,
    }))
}

// ── POST /admin/codes ────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct CreateCodeRequest {
    pub code: Option<String>,
}

#[derive(Serialize)]
pub struct CreateCodeResponse {
    pub code: String,
}

pub async fn create_code(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateCodeRequest>,
) -> Result<(StatusCode, Json<CreateCodeResponse>), ServerError> {
    require_api_key(&state, &headers)?;
    let usecase = CreateCodeUseCase {
        repo: state.code_repo(),
    };
    let code = usecase.execute(CreateCodeInput { code: body.code }).await?;
    Ok((StatusCode::CREATED, Json(CreateCodeResponse { code })))
}

// ── GET /admin/codes/{code} ──────────────────────────────────────────────────

pub async fn get_code(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(code): Path<String>,
) -> Result<Json<CodeResponse>, ServerError> {
    require_api_key(&state, &headers)?;
    let usecase = GetCodeUseCase {
        repo: state.code_repo(),
    };
    let found = usecase.execute(&code).await?;
    Ok(Json(CodeResponse::from(found)))
}

// ── DELETE /admin/codes/{code} ───────────────────────────────────────────────

pub async fn delete_code(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(code): Path<String>,
) -> Result<StatusCode, ServerError> {
    require_api_key(&state, &headers)?;
    let usecase = DeleteCodeUseCase {
        repo: state.code_repo(),
    };
    usecase.execute(&code).await?;
    Ok(StatusCode::NO_CONTENT)
}
