use std::net::SocketAddr;

use axum::{
    Json,
    extract::{ConnectInfo, Path, State},
    http::HeaderMap,
};
use serde::Serialize;

use crate::error::ServerError;
use crate::state::AppState;
use crate::usecase::verify::{VerifyCodeUseCase, VerifyInput};

/// Shown for both the activating and every repeat verification; clients
/// branch on `first_activation` for "newly verified" vs "already verified".
const VERIFIED_MESSAGE: &str = "verified: this is a genuine copy";

#[derive(Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub activated: bool,
    #[serde(serialize_with = "scoreqr_core::serde::to_rfc3339_ms_opt")]
    pub activation_date: Option<chrono::DateTime<chrono::Utc>>,
    pub message: &'static str,
    pub first_activation: bool,
}

// ── GET /api/verify/{code} ───────────────────────────────────────────────────

pub async fn verify_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Json<VerifyResponse>, ServerError> {
    let client_ip = client_ip(&headers, addr);
    let user_agent = headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();

    let usecase = VerifyCodeUseCase {
        repo: state.code_repo(),
    };
    let output = usecase
        .execute(VerifyInput {
            code,
            client_ip,
            user_agent,
        })
        .await?;

    Ok(Json(VerifyResponse {
        valid: true,
        activated: true,
        activation_date: output.activation_date,
        message: VERIFIED_MESSAGE,
        first_activation: output.first_activation,
    }))
}

/// Proxy-aware client IP: first `X-Forwarded-For` entry, then `X-Real-IP`,
/// then the peer socket address.
fn client_ip(headers: &HeaderMap, addr: SocketAddr) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_owned();
            }
        }
    }
    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return real_ip.to_owned();
        }
    }
    addr.ip().to_string()
}
