use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Verification service error variants.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid code format")]
    InvalidCodeFormat,
    #[error("code not found")]
    UnknownCode,
    #[error("invalid api key")]
    InvalidApiKey,
    #[error("empty code batch")]
    EmptyBatch,
    #[error("code not found")]
    CodeNotFound,
    #[error("code already exists")]
    DuplicateCode,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ServerError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidCodeFormat => "INVALID_CODE_FORMAT",
            Self::UnknownCode => "UNKNOWN_CODE",
            Self::InvalidApiKey => "INVALID_API_KEY",
            Self::EmptyBatch => "EMPTY_BATCH",
            Self::CodeNotFound => "CODE_NOT_FOUND",
            Self::DuplicateCode => "DUPLICATE_CODE",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            // Invalid format, unknown code, and bad sync auth are all 400 on
            // the public API; scanners treat any 400 as "not genuine".
            Self::InvalidCodeFormat | Self::UnknownCode | Self::InvalidApiKey | Self::EmptyBatch => {
                StatusCode::BAD_REQUEST
            }
            Self::CodeNotFound => StatusCode::NOT_FOUND,
            Self::DuplicateCode => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only — tower-http TraceLayer already records method/uri/status
        // for all requests. Internal errors need the anyhow chain logged so the
        // root cause is traceable.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
