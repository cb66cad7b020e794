use chrono::{DateTime, Utc};
use serde::Serialize;

use scoreqr_core::{apikey, code};

use crate::domain::repository::CodeRepository;
use crate::domain::types::NewAuthCode;
use crate::error::ServerError;

/// One candidate from a sync batch, as submitted by the client.
pub struct CandidateCode {
    pub code: String,
    /// Client-side generation time; server time is used when absent.
    pub created_date: Option<DateTime<Utc>>,
}

pub struct SyncInput {
    pub candidates: Vec<CandidateCode>,
    pub api_key: String,
}

/// Batch reconciliation: `added + skipped + errors == total` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    pub added: u64,
    pub skipped: u64,
    pub errors: u64,
    pub total: u64,
}

/// Authenticated bulk merge of client-generated codes into the store.
///
/// Idempotent: re-submitting a batch skips every already-present code. The
/// repository folds all inserts into one transaction, so a storage fault
/// persists nothing.
pub struct SyncCodesUseCase<R: CodeRepository> {
    pub repo: R,
    /// `hex(hmac_sha256(secret_key, api_key_salt))`, derived at startup.
    pub expected_api_key: String,
}

impl<R: CodeRepository> SyncCodesUseCase<R> {
    pub async fn execute(&self, input: SyncInput) -> Result<SyncStats, ServerError> {
        if !apikey::verify(&self.expected_api_key, &input.api_key) {
            tracing::warn!("sync rejected: bad api key");
            return Err(ServerError::InvalidApiKey);
        }
        if input.candidates.is_empty() {
            return Err(ServerError::EmptyBatch);
        }

        let now = Utc::now();
        let total = input.candidates.len() as u64;
        let mut errors = 0u64;
        let mut valid = Vec::with_capacity(input.candidates.len());
        for candidate in &input.candidates {
            let normalized = code::normalize(&candidate.code);
            if !code::is_well_formed(&normalized) {
                errors += 1;
                continue;
            }
            valid.push(NewAuthCode {
                code: normalized,
                created_date: candidate.created_date.unwrap_or(now),
            });
        }

        let (added, skipped) = self.repo.insert_missing(&valid).await?;
        let stats = SyncStats {
            added,
            skipped,
            errors,
            total,
        };
        tracing::info!(
            added = stats.added,
            skipped = stats.skipped,
            errors = stats.errors,
            total = stats.total,
            "code sync complete"
        );
        Ok(stats)
    }
}
