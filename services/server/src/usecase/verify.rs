use chrono::{DateTime, Utc};

use scoreqr_core::code;

use crate::domain::repository::CodeRepository;
use crate::error::ServerError;

pub struct VerifyInput {
    pub code: String,
    pub client_ip: String,
    pub user_agent: String,
}

#[derive(Debug, PartialEq, Eq)]
pub struct VerifyOutput {
    pub code: String,
    pub activation_date: Option<DateTime<Utc>>,
    /// `true` only for the request that performed the activation transition.
    pub first_activation: bool,
}

/// Verification engine: per-code state machine Unactivated → Activated.
///
/// The transition itself is delegated to the repository's conditional
/// update, so two concurrent verifications of a fresh code yield exactly one
/// `first_activation = true`.
pub struct VerifyCodeUseCase<R: CodeRepository> {
    pub repo: R,
}

impl<R: CodeRepository> VerifyCodeUseCase<R> {
    pub async fn execute(&self, input: VerifyInput) -> Result<VerifyOutput, ServerError> {
        let code = code::normalize(&input.code);
        if !code::is_well_formed(&code) {
            // No store access for malformed codes.
            return Err(ServerError::InvalidCodeFormat);
        }

        let row = self
            .repo
            .find(&code)
            .await?
            .ok_or(ServerError::UnknownCode)?;

        let now = Utc::now();
        if !row.activated
            && self
                .repo
                .try_activate(&code, now, &input.client_ip, &input.user_agent)
                .await?
        {
            tracing::info!(code = %code, client_ip = %input.client_ip, "first activation");
            return Ok(VerifyOutput {
                code,
                activation_date: Some(now),
                first_activation: true,
            });
        }

        // Already activated, or another request won the activation race.
        // Either way only the counters move; the original activation fields
        // stay frozen and are re-read for the response.
        if !self.repo.record_query(&code, now).await? {
            return Err(ServerError::UnknownCode);
        }
        let row = self
            .repo
            .find(&code)
            .await?
            .ok_or(ServerError::UnknownCode)?;
        Ok(VerifyOutput {
            code,
            activation_date: row.activation_date,
            first_activation: false,
        })
    }
}
