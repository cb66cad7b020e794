use chrono::Utc;

use scoreqr_core::code;
use scoreqr_core::pagination::PageRequest;

use crate::domain::repository::CodeRepository;
use crate::domain::types::{AuthCode, CodeFilter, CodeSortBy, NewAuthCode, StatusFilter};
use crate::error::ServerError;

/// Attempts when auto-generating a code that must clear the unique
/// constraint. The server is the uniqueness arbiter, so collisions simply
/// retry.
const MAX_INSERT_ATTEMPTS: usize = 5;

// ── ListCodes ────────────────────────────────────────────────────────────────

pub struct ListCodesInput {
    pub search: Option<String>,
    pub status: StatusFilter,
    pub sort_by: CodeSortBy,
    pub page: PageRequest,
}

pub struct ListCodesOutput {
    pub items: Vec<AuthCode>,
    /// Rows matching the filter, across all pages.
    pub total_count: u64,
    /// Activated rows matching the filter.
    pub activated_count: u64,
}

pub struct ListCodesUseCase<R: CodeRepository> {
    pub repo: R,
}

impl<R: CodeRepository> ListCodesUseCase<R> {
    pub async fn execute(&self, input: ListCodesInput) -> Result<ListCodesOutput, ServerError> {
        let search = input
            .search
            .map(|s| code::normalize(&s))
            .filter(|s| !s.is_empty());
        let filter = CodeFilter {
            search,
            status: input.status,
        };
        let (items, total_count, activated_count) = self
            .repo
            .list(&filter, input.sort_by, input.page.clamped())
            .await?;
        Ok(ListCodesOutput {
            items,
            total_count,
            activated_count,
        })
    }
}

// ── CreateCode ───────────────────────────────────────────────────────────────

pub struct CreateCodeInput {
    /// Explicit code to insert; generated server-side when absent.
    pub code: Option<String>,
}

pub struct CreateCodeUseCase<R: CodeRepository> {
    pub repo: R,
}

impl<R: CodeRepository> CreateCodeUseCase<R> {
    pub async fn execute(&self, input: CreateCodeInput) -> Result<String, ServerError> {
        let now = Utc::now();
        match input.code {
            Some(raw) => {
                let normalized = code::normalize(&raw);
                if !code::is_well_formed(&normalized) {
                    return Err(ServerError::InvalidCodeFormat);
                }
                self.repo
                    .insert(&NewAuthCode {
                        code: normalized.clone(),
                        created_date: now,
                    })
                    .await?;
                Ok(normalized)
            }
            None => {
                for _ in 0..MAX_INSERT_ATTEMPTS {
                    let candidate = code::generate(code::CODE_LEN);
                    match self
                        .repo
                        .insert(&NewAuthCode {
                            code: candidate.clone(),
                            created_date: now,
                        })
                        .await
                    {
                        Ok(()) => return Ok(candidate),
                        Err(ServerError::DuplicateCode) => continue,
                        Err(e) => return Err(e),
                    }
                }
                Err(ServerError::Internal(anyhow::anyhow!(
                    "exhausted attempts generating a unique code"
                )))
            }
        }
    }
}

// ── GetCode ──────────────────────────────────────────────────────────────────

pub struct GetCodeUseCase<R: CodeRepository> {
    pub repo: R,
}

impl<R: CodeRepository> GetCodeUseCase<R> {
    pub async fn execute(&self, raw: &str) -> Result<AuthCode, ServerError> {
        let normalized = code::normalize(raw);
        self.repo
            .find(&normalized)
            .await?
            .ok_or(ServerError::CodeNotFound)
    }
}

// ── DeleteCode ───────────────────────────────────────────────────────────────

pub struct DeleteCodeUseCase<R: CodeRepository> {
    pub repo: R,
}

impl<R: CodeRepository> DeleteCodeUseCase<R> {
    pub async fn execute(&self, raw: &str) -> Result<(), ServerError> {
        let normalized = code::normalize(raw);
        let deleted = self.repo.delete(&normalized).await?;
        if !deleted {
            return Err(ServerError::CodeNotFound);
        }
        tracing::info!(code = %normalized, "code deleted");
        Ok(())
    }
}
