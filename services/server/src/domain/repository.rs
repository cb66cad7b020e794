#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};

use scoreqr_core::pagination::PageRequest;

use crate::domain::types::{AuthCode, CodeFilter, CodeSortBy, NewAuthCode, StoreCounts};
use crate::error::ServerError;

/// Repository for authenticity codes. The store is the single source of
/// truth; uniqueness of `code` is its unique constraint, and the activation
/// transition is a conditional update decided by the store itself.
pub trait CodeRepository: Send + Sync {
    /// Fetch a code by its (already normalized) value.
    async fn find(&self, code: &str) -> Result<Option<AuthCode>, ServerError>;

    /// Attempt the one-shot Unactivated→Activated transition.
    ///
    /// Must execute as a single conditional update (`... WHERE code = ? AND
    /// activated = FALSE`) that also bumps `query_count` and
    /// `last_query_date`. Returns `true` only when THIS call performed the
    /// transition; under a concurrent race exactly one caller sees `true`.
    async fn try_activate(
        &self,
        code: &str,
        now: DateTime<Utc>,
        client_ip: &str,
        user_agent: &str,
    ) -> Result<bool, ServerError>;

    /// Record a repeat query: `query_count += 1`, `last_query_date = now`.
    /// Returns `false` when no such code exists.
    async fn record_query(&self, code: &str, now: DateTime<Utc>) -> Result<bool, ServerError>;

    /// Fold a batch of candidates into the store inside one transaction:
    /// already-present codes are skipped, the rest inserted unactivated.
    /// Returns `(added, skipped)`. On a storage fault nothing persists.
    async fn insert_missing(&self, batch: &[NewAuthCode]) -> Result<(u64, u64), ServerError>;

    /// Insert a single new code; `DuplicateCode` when it already exists.
    async fn insert(&self, code: &NewAuthCode) -> Result<(), ServerError>;

    /// Delete by code. Returns `true` if a row was removed.
    async fn delete(&self, code: &str) -> Result<bool, ServerError>;

    /// Row counts for the stats rollup; `today` is the half-open UTC range
    /// covering the server-local calendar day.
    async fn counts(
        &self,
        today_start: DateTime<Utc>,
        today_end: DateTime<Utc>,
    ) -> Result<StoreCounts, ServerError>;

    /// Filtered, sorted page of codes plus total and activated counts under
    /// the same filter.
    async fn list(
        &self,
        filter: &CodeFilter,
        sort_by: CodeSortBy,
        page: PageRequest,
    ) -> Result<(Vec<AuthCode>, u64, u64), ServerError>;
}
