use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use scoreqr_core::pagination::PageRequest;
use scoreqr_server::domain::repository::CodeRepository;
use scoreqr_server::domain::types::{
    AuthCode, CodeFilter, CodeSortBy, NewAuthCode, StatusFilter, StoreCounts,
};
use scoreqr_server::error::ServerError;

pub const TEST_SECRET: &str = "test-secret-key-2026";
pub const TEST_SALT: &str = "scoreqr_api_salt";

pub fn test_api_key() -> String {
    scoreqr_core::apikey::derive(TEST_SECRET, TEST_SALT)
}

// ── MockCodeRepo ─────────────────────────────────────────────────────────────

/// In-memory repository with the same transition semantics as the real
/// store: the activation check-and-set happens under one lock, so the mock
/// is race-safe the way the conditional UPDATE is.
#[derive(Clone)]
pub struct MockCodeRepo {
    pub rows: Arc<Mutex<Vec<AuthCode>>>,
}

impl MockCodeRepo {
    pub fn new(rows: Vec<AuthCode>) -> Self {
        Self {
            rows: Arc::new(Mutex::new(rows)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Shared handle to the internal rows for post-execution inspection.
    pub fn rows_handle(&self) -> Arc<Mutex<Vec<AuthCode>>> {
        Arc::clone(&self.rows)
    }
}

impl CodeRepository for MockCodeRepo {
    async fn find(&self, code: &str) -> Result<Option<AuthCode>, ServerError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.code == code)
            .cloned())
    }

    async fn try_activate(
        &self,
        code: &str,
        now: DateTime<Utc>,
        client_ip: &str,
        user_agent: &str,
    ) -> Result<bool, ServerError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|r| r.code == code && !r.activated) {
            Some(row) => {
                row.activated = true;
                row.activation_date = Some(now);
                row.activation_ip = Some(client_ip.to_owned());
                row.activation_user_agent = Some(user_agent.to_owned());
                row.query_count += 1;
                row.last_query_date = Some(now);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn record_query(&self, code: &str, now: DateTime<Utc>) -> Result<bool, ServerError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|r| r.code == code) {
            Some(row) => {
                row.query_count += 1;
                row.last_query_date = Some(now);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn insert_missing(&self, batch: &[NewAuthCode]) -> Result<(u64, u64), ServerError> {
        let mut rows = self.rows.lock().unwrap();
        let mut added = 0u64;
        let mut skipped = 0u64;
        for candidate in batch {
            if rows.iter().any(|r| r.code == candidate.code) {
                skipped += 1;
                continue;
            }
            rows.push(AuthCode::new(candidate.code.clone(), candidate.created_date));
            added += 1;
        }
        Ok((added, skipped))
    }

    async fn insert(&self, code: &NewAuthCode) -> Result<(), ServerError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|r| r.code == code.code) {
            return Err(ServerError::DuplicateCode);
        }
        rows.push(AuthCode::new(code.code.clone(), code.created_date));
        Ok(())
    }

    async fn delete(&self, code: &str) -> Result<bool, ServerError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.code != code);
        Ok(rows.len() < before)
    }

    async fn counts(
        &self,
        today_start: DateTime<Utc>,
        today_end: DateTime<Utc>,
    ) -> Result<StoreCounts, ServerError> {
        let rows = self.rows.lock().unwrap();
        let total_codes = rows.len() as u64;
        let activated_codes = rows.iter().filter(|r| r.activated).count() as u64;
        let today_queries = rows
            .iter()
            .filter(|r| {
                r.last_query_date
                    .is_some_and(|t| t >= today_start && t < today_end)
            })
            .count() as u64;
        Ok(StoreCounts {
            total_codes,
            activated_codes,
            today_queries,
        })
    }

    async fn list(
        &self,
        filter: &CodeFilter,
        sort_by: CodeSortBy,
        page: PageRequest,
    ) -> Result<(Vec<AuthCode>, u64, u64), ServerError> {
        let rows = self.rows.lock().unwrap();
        let mut matched: Vec<AuthCode> = rows
            .iter()
            .filter(|r| {
                let search_ok = filter
                    .search
                    .as_deref()
                    .is_none_or(|s| r.code.contains(s));
                let status_ok = match filter.status {
                    StatusFilter::All => true,
                    StatusFilter::Activated => r.activated,
                    StatusFilter::NotActivated => !r.activated,
                };
                search_ok && status_ok
            })
            .cloned()
            .collect();

        let total = matched.len() as u64;
        let activated = matched.iter().filter(|r| r.activated).count() as u64;

        match sort_by {
            CodeSortBy::CreatedDesc => {
                matched.sort_by(|a, b| b.created_date.cmp(&a.created_date));
            }
            CodeSortBy::CreatedAsc => {
                matched.sort_by(|a, b| a.created_date.cmp(&b.created_date));
            }
            CodeSortBy::ActivationDesc => {
                matched.sort_by(|a, b| b.activation_date.cmp(&a.activation_date));
            }
            CodeSortBy::QueryDesc => {
                matched.sort_by(|a, b| b.query_count.cmp(&a.query_count));
            }
        }

        let items = matched
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.per_page as usize)
            .collect();
        Ok((items, total, activated))
    }
}

// ── Test fixtures ────────────────────────────────────────────────────────────

pub fn unactivated(code: &str) -> AuthCode {
    AuthCode::new(code.to_owned(), Utc::now())
}

pub fn activated(code: &str, query_count: i32) -> AuthCode {
    let mut row = unactivated(code);
    row.activated = true;
    row.activation_date = Some(Utc::now());
    row.activation_ip = Some("203.0.113.7".to_owned());
    row.activation_user_agent = Some("scanner/1.0".to_owned());
    row.query_count = query_count;
    row.last_query_date = Some(Utc::now());
    row
}
