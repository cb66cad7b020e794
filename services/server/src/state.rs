use sea_orm::DatabaseConnection;

use crate::infra::db::DbCodeRepository;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    /// Derived once at startup from the configured secret + salt.
    pub expected_api_key: String,
}

impl AppState {
    pub fn code_repo(&self) -> DbCodeRepository {
        DbCodeRepository {
            db: self.db.clone(),
        }
    }
}
