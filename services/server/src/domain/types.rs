use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One authenticity code as stored on the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCode {
    pub code: String,
    pub created_date: DateTime<Utc>,
    pub activated: bool,
    pub activation_date: Option<DateTime<Utc>>,
    pub activation_ip: Option<String>,
    pub activation_user_agent: Option<String>,
    pub query_count: i32,
    pub last_query_date: Option<DateTime<Utc>>,
}

impl AuthCode {
    /// A fresh, never-activated record for `code` issued at `created_date`.
    pub fn new(code: String, created_date: DateTime<Utc>) -> Self {
        Self {
            code,
            created_date,
            activated: false,
            activation_date: None,
            activation_ip: None,
            activation_user_agent: None,
            query_count: 0,
            last_query_date: None,
        }
    }
}

/// A normalized candidate accepted into a sync batch.
#[derive(Debug, Clone)]
pub struct NewAuthCode {
    pub code: String,
    pub created_date: DateTime<Utc>,
}

/// Activation-status filter for the admin listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusFilter {
    #[default]
    All,
    Activated,
    NotActivated,
}

impl StatusFilter {
    pub fn from_kebab_case(s: &str) -> Option<Self> {
        match s {
            "all" => Some(Self::All),
            "activated" => Some(Self::Activated),
            "not-activated" => Some(Self::NotActivated),
            _ => None,
        }
    }
}

/// Sort orders for the admin listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CodeSortBy {
    #[default]
    CreatedDesc,
    CreatedAsc,
    ActivationDesc,
    QueryDesc,
}

impl CodeSortBy {
    pub fn from_kebab_case(s: &str) -> Option<Self> {
        match s {
            "created-desc" => Some(Self::CreatedDesc),
            "created-asc" => Some(Self::CreatedAsc),
            "activation-desc" => Some(Self::ActivationDesc),
            "query-desc" => Some(Self::QueryDesc),
            _ => None,
        }
    }
}

/// Listing filter: optional code substring plus activation status.
#[derive(Debug, Clone, Default)]
pub struct CodeFilter {
    pub search: Option<String>,
    pub status: StatusFilter,
}

/// Row counts backing the stats rollup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreCounts {
    pub total_codes: u64,
    pub activated_codes: u64,
    pub today_queries: u64,
}
