use chrono::{DateTime, Duration, Local, LocalResult, NaiveTime, TimeZone, Utc};
use serde::Serialize;

use crate::domain::repository::CodeRepository;
use crate::error::ServerError;

/// Read-only rollup over the code store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatsOutput {
    pub total_codes: u64,
    pub activated_codes: u64,
    /// Percentage rounded to 2 decimals; 0 when the store is empty.
    pub activation_rate: f64,
    pub today_queries: u64,
}

pub struct StatsUseCase<R: CodeRepository> {
    pub repo: R,
}

impl<R: CodeRepository> StatsUseCase<R> {
    pub async fn execute(&self) -> Result<StatsOutput, ServerError> {
        let (today_start, today_end) = local_day_bounds();
        let counts = self.repo.counts(today_start, today_end).await?;
        Ok(StatsOutput {
            total_codes: counts.total_codes,
            activated_codes: counts.activated_codes,
            activation_rate: activation_rate(counts.activated_codes, counts.total_codes),
            today_queries: counts.today_queries,
        })
    }
}

/// `activated / total * 100`, rounded to 2 decimals; 0 when `total == 0`.
pub fn activation_rate(activated: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let rate = activated as f64 / total as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}

/// Half-open UTC range `[midnight, midnight + 1 day)` for the server-local
/// calendar day. A DST gap exactly at midnight falls back to the current
/// instant rather than failing the stats call.
fn local_day_bounds() -> (DateTime<Utc>, DateTime<Utc>) {
    let now = Local::now();
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    let start = match Local.from_local_datetime(&midnight) {
        LocalResult::Single(t) => t,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => now,
    }
    .with_timezone(&Utc);
    (start, start + Duration::days(1))
}
