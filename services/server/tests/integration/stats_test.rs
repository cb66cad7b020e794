use scoreqr_server::usecase::stats::StatsUseCase;

use crate::helpers::{MockCodeRepo, activated, unactivated};

#[tokio::test]
async fn should_report_zeroes_for_empty_store() {
    let uc = StatsUseCase {
        repo: MockCodeRepo::empty(),
    };
    let out = uc.execute().await.unwrap();
    assert_eq!(out.total_codes, 0);
    assert_eq!(out.activated_codes, 0);
    assert_eq!(out.activation_rate, 0.0);
    assert_eq!(out.today_queries, 0);
}

#[tokio::test]
async fn should_reconcile_counts_and_rate() {
    let repo = MockCodeRepo::new(vec![
        activated("AB23CD45EFGH", 4),
        unactivated("ZZ99YY88XXWW"),
        unactivated("QQ77RR66SSTT"),
    ]);
    let uc = StatsUseCase { repo };

    let out = uc.execute().await.unwrap();
    assert_eq!(out.total_codes, 3);
    assert_eq!(out.activated_codes, 1);
    assert_eq!(out.activation_rate, 33.33);
    // The activated fixture was queried just now, inside today's window.
    assert_eq!(out.today_queries, 1);
}

#[tokio::test]
async fn should_exclude_never_queried_codes_from_today() {
    let repo = MockCodeRepo::new(vec![
        unactivated("AB23CD45EFGH"),
        unactivated("ZZ99YY88XXWW"),
    ]);
    let uc = StatsUseCase { repo };

    let out = uc.execute().await.unwrap();
    assert_eq!(out.today_queries, 0);
}
