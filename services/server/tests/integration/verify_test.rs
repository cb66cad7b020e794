use scoreqr_server::error::ServerError;
use scoreqr_server::usecase::verify::{VerifyCodeUseCase, VerifyInput};

use crate::helpers::{MockCodeRepo, activated, unactivated};

fn input(code: &str) -> VerifyInput {
    VerifyInput {
        code: code.to_owned(),
        client_ip: "203.0.113.7".to_owned(),
        user_agent: "scanner/1.0".to_owned(),
    }
}

#[tokio::test]
async fn should_activate_on_first_verification() {
    let repo = MockCodeRepo::new(vec![unactivated("AB23CD45EFGH")]);
    let rows = repo.rows_handle();
    let uc = VerifyCodeUseCase { repo };

    let out = uc.execute(input("AB23CD45EFGH")).await.unwrap();
    assert!(out.first_activation);
    assert!(out.activation_date.is_some());

    let rows = rows.lock().unwrap();
    let row = &rows[0];
    assert!(row.activated);
    assert_eq!(row.query_count, 1);
    assert_eq!(row.activation_ip.as_deref(), Some("203.0.113.7"));
    assert_eq!(row.activation_user_agent.as_deref(), Some("scanner/1.0"));
    assert_eq!(row.activation_date, out.activation_date);
    assert_eq!(row.last_query_date, out.activation_date);
}

#[tokio::test]
async fn should_report_repeat_verification_without_touching_activation_fields() {
    let repo = MockCodeRepo::new(vec![unactivated("AB23CD45EFGH")]);
    let rows = repo.rows_handle();
    let uc = VerifyCodeUseCase { repo };

    let first = uc.execute(input("AB23CD45EFGH")).await.unwrap();
    let second = uc.execute(input("AB23CD45EFGH")).await.unwrap();

    assert!(first.first_activation);
    assert!(!second.first_activation);
    // The original activation date is reported back, never overwritten.
    assert_eq!(second.activation_date, first.activation_date);

    let rows = rows.lock().unwrap();
    assert_eq!(rows[0].query_count, 2);
    assert_eq!(rows[0].activation_date, first.activation_date);
}

#[tokio::test]
async fn should_count_every_successful_verification() {
    let repo = MockCodeRepo::new(vec![unactivated("AB23CD45EFGH")]);
    let rows = repo.rows_handle();
    let uc = VerifyCodeUseCase { repo };

    for _ in 0..5 {
        uc.execute(input("AB23CD45EFGH")).await.unwrap();
    }

    assert_eq!(rows.lock().unwrap()[0].query_count, 5);
}

#[tokio::test]
async fn should_normalize_code_before_lookup() {
    let repo = MockCodeRepo::new(vec![unactivated("AB23CD45EFGH")]);
    let uc = VerifyCodeUseCase { repo };

    let out = uc.execute(input("  ab23cd45efgh ")).await.unwrap();
    assert!(out.first_activation);
    assert_eq!(out.code, "AB23CD45EFGH");
}

#[tokio::test]
async fn should_reject_unknown_code_without_mutation() {
    let repo = MockCodeRepo::new(vec![activated("ZZ99YY88XXWW", 3)]);
    let rows = repo.rows_handle();
    let uc = VerifyCodeUseCase { repo };

    let result = uc.execute(input("AB23CD45EFGH")).await;
    assert!(
        matches!(result, Err(ServerError::UnknownCode)),
        "expected UnknownCode, got {result:?}"
    );
    assert_eq!(rows.lock().unwrap()[0].query_count, 3);
}

#[tokio::test]
async fn should_reject_malformed_codes_without_store_access() {
    let repo = MockCodeRepo::new(vec![unactivated("AB23CD45EFGH")]);
    let rows = repo.rows_handle();
    let uc = VerifyCodeUseCase { repo };

    for bad in ["short", "", "AB23CD45EFGHX"] {
        let result = uc.execute(input(bad)).await;
        assert!(
            matches!(result, Err(ServerError::InvalidCodeFormat)),
            "expected InvalidCodeFormat for {bad:?}, got {result:?}"
        );
    }

    let rows = rows.lock().unwrap();
    assert!(!rows[0].activated);
    assert_eq!(rows[0].query_count, 0);
}

#[tokio::test]
async fn should_activate_exactly_once_under_concurrent_verifications() {
    let repo = MockCodeRepo::new(vec![unactivated("AB23CD45EFGH")]);
    let rows = repo.rows_handle();

    let uc_a = VerifyCodeUseCase { repo: repo.clone() };
    let uc_b = VerifyCodeUseCase { repo };

    let a = tokio::spawn(async move { uc_a.execute(input("AB23CD45EFGH")).await });
    let b = tokio::spawn(async move { uc_b.execute(input("AB23CD45EFGH")).await });

    let out_a = a.await.unwrap().unwrap();
    let out_b = b.await.unwrap().unwrap();

    assert_eq!(
        [out_a.first_activation, out_b.first_activation]
            .iter()
            .filter(|&&first| first)
            .count(),
        1,
        "exactly one request must perform the activation"
    );

    let rows = rows.lock().unwrap();
    assert!(rows[0].activated);
    assert_eq!(rows[0].query_count, 2);
}
