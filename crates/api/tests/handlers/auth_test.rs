use axum::http::StatusCode;
use brewline_api::{
    handlers::auth::{check_otp, is_default_admin_login},
    middleware::auth::hash_password,
};
use brewline_core::errors::ShopError;
use brewline_db::{
    models::{DbAdmin, DbCustomer},
    repositories::admin::verify_password,
};
use chrono::{Duration, Utc};
use mockall::predicate;
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

use crate::test_utils::{build_app, json_request, send, FakeGateway, TestContext};

fn admin_row(username: &str, password: &str) -> DbAdmin {
    DbAdmin {
        id: Uuid::new_v4(),
        username: username.to_string(),
        password_hash: hash_password(password).unwrap(),
        created_at: Utc::now(),
    }
}

fn customer_row(otp: Option<&str>, expires_in: Duration) -> DbCustomer {
    DbCustomer {
        id: Uuid::new_v4(),
        name: String::new(),
        mobile: "9876543210".to_string(),
        otp_code: otp.map(str::to_string),
        otp_expiry: otp.map(|_| Utc::now() + expires_in),
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_admin_password_checked_against_stored_hash() {
    let mut ctx = TestContext::new();
    let stored = admin_row("barista", "s3cret-beans");

    ctx.admin_repo
        .expect_get_admin_by_username()
        .with(predicate::eq("barista"))
        .times(1)
        .returning(move |_| Ok(Some(stored.clone())));

    let account = ctx
        .admin_repo
        .get_admin_by_username("barista")
        .await
        .unwrap()
        .unwrap();

    assert!(verify_password(&account, "s3cret-beans").unwrap());
    assert!(!verify_password(&account, "admin123").unwrap());
}

#[tokio::test]
async fn test_default_admin_only_bootstraps_with_default_credentials() {
    let mut ctx = TestContext::new();

    ctx.admin_repo
        .expect_get_admin_by_username()
        .returning(|_| Ok(None));

    assert!(ctx.admin_repo.get_admin_by_username("admin").await.unwrap().is_none());
    assert!(is_default_admin_login("admin", "admin123"));
    assert!(!is_default_admin_login("admin", "admin1234"));
    assert!(!is_default_admin_login("root", "admin123"));
}

#[tokio::test]
async fn test_otp_accepted_once_issued_and_fresh() {
    let mut ctx = TestContext::new();

    ctx.customer_repo
        .expect_get_customer_by_mobile()
        .with(predicate::eq("9876543210"))
        .returning(|_| Ok(Some(customer_row(Some("482913"), Duration::minutes(10)))));

    let customer = ctx
        .customer_repo
        .get_customer_by_mobile("9876543210")
        .await
        .unwrap()
        .unwrap();

    assert!(check_otp(&customer, "482913", Utc::now()).is_ok());
    assert!(check_otp(&customer, " 482913 ", Utc::now()).is_ok());
    assert!(matches!(
        check_otp(&customer, "000000", Utc::now()),
        Err(ShopError::Validation(_))
    ));
    assert!(check_otp(&customer, "482913", Utc::now() + Duration::minutes(11)).is_err());
}

#[test]
fn test_otp_rejected_when_none_outstanding() {
    let used = customer_row(None, Duration::zero());
    let expired = customer_row(Some("482913"), Duration::minutes(-1));

    assert!(check_otp(&used, "482913", Utc::now()).is_err());
    assert!(check_otp(&expired, "482913", Utc::now()).is_err());
}

#[tokio::test]
async fn test_send_otp_rejects_invalid_mobile() {
    let app = build_app(FakeGateway::configured());

    let (status, body) = send(
        app,
        json_request("POST", "/api/auth/customer/send-otp", json!({"mobile": "12345"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation error: Enter a valid 10-digit mobile number");
}

#[tokio::test]
async fn test_admin_login_requires_credentials() {
    let app = build_app(FakeGateway::configured());

    let (status, _) = send(
        app,
        json_request(
            "POST",
            "/api/auth/admin/login",
            json!({"username": "  ", "password": ""}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
