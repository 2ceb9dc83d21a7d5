use axum::{
    body::to_bytes,
    http::StatusCode,
    response::IntoResponse,
};
use brewline_api::middleware::error_handling::AppError;
use brewline_core::errors::ShopError;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

async fn render(error: ShopError) -> (StatusCode, serde_json::Value) {
    let response = AppError(error).into_response();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[rstest]
#[case(ShopError::NotFound("Order not found".into()), StatusCode::NOT_FOUND)]
#[case(ShopError::Validation("Invalid input".into()), StatusCode::BAD_REQUEST)]
#[case(ShopError::Conflict("Slot is full".into()), StatusCode::CONFLICT)]
#[case(ShopError::Authentication("Unauthorized".into()), StatusCode::UNAUTHORIZED)]
#[case(ShopError::Authorization("Not allowed".into()), StatusCode::FORBIDDEN)]
#[case(ShopError::Payment("Gateway down".into()), StatusCode::BAD_GATEWAY)]
#[case(ShopError::Database(eyre::eyre!("connection refused")), StatusCode::INTERNAL_SERVER_ERROR)]
#[tokio::test]
async fn test_error_status_mapping(#[case] error: ShopError, #[case] expected: StatusCode) {
    let (status, body) = render(error).await;

    assert_eq!(status, expected);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_client_errors_carry_their_message() {
    let (_, body) = render(ShopError::Conflict("Pickup slot 10:30 is fully booked".into())).await;

    assert_eq!(body, json!({"error": "Conflict: Pickup slot 10:30 is fully booked"}));
}

#[tokio::test]
async fn test_server_errors_hide_details() {
    let (_, body) = render(ShopError::Database(eyre::eyre!("password authentication failed"))).await;
    assert_eq!(body, json!({"error": "Internal server error"}));

    let (_, body) = render(ShopError::Internal(Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        "disk full",
    ))))
    .await;
    assert_eq!(body, json!({"error": "Internal server error"}));
}

#[tokio::test]
async fn test_payment_errors_are_shown() {
    let (_, body) = render(ShopError::Payment("Failed to create payment order".into())).await;

    assert_eq!(body, json!({"error": "Payment error: Failed to create payment order"}));
}

#[test]
fn test_repository_errors_become_database_errors() {
    let error: AppError = eyre::eyre!("timeout").into();

    assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(matches!(error.0, ShopError::Database(_)));
}
