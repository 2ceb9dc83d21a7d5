//! # Error Handling Middleware
//!
//! This module provides a standardized way to handle errors in the Brewline API.
//! It maps domain-specific errors to appropriate HTTP status codes and JSON
//! error responses of the form `{"error": "..."}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use brewline_core::errors::ShopError;

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps domain-specific `ShopError` instances and implements
/// `IntoResponse` to convert them into HTTP responses with appropriate
/// status codes and JSON payloads.
///
/// # Example
///
/// ```
/// use axum::Json;
/// use brewline_api::middleware::error_handling::AppError;
/// use brewline_core::errors::ShopError;
///
/// async fn handler(order_number: String) -> Result<Json<String>, AppError> {
///     if order_number.is_empty() {
///         return Err(AppError(ShopError::Validation("Order number required".to_string())));
///     }
///     Ok(Json(order_number))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub ShopError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ShopError::NotFound(_) => StatusCode::NOT_FOUND,
            ShopError::Validation(_) => StatusCode::BAD_REQUEST,
            ShopError::Conflict(_) => StatusCode::CONFLICT,
            ShopError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ShopError::Authorization(_) => StatusCode::FORBIDDEN,
            ShopError::Payment(_) => StatusCode::BAD_GATEWAY,
            ShopError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ShopError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Converts application errors to HTTP responses
///
/// Server-side failures are logged with their full cause and reported to the
/// client with a generic message.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if status.is_server_error() && !matches!(self.0, ShopError::Payment(_)) {
            tracing::error!("Request failed: {:?}", self.0);
            "Internal server error".to_string()
        } else {
            tracing::debug!("Request rejected: {}", self.0);
            self.0.to_string()
        };
        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

/// Allows using `?` on `ShopResult` values in handlers.
impl From<ShopError> for AppError {
    fn from(err: ShopError) -> Self {
        AppError(err)
    }
}

/// Allows using `?` on repository results; failures become database errors.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(ShopError::Database(err))
    }
}
