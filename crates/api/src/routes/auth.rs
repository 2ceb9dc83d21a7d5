use axum::{routing::post, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/auth/admin/login", post(handlers::auth::admin_login))
        .route("/api/auth/customer/send-otp", post(handlers::auth::send_otp))
        .route("/api/auth/customer/verify-otp", post(handlers::auth::verify_otp))
}
