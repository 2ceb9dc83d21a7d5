use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/orders",
            get(handlers::orders::get_order).post(handlers::orders::create_order),
        )
        .route("/api/orders/verify", post(handlers::orders::verify_payment))
}
