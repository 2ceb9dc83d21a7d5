use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use brewline_core::{
    errors::{ShopError, ShopResult},
    models::order::{
        OrderResponse, OrderStatus, OrdersResponse, PaymentStatus, UpdateOrderStatusRequest,
    },
};
use brewline_db::repositories::order::{self, OrderFilter};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    clock::ShopClock,
    middleware::{auth::AdminSession, error_handling::AppError},
    ApiState,
};

#[derive(Debug, Default, Deserialize)]
pub struct AdminOrderQuery {
    /// An order status, or `all` for no filter.
    pub status: Option<String>,
    /// Pickup date as `YYYY-MM-DD` in the shop's timezone.
    pub date: Option<String>,
    /// A payment status, or `all`. Defaults to paid orders.
    pub payment: Option<String>,
}

/// Turns the admin list query into a repository filter.
pub fn parse_order_filter(query: &AdminOrderQuery, clock: &ShopClock) -> ShopResult<OrderFilter> {
    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(value) if value.eq_ignore_ascii_case("all") => None,
        Some(value) => Some(value.to_ascii_uppercase().parse::<OrderStatus>()?),
    };

    let payment_status = match query.payment.as_deref().map(str::trim) {
        None | Some("") => Some(PaymentStatus::Paid),
        Some(value) if value.eq_ignore_ascii_case("all") => None,
        Some(value) => Some(value.to_ascii_uppercase().parse::<PaymentStatus>()?),
    };

    let (pickup_from, pickup_until) = match query.date.as_deref().map(str::trim) {
        None | Some("") => (None, None),
        Some(value) => {
            let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
                ShopError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", value))
            })?;
            let (from, until) = clock.day_bounds(date)?;
            (Some(from), Some(until))
        }
    };

    Ok(OrderFilter {
        status,
        payment_status,
        pickup_from,
        pickup_until,
    })
}

/// The status the counter moves an order to next.
pub fn advance_target(current: OrderStatus) -> ShopResult<OrderStatus> {
    current.next().ok_or_else(|| {
        ShopError::Conflict(format!("A {} order cannot be advanced", current))
    })
}

#[axum::debug_handler]
pub async fn list_orders(
    State(state): State<Arc<ApiState>>,
    _admin: AdminSession,
    Query(query): Query<AdminOrderQuery>,
) -> Result<Json<OrdersResponse>, AppError> {
    let filter = parse_order_filter(&query, &state.clock)?;

    let rows = order::list_orders(&state.db_pool, &filter)
        .await
        .map_err(ShopError::Database)?;
    let orders = order::load_details(&state.db_pool, rows)
        .await
        .map_err(ShopError::Database)?;

    Ok(Json(OrdersResponse { orders }))
}

#[axum::debug_handler]
pub async fn update_order_status(
    State(state): State<Arc<ApiState>>,
    AdminSession(admin): AdminSession,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> Result<Json<OrderResponse>, AppError> {
    let updated = order::update_order_status(&state.db_pool, id, payload.status)
        .await
        .map_err(ShopError::Database)?
        .ok_or_else(|| ShopError::NotFound(format!("Order with ID {} not found", id)))?;
    tracing::info!(
        "Order {} set to {} by admin {}",
        updated.order_number,
        payload.status,
        admin.sub
    );

    let detail = order::load_detail(&state.db_pool, updated)
        .await
        .map_err(ShopError::Database)?;

    Ok(Json(OrderResponse { order: detail }))
}

#[axum::debug_handler]
pub async fn advance_order(
    State(state): State<Arc<ApiState>>,
    _admin: AdminSession,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderResponse>, AppError> {
    let current = order::get_order_by_id(&state.db_pool, id)
        .await
        .map_err(ShopError::Database)?
        .ok_or_else(|| ShopError::NotFound(format!("Order with ID {} not found", id)))?
        .into_order()
        .map_err(ShopError::Database)?;

    let next = advance_target(current.status)?;
    let updated = order::transition_order_status(&state.db_pool, id, current.status, next)
        .await
        .map_err(ShopError::Database)?
        .ok_or_else(|| {
            ShopError::Conflict(format!(
                "Order {} was updated by someone else",
                current.order_number
            ))
        })?;
    tracing::info!("Order {} advanced to {}", updated.order_number, next);

    let detail = order::load_detail(&state.db_pool, updated)
        .await
        .map_err(ShopError::Database)?;

    Ok(Json(OrderResponse { order: detail }))
}
