use std::sync::Arc;

use axum::{extract::State, Json};
use brewline_core::{errors::ShopError, models::order::OrdersResponse};
use brewline_db::repositories::order;

use crate::{
    middleware::{auth::AdminSession, error_handling::AppError},
    ApiState,
};

/// Today's paid orders still to be prepared or handed over, by pickup time.
#[axum::debug_handler]
pub async fn get_counter_orders(
    State(state): State<Arc<ApiState>>,
    _admin: AdminSession,
) -> Result<Json<OrdersResponse>, AppError> {
    let (from, until) = state.clock.today_bounds(state.clock.now_local())?;

    let rows = order::list_active_orders(&state.db_pool, from, until)
        .await
        .map_err(ShopError::Database)?;
    let orders = order::load_details(&state.db_pool, rows)
        .await
        .map_err(ShopError::Database)?;

    Ok(Json(OrdersResponse { orders }))
}
