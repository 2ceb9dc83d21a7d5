use std::sync::Arc;

use axum::{extract::State, Json};
use brewline_core::{
    cart::{Cart, CartQuoteResponse},
    errors::{ShopError, ShopResult},
    models::menu::MenuItem,
    pricing::price_lines,
};
use brewline_db::repositories::menu;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

/// Re-prices `cart` against the stored menu. An empty cart quotes zero.
pub fn quote_cart(mut cart: Cart, menu: &[MenuItem]) -> ShopResult<CartQuoteResponse> {
    if !cart.items.is_empty() {
        let (priced, _) = price_lines(&cart.order_lines(), menu)?;
        cart.reprice(&priced);
    }

    Ok(CartQuoteResponse {
        total: cart.total(),
        total_items: cart.total_items(),
        cart,
    })
}

#[axum::debug_handler]
pub async fn quote(
    State(state): State<Arc<ApiState>>,
    Json(cart): Json<Cart>,
) -> Result<Json<CartQuoteResponse>, AppError> {
    let ids: Vec<Uuid> = cart.items.iter().map(|item| item.menu_item_id).collect();
    let menu_items: Vec<MenuItem> = if ids.is_empty() {
        Vec::new()
    } else {
        menu::get_menu_items_by_ids(&state.db_pool, &ids)
            .await
            .map_err(ShopError::Database)?
            .into_iter()
            .map(Into::into)
            .collect()
    };

    Ok(Json(quote_cart(cart, &menu_items)?))
}
