//! Customer checkout.
//!
//! An order holds its pickup slot from the moment it is inserted. Capacity is
//! checked and the order inserted inside one transaction that holds the slot
//! configuration row lock, so two customers cannot both take the last seat.
//! The gateway order is opened after the commit; if that fails the order is
//! cancelled and its seat released.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use brewline_core::{
    errors::{ShopError, ShopResult},
    models::{
        location::PickupLocation,
        menu::MenuItem,
        order::{
            generate_order_number, is_valid_mobile, CreateOrderRequest, CreateOrderResponse,
            OrderResponse, VerifyPaymentRequest, VerifyPaymentResponse,
        },
        time_slot::TimeSlotConfig,
    },
    pricing::{price_lines, PricedLine},
    slots::{ensure_bookable, format_clock, parse_clock, SlotWindow},
};
use brewline_db::repositories::{location, menu, order, time_slot_config};
use chrono::{NaiveTime, Utc};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

/// A validated, priced order that still needs a pickup seat.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkout {
    pub customer_name: String,
    pub customer_mobile: String,
    pub pickup_location_id: Uuid,
    pub pickup: NaiveTime,
    pub lines: Vec<PricedLine>,
    pub total: i64,
}

/// Checks the customer details and prices the order.
///
/// `location` is the requested pickup location as stored, and `menu` holds
/// the stored rows for the requested menu items.
pub fn prepare_checkout(
    payload: &CreateOrderRequest,
    location: Option<&PickupLocation>,
    menu: &[MenuItem],
) -> ShopResult<Checkout> {
    let customer_name = payload.customer_name.trim();
    if customer_name.is_empty() {
        return Err(ShopError::Validation("Customer name is required".to_string()));
    }
    let customer_mobile = payload.customer_mobile.trim();
    if !is_valid_mobile(customer_mobile) {
        return Err(ShopError::Validation(
            "Enter a valid 10-digit mobile number".to_string(),
        ));
    }

    match location {
        Some(location) if location.is_active => {}
        _ => {
            return Err(ShopError::Validation(
                "Pickup location is unavailable".to_string(),
            ))
        }
    }

    let pickup = parse_clock(payload.pickup_time.trim())?;
    let (lines, total) = price_lines(&payload.items, menu)?;

    Ok(Checkout {
        customer_name: customer_name.to_string(),
        customer_mobile: customer_mobile.to_string(),
        pickup_location_id: payload.pickup_location_id,
        pickup,
        lines,
        total,
    })
}

/// Gateway amounts are in paise; menu prices are whole rupees.
pub fn amount_in_paise(total: i64) -> i64 {
    total * 100
}

#[axum::debug_handler]
pub async fn create_order(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<Json<CreateOrderResponse>, AppError> {
    let gateway_key_id = state.payments.key_id()?;

    let pickup_location: Option<PickupLocation> =
        location::get_location_by_id(&state.db_pool, payload.pickup_location_id)
            .await
            .map_err(ShopError::Database)?
            .map(Into::into);
    let item_ids: Vec<Uuid> = payload.items.iter().map(|line| line.menu_item_id).collect();
    let menu_items: Vec<MenuItem> = menu::get_menu_items_by_ids(&state.db_pool, &item_ids)
        .await
        .map_err(ShopError::Database)?
        .into_iter()
        .map(Into::into)
        .collect();

    let checkout = prepare_checkout(&payload, pickup_location.as_ref(), &menu_items)?;

    let now = state.clock.now_local();
    let pickup_time = state.clock.to_utc(now.date().and_time(checkout.pickup))?;
    let order_number = generate_order_number(Utc::now());

    let mut tx = state.db_pool.begin().await.map_err(|e| ShopError::Database(e.into()))?;

    let config: TimeSlotConfig = time_slot_config::lock_config(&mut *tx)
        .await
        .map_err(ShopError::Database)?
        .into();
    let window = SlotWindow::from_config(&config)?;
    let booked = order::count_slot_holders(&mut *tx, pickup_time)
        .await
        .map_err(ShopError::Database)?;
    ensure_bookable(&window, checkout.pickup, booked, now)?;

    let created = order::insert_order(
        &mut *tx,
        &order::NewOrder {
            order_number: &order_number,
            customer_name: &checkout.customer_name,
            customer_mobile: &checkout.customer_mobile,
            pickup_location_id: checkout.pickup_location_id,
            pickup_time,
            total_amount: checkout.total,
            lines: &checkout.lines,
        },
    )
    .await
    .map_err(ShopError::Database)?;

    tx.commit().await.map_err(|e| ShopError::Database(e.into()))?;
    tracing::info!(
        "Order {} placed for {} pickup ({} of {} seats taken before)",
        created.order_number,
        format_clock(checkout.pickup),
        booked,
        window.max_orders_per_slot
    );

    let amount = amount_in_paise(checkout.total);
    let gateway_order = match state
        .payments
        .create_order(
            amount,
            &created.order_number,
            json!({
                "orderId": created.id,
                "customerName": checkout.customer_name,
                "customerMobile": checkout.customer_mobile,
            }),
        )
        .await
    {
        Ok(gateway_order) => gateway_order,
        Err(e) => {
            if let Err(release_err) = order::mark_payment_failed(&state.db_pool, created.id).await {
                tracing::error!(
                    "Failed to release slot for order {}: {:?}",
                    created.order_number,
                    release_err
                );
            }
            return Err(AppError(e));
        }
    };

    let updated = order::set_gateway_order_id(&state.db_pool, created.id, &gateway_order.id)
        .await
        .map_err(ShopError::Database)?;
    let detail = order::load_detail(&state.db_pool, updated)
        .await
        .map_err(ShopError::Database)?;

    Ok(Json(CreateOrderResponse {
        order: detail,
        gateway_order_id: gateway_order.id,
        gateway_key_id,
        amount,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLookup {
    pub id: Option<Uuid>,
    pub order_number: Option<String>,
}

#[axum::debug_handler]
pub async fn get_order(
    State(state): State<Arc<ApiState>>,
    Query(lookup): Query<OrderLookup>,
) -> Result<Json<OrderResponse>, AppError> {
    let found = match (lookup.id, lookup.order_number.as_deref()) {
        (Some(id), _) => order::get_order_by_id(&state.db_pool, id).await,
        (None, Some(number)) if !number.trim().is_empty() => {
            order::get_order_by_number(&state.db_pool, number.trim()).await
        }
        _ => {
            return Err(AppError(ShopError::Validation(
                "Order id or order number is required".to_string(),
            )))
        }
    }
    .map_err(ShopError::Database)?
    .ok_or_else(|| ShopError::NotFound("Order not found".to_string()))?;

    let detail = order::load_detail(&state.db_pool, found)
        .await
        .map_err(ShopError::Database)?;

    Ok(Json(OrderResponse { order: detail }))
}

#[axum::debug_handler]
pub async fn verify_payment(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<VerifyPaymentRequest>,
) -> Result<Json<VerifyPaymentResponse>, AppError> {
    let is_valid = state.payments.verify_signature(
        &payload.gateway_order_id,
        &payload.gateway_payment_id,
        &payload.signature,
    )?;
    if !is_valid {
        tracing::warn!(
            "Rejected payment signature for gateway order {}",
            payload.gateway_order_id
        );
        return Err(AppError(ShopError::Validation(
            "Invalid payment signature".to_string(),
        )));
    }

    let paid = order::mark_order_paid(
        &state.db_pool,
        &payload.gateway_order_id,
        &payload.gateway_payment_id,
    )
    .await
    .map_err(ShopError::Database)?
    .ok_or_else(|| ShopError::NotFound("Order not found".to_string()))?;
    tracing::info!("Payment confirmed for order {}", paid.order_number);

    let detail = order::load_detail(&state.db_pool, paid)
        .await
        .map_err(ShopError::Database)?;

    Ok(Json(VerifyPaymentResponse {
        success: true,
        order: detail,
    }))
}
