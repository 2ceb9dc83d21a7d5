use std::sync::Arc;

use axum::{extract::State, Json};
use brewline_core::{
    errors::{ShopError, ShopResult},
    models::time_slot::{
        GetTimeSlotsResponse, SlotConfigSummary, TimeSlotConfig, TimeSlotConfigResponse,
        UpdateTimeSlotConfigRequest,
    },
    slots::{format_clock, generate_slots, tally_bookings, SlotWindow},
};
use brewline_db::repositories::{order, time_slot_config};
use chrono::NaiveDateTime;

use crate::{
    middleware::{auth::AdminSession, error_handling::AppError},
    ApiState,
};

/// Today's slots for `config`, given the shop-local pickup times of the
/// orders already booked today.
pub fn build_slot_listing<I>(
    config: &TimeSlotConfig,
    booked_pickups: I,
    now: NaiveDateTime,
) -> ShopResult<GetTimeSlotsResponse>
where
    I: IntoIterator<Item = NaiveDateTime>,
{
    let window = SlotWindow::from_config(config)?;
    let tally = tally_bookings(booked_pickups);

    Ok(GetTimeSlotsResponse {
        slots: generate_slots(&window, &tally, now),
        config: SlotConfigSummary {
            start_time: config.start_time.clone(),
            end_time: config.end_time.clone(),
            slot_duration: config.slot_duration,
        },
    })
}

/// Validates a configuration update. Besides the checks every window gets,
/// staff may not save a window that closes before it opens.
pub fn validate_config_update(payload: &UpdateTimeSlotConfigRequest) -> ShopResult<SlotWindow> {
    let window = SlotWindow::new(
        payload.start_time.trim(),
        payload.end_time.trim(),
        payload.slot_duration,
        payload.max_orders_per_slot,
    )?;

    if window.start >= window.end {
        return Err(ShopError::Validation(
            "Start time must be before end time".to_string(),
        ));
    }
    Ok(window)
}

#[axum::debug_handler]
pub async fn get_timeslots(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<GetTimeSlotsResponse>, AppError> {
    let config: TimeSlotConfig = time_slot_config::get_or_create_config(&state.db_pool)
        .await
        .map_err(ShopError::Database)?
        .into();

    let now = state.clock.now_local();
    let (from, until) = state.clock.today_bounds(now)?;
    let pickups = order::get_paid_pickup_times(&state.db_pool, from, until)
        .await
        .map_err(ShopError::Database)?;

    let response = build_slot_listing(
        &config,
        pickups.into_iter().map(|pickup| state.clock.to_local(pickup)),
        now,
    )?;

    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn get_config(
    State(state): State<Arc<ApiState>>,
    _admin: AdminSession,
) -> Result<Json<TimeSlotConfigResponse>, AppError> {
    let config = time_slot_config::get_or_create_config(&state.db_pool)
        .await
        .map_err(ShopError::Database)?;

    Ok(Json(TimeSlotConfigResponse {
        config: config.into(),
    }))
}

#[axum::debug_handler]
pub async fn update_config(
    State(state): State<Arc<ApiState>>,
    _admin: AdminSession,
    Json(payload): Json<UpdateTimeSlotConfigRequest>,
) -> Result<Json<TimeSlotConfigResponse>, AppError> {
    let window = validate_config_update(&payload)?;

    let config = time_slot_config::upsert_config(
        &state.db_pool,
        &format_clock(window.start),
        &format_clock(window.end),
        window.slot_duration,
        window.max_orders_per_slot,
    )
    .await
    .map_err(ShopError::Database)?;
    tracing::info!(
        "Slot config updated: {}-{}, {} min, {} per slot",
        config.start_time,
        config.end_time,
        config.slot_duration,
        config.max_orders_per_slot
    );

    Ok(Json(TimeSlotConfigResponse {
        config: config.into(),
    }))
}
