use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use brewline_core::{
    errors::ShopError,
    models::{
        location::{CreateLocationRequest, LocationResponse, LocationsResponse, UpdateLocationRequest},
        menu::DeleteResponse,
    },
};
use brewline_db::{is_foreign_key_violation, repositories::location};
use uuid::Uuid;

use crate::{
    handlers::menu::required_name,
    middleware::{auth::AdminSession, error_handling::AppError},
    ApiState,
};

async fn list(state: &ApiState, active_only: bool) -> Result<LocationsResponse, AppError> {
    let locations = location::get_locations(&state.db_pool, active_only)
        .await
        .map_err(ShopError::Database)?;

    Ok(LocationsResponse {
        locations: locations.into_iter().map(Into::into).collect(),
    })
}

#[axum::debug_handler]
pub async fn get_locations(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<LocationsResponse>, AppError> {
    Ok(Json(list(&state, true).await?))
}

#[axum::debug_handler]
pub async fn get_admin_locations(
    State(state): State<Arc<ApiState>>,
    _admin: AdminSession,
) -> Result<Json<LocationsResponse>, AppError> {
    Ok(Json(list(&state, false).await?))
}

#[axum::debug_handler]
pub async fn create_location(
    State(state): State<Arc<ApiState>>,
    _admin: AdminSession,
    Json(payload): Json<CreateLocationRequest>,
) -> Result<Json<LocationResponse>, AppError> {
    let name = required_name("Location name", &payload.name)?;
    let address = required_name("Address", &payload.address)?;

    let created = location::create_location(&state.db_pool, &name, &address, payload.sort_order)
        .await
        .map_err(ShopError::Database)?;
    tracing::info!("Pickup location created: {} ({})", created.name, created.id);

    Ok(Json(LocationResponse {
        location: created.into(),
    }))
}

#[axum::debug_handler]
pub async fn update_location(
    State(state): State<Arc<ApiState>>,
    _admin: AdminSession,
    Path(id): Path<Uuid>,
    Json(mut payload): Json<UpdateLocationRequest>,
) -> Result<Json<LocationResponse>, AppError> {
    if let Some(name) = &payload.name {
        payload.name = Some(required_name("Location name", name)?);
    }
    if let Some(address) = &payload.address {
        payload.address = Some(required_name("Address", address)?);
    }

    let updated = location::update_location(&state.db_pool, id, &payload)
        .await
        .map_err(ShopError::Database)?
        .ok_or_else(|| ShopError::NotFound(format!("Pickup location with ID {} not found", id)))?;

    Ok(Json(LocationResponse {
        location: updated.into(),
    }))
}

#[axum::debug_handler]
pub async fn delete_location(
    State(state): State<Arc<ApiState>>,
    _admin: AdminSession,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, AppError> {
    let deleted = location::delete_location(&state.db_pool, id)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                ShopError::Conflict(
                    "Pickup location has orders; deactivate it instead".to_string(),
                )
            } else {
                ShopError::Database(e)
            }
        })?;
    if !deleted {
        return Err(AppError(ShopError::NotFound(format!(
            "Pickup location with ID {} not found",
            id
        ))));
    }
    tracing::info!("Pickup location deleted: {}", id);

    Ok(Json(DeleteResponse { success: true }))
}
