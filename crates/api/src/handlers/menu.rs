use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use brewline_core::{
    errors::{ShopError, ShopResult},
    models::menu::{
        Category, CategoryResponse, CategoryWithItems, CreateCategoryRequest,
        CreateMenuItemRequest, DeleteResponse, MenuItem, MenuItemResponse, MenuResponse,
        UpdateCategoryRequest, UpdateMenuItemRequest,
    },
};
use brewline_db::{is_foreign_key_violation, repositories::menu};
use uuid::Uuid;

use crate::{
    middleware::{auth::AdminSession, error_handling::AppError},
    ApiState,
};

/// Groups items under their categories, keeping the order of `categories`
/// and sorting each category's items by `sort_order`, then name.
/// Items whose category is not listed are left out.
pub fn group_menu(categories: Vec<Category>, items: Vec<MenuItem>) -> MenuResponse {
    let mut by_category: HashMap<Uuid, Vec<MenuItem>> = HashMap::new();
    for item in items {
        by_category.entry(item.category_id).or_default().push(item);
    }

    let categories = categories
        .into_iter()
        .map(|category| {
            let mut items = by_category.remove(&category.id).unwrap_or_default();
            items.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.name.cmp(&b.name)));
            CategoryWithItems { category, items }
        })
        .collect();

    MenuResponse { categories }
}

/// Trims `value` and rejects it when nothing is left.
pub fn required_name(field: &str, value: &str) -> ShopResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ShopError::Validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

pub fn validate_price(price: i64) -> ShopResult<()> {
    if price <= 0 {
        return Err(ShopError::Validation("Price must be greater than zero".to_string()));
    }
    Ok(())
}

fn delete_conflict(err: eyre::Report, what: &str) -> ShopError {
    if is_foreign_key_violation(&err) {
        ShopError::Conflict(format!("{} is referenced by existing orders", what))
    } else {
        ShopError::Database(err)
    }
}

async fn load_menu(state: &ApiState, active_only: bool) -> Result<MenuResponse, AppError> {
    let categories = menu::get_categories(&state.db_pool, active_only)
        .await
        .map_err(ShopError::Database)?;
    let items = menu::get_menu_items(&state.db_pool, active_only)
        .await
        .map_err(ShopError::Database)?;

    Ok(group_menu(
        categories.into_iter().map(Into::into).collect(),
        items.into_iter().map(Into::into).collect(),
    ))
}

#[axum::debug_handler]
pub async fn get_menu(State(state): State<Arc<ApiState>>) -> Result<Json<MenuResponse>, AppError> {
    Ok(Json(load_menu(&state, true).await?))
}

#[axum::debug_handler]
pub async fn get_admin_menu(
    State(state): State<Arc<ApiState>>,
    _admin: AdminSession,
) -> Result<Json<MenuResponse>, AppError> {
    Ok(Json(load_menu(&state, false).await?))
}

#[axum::debug_handler]
pub async fn create_category(
    State(state): State<Arc<ApiState>>,
    _admin: AdminSession,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<Json<CategoryResponse>, AppError> {
    let name = required_name("Category name", &payload.name)?;

    let category = menu::create_category(&state.db_pool, &name, payload.sort_order)
        .await
        .map_err(ShopError::Database)?;
    tracing::info!("Category created: {} ({})", category.name, category.id);

    Ok(Json(CategoryResponse {
        category: category.into(),
    }))
}

#[axum::debug_handler]
pub async fn update_category(
    State(state): State<Arc<ApiState>>,
    _admin: AdminSession,
    Path(id): Path<Uuid>,
    Json(mut payload): Json<UpdateCategoryRequest>,
) -> Result<Json<CategoryResponse>, AppError> {
    if let Some(name) = &payload.name {
        payload.name = Some(required_name("Category name", name)?);
    }

    let category = menu::update_category(&state.db_pool, id, &payload)
        .await
        .map_err(ShopError::Database)?
        .ok_or_else(|| ShopError::NotFound(format!("Category with ID {} not found", id)))?;

    Ok(Json(CategoryResponse {
        category: category.into(),
    }))
}

#[axum::debug_handler]
pub async fn delete_category(
    State(state): State<Arc<ApiState>>,
    _admin: AdminSession,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, AppError> {
    let deleted = menu::delete_category(&state.db_pool, id)
        .await
        .map_err(|e| delete_conflict(e, "Category"))?;
    if !deleted {
        return Err(AppError(ShopError::NotFound(format!("Category with ID {} not found", id))));
    }
    tracing::info!("Category deleted: {}", id);

    Ok(Json(DeleteResponse { success: true }))
}

#[axum::debug_handler]
pub async fn create_menu_item(
    State(state): State<Arc<ApiState>>,
    _admin: AdminSession,
    Json(payload): Json<CreateMenuItemRequest>,
) -> Result<Json<MenuItemResponse>, AppError> {
    let name = required_name("Item name", &payload.name)?;
    validate_price(payload.price)?;

    menu::get_category_by_id(&state.db_pool, payload.category_id)
        .await
        .map_err(ShopError::Database)?
        .ok_or_else(|| {
            ShopError::NotFound(format!("Category with ID {} not found", payload.category_id))
        })?;

    let item = menu::create_menu_item(
        &state.db_pool,
        payload.category_id,
        &name,
        payload.description.as_deref(),
        payload.price,
        payload.image.as_deref(),
        payload.sort_order,
    )
    .await
    .map_err(ShopError::Database)?;
    tracing::info!("Menu item created: {} ({})", item.name, item.id);

    Ok(Json(MenuItemResponse { item: item.into() }))
}

#[axum::debug_handler]
pub async fn update_menu_item(
    State(state): State<Arc<ApiState>>,
    _admin: AdminSession,
    Path(id): Path<Uuid>,
    Json(mut payload): Json<UpdateMenuItemRequest>,
) -> Result<Json<MenuItemResponse>, AppError> {
    if let Some(name) = &payload.name {
        payload.name = Some(required_name("Item name", name)?);
    }
    if let Some(price) = payload.price {
        validate_price(price)?;
    }
    if let Some(category_id) = payload.category_id {
        menu::get_category_by_id(&state.db_pool, category_id)
            .await
            .map_err(ShopError::Database)?
            .ok_or_else(|| {
                ShopError::NotFound(format!("Category with ID {} not found", category_id))
            })?;
    }

    let item = menu::update_menu_item(&state.db_pool, id, &payload)
        .await
        .map_err(ShopError::Database)?
        .ok_or_else(|| ShopError::NotFound(format!("Menu item with ID {} not found", id)))?;

    Ok(Json(MenuItemResponse { item: item.into() }))
}

#[axum::debug_handler]
pub async fn delete_menu_item(
    State(state): State<Arc<ApiState>>,
    _admin: AdminSession,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, AppError> {
    let deleted = menu::delete_menu_item(&state.db_pool, id)
        .await
        .map_err(|e| delete_conflict(e, "Menu item"))?;
    if !deleted {
        return Err(AppError(ShopError::NotFound(format!("Menu item with ID {} not found", id))));
    }
    tracing::info!("Menu item deleted: {}", id);

    Ok(Json(DeleteResponse { success: true }))
}
