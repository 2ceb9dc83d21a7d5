use crate::models::{DbCategory, DbMenuItem};
use brewline_core::models::menu::{UpdateCategoryRequest, UpdateMenuItemRequest};
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn get_categories(pool: &Pool<Postgres>, active_only: bool) -> Result<Vec<DbCategory>> {
    let categories = sqlx::query_as::<_, DbCategory>(
        r#"
        SELECT id, name, sort_order, is_active, created_at
        FROM categories
        WHERE is_active OR NOT $1
        ORDER BY sort_order ASC, name ASC
        "#,
    )
    .bind(active_only)
    .fetch_all(pool)
    .await?;

    Ok(categories)
}

pub async fn get_menu_items(pool: &Pool<Postgres>, active_only: bool) -> Result<Vec<DbMenuItem>> {
    let items = sqlx::query_as::<_, DbMenuItem>(
        r#"
        SELECT id, category_id, name, description, price, image, is_active, sort_order, created_at
        FROM menu_items
        WHERE is_active OR NOT $1
        ORDER BY sort_order ASC, name ASC
        "#,
    )
    .bind(active_only)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

/// Loads the given items regardless of their active flag.
pub async fn get_menu_items_by_ids(pool: &Pool<Postgres>, ids: &[Uuid]) -> Result<Vec<DbMenuItem>> {
    let items = sqlx::query_as::<_, DbMenuItem>(
        r#"
        SELECT id, category_id, name, description, price, image, is_active, sort_order, created_at
        FROM menu_items
        WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

pub async fn get_category_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbCategory>> {
    let category = sqlx::query_as::<_, DbCategory>(
        r#"
        SELECT id, name, sort_order, is_active, created_at
        FROM categories
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(category)
}

pub async fn create_category(pool: &Pool<Postgres>, name: &str, sort_order: i32) -> Result<DbCategory> {
    let category = sqlx::query_as::<_, DbCategory>(
        r#"
        INSERT INTO categories (id, name, sort_order, is_active, created_at)
        VALUES ($1, $2, $3, TRUE, $4)
        RETURNING id, name, sort_order, is_active, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(sort_order)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(category)
}

pub async fn update_category(
    pool: &Pool<Postgres>,
    id: Uuid,
    changes: &UpdateCategoryRequest,
) -> Result<Option<DbCategory>> {
    let category = sqlx::query_as::<_, DbCategory>(
        r#"
        UPDATE categories
        SET name = COALESCE($2, name),
            sort_order = COALESCE($3, sort_order),
            is_active = COALESCE($4, is_active)
        WHERE id = $1
        RETURNING id, name, sort_order, is_active, created_at
        "#,
    )
    .bind(id)
    .bind(changes.name.as_deref())
    .bind(changes.sort_order)
    .bind(changes.is_active)
    .fetch_optional(pool)
    .await?;

    Ok(category)
}

/// Deletes a category together with its items.
pub async fn delete_category(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn create_menu_item(
    pool: &Pool<Postgres>,
    category_id: Uuid,
    name: &str,
    description: Option<&str>,
    price: i64,
    image: Option<&str>,
    sort_order: i32,
) -> Result<DbMenuItem> {
    let item = sqlx::query_as::<_, DbMenuItem>(
        r#"
        INSERT INTO menu_items (id, category_id, name, description, price, image, is_active, sort_order, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, TRUE, $7, $8)
        RETURNING id, category_id, name, description, price, image, is_active, sort_order, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(category_id)
    .bind(name)
    .bind(description)
    .bind(price)
    .bind(image)
    .bind(sort_order)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(item)
}

pub async fn update_menu_item(
    pool: &Pool<Postgres>,
    id: Uuid,
    changes: &UpdateMenuItemRequest,
) -> Result<Option<DbMenuItem>> {
    let item = sqlx::query_as::<_, DbMenuItem>(
        r#"
        UPDATE menu_items
        SET category_id = COALESCE($2, category_id),
            name = COALESCE($3, name),
            description = COALESCE($4, description),
            price = COALESCE($5, price),
            image = COALESCE($6, image),
            is_active = COALESCE($7, is_active),
            sort_order = COALESCE($8, sort_order)
        WHERE id = $1
        RETURNING id, category_id, name, description, price, image, is_active, sort_order, created_at
        "#,
    )
    .bind(id)
    .bind(changes.category_id)
    .bind(changes.name.as_deref())
    .bind(changes.description.as_deref())
    .bind(changes.price)
    .bind(changes.image.as_deref())
    .bind(changes.is_active)
    .bind(changes.sort_order)
    .fetch_optional(pool)
    .await?;

    Ok(item)
}

pub async fn delete_menu_item(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM menu_items WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
