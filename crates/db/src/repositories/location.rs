use crate::models::DbPickupLocation;
use brewline_core::models::location::UpdateLocationRequest;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn get_locations(pool: &Pool<Postgres>, active_only: bool) -> Result<Vec<DbPickupLocation>> {
    let locations = sqlx::query_as::<_, DbPickupLocation>(
        r#"
        SELECT id, name, address, is_active, sort_order, created_at
        FROM pickup_locations
        WHERE is_active OR NOT $1
        ORDER BY sort_order ASC, name ASC
        "#,
    )
    .bind(active_only)
    .fetch_all(pool)
    .await?;

    Ok(locations)
}

pub async fn get_location_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbPickupLocation>> {
    let location = sqlx::query_as::<_, DbPickupLocation>(
        r#"
        SELECT id, name, address, is_active, sort_order, created_at
        FROM pickup_locations
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(location)
}

pub async fn create_location(
    pool: &Pool<Postgres>,
    name: &str,
    address: &str,
    sort_order: i32,
) -> Result<DbPickupLocation> {
    let location = sqlx::query_as::<_, DbPickupLocation>(
        r#"
        INSERT INTO pickup_locations (id, name, address, is_active, sort_order, created_at)
        VALUES ($1, $2, $3, TRUE, $4, $5)
        RETURNING id, name, address, is_active, sort_order, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(address)
    .bind(sort_order)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(location)
}

/// Applies the fields present in `changes`; returns `None` for an unknown id.
pub async fn update_location(
    pool: &Pool<Postgres>,
    id: Uuid,
    changes: &UpdateLocationRequest,
) -> Result<Option<DbPickupLocation>> {
    let location = sqlx::query_as::<_, DbPickupLocation>(
        r#"
        UPDATE pickup_locations
        SET name = COALESCE($2, name),
            address = COALESCE($3, address),
            is_active = COALESCE($4, is_active),
            sort_order = COALESCE($5, sort_order)
        WHERE id = $1
        RETURNING id, name, address, is_active, sort_order, created_at
        "#,
    )
    .bind(id)
    .bind(changes.name.as_deref())
    .bind(changes.address.as_deref())
    .bind(changes.is_active)
    .bind(changes.sort_order)
    .fetch_optional(pool)
    .await?;

    Ok(location)
}

/// Returns whether a row was deleted.
pub async fn delete_location(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM pickup_locations WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
