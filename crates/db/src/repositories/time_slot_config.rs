use crate::models::DbTimeSlotConfig;
use brewline_core::models::time_slot::{
    DEFAULT_END_TIME, DEFAULT_MAX_ORDERS_PER_SLOT, DEFAULT_SLOT_DURATION, DEFAULT_START_TIME,
};
use chrono::Utc;
use eyre::Result;
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

async fn insert_default_if_missing(conn: &mut PgConnection) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO time_slot_config (id, singleton, start_time, end_time, slot_duration, max_orders_per_slot, updated_at)
        VALUES ($1, TRUE, $2, $3, $4, $5, $6)
        ON CONFLICT (singleton) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(DEFAULT_START_TIME)
    .bind(DEFAULT_END_TIME)
    .bind(DEFAULT_SLOT_DURATION)
    .bind(DEFAULT_MAX_ORDERS_PER_SLOT)
    .bind(Utc::now())
    .execute(conn)
    .await?;

    Ok(())
}

/// Returns the shop's slot configuration, creating the default on first use.
pub async fn get_or_create_config(pool: &Pool<Postgres>) -> Result<DbTimeSlotConfig> {
    let mut conn = pool.acquire().await?;
    insert_default_if_missing(&mut conn).await?;

    let config = sqlx::query_as::<_, DbTimeSlotConfig>(
        r#"
        SELECT id, start_time, end_time, slot_duration, max_orders_per_slot, updated_at
        FROM time_slot_config
        WHERE singleton
        "#,
    )
    .fetch_one(&mut *conn)
    .await?;

    Ok(config)
}

/// Reads the configuration and row-locks it until the surrounding
/// transaction ends. Order creation holds this lock while it counts and
/// inserts, so capacity checks for the same shop run one at a time.
pub async fn lock_config(conn: &mut PgConnection) -> Result<DbTimeSlotConfig> {
    insert_default_if_missing(conn).await?;

    let config = sqlx::query_as::<_, DbTimeSlotConfig>(
        r#"
        SELECT id, start_time, end_time, slot_duration, max_orders_per_slot, updated_at
        FROM time_slot_config
        WHERE singleton
        FOR UPDATE
        "#,
    )
    .fetch_one(conn)
    .await?;

    Ok(config)
}

pub async fn upsert_config(
    pool: &Pool<Postgres>,
    start_time: &str,
    end_time: &str,
    slot_duration: i32,
    max_orders_per_slot: i32,
) -> Result<DbTimeSlotConfig> {
    tracing::debug!(
        "Saving slot config: {}-{} every {} min, {} per slot",
        start_time, end_time, slot_duration, max_orders_per_slot
    );

    let config = sqlx::query_as::<_, DbTimeSlotConfig>(
        r#"
        INSERT INTO time_slot_config (id, singleton, start_time, end_time, slot_duration, max_orders_per_slot, updated_at)
        VALUES ($1, TRUE, $2, $3, $4, $5, $6)
        ON CONFLICT (singleton) DO UPDATE
        SET start_time = EXCLUDED.start_time,
            end_time = EXCLUDED.end_time,
            slot_duration = EXCLUDED.slot_duration,
            max_orders_per_slot = EXCLUDED.max_orders_per_slot,
            updated_at = EXCLUDED.updated_at
        RETURNING id, start_time, end_time, slot_duration, max_orders_per_slot, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(start_time)
    .bind(end_time)
    .bind(slot_duration)
    .bind(max_orders_per_slot)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(config)
}
