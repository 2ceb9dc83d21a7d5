use crate::models::DbCustomer;
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn get_customer_by_mobile(
    pool: &Pool<Postgres>,
    mobile: &str,
) -> Result<Option<DbCustomer>> {
    let customer = sqlx::query_as::<_, DbCustomer>(
        r#"
        SELECT id, name, mobile, otp_code, otp_expiry, created_at
        FROM customers
        WHERE mobile = $1
        "#,
    )
    .bind(mobile)
    .fetch_optional(pool)
    .await?;

    Ok(customer)
}

/// Stores a fresh one-time password, creating the customer on first contact.
pub async fn store_otp(
    pool: &Pool<Postgres>,
    mobile: &str,
    otp_code: &str,
    otp_expiry: DateTime<Utc>,
) -> Result<DbCustomer> {
    let customer = sqlx::query_as::<_, DbCustomer>(
        r#"
        INSERT INTO customers (id, name, mobile, otp_code, otp_expiry, created_at)
        VALUES ($1, '', $2, $3, $4, $5)
        ON CONFLICT (mobile) DO UPDATE
        SET otp_code = EXCLUDED.otp_code, otp_expiry = EXCLUDED.otp_expiry
        RETURNING id, name, mobile, otp_code, otp_expiry, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(mobile)
    .bind(otp_code)
    .bind(otp_expiry)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(customer)
}

/// Clears the used one-time password and updates the display name if given.
pub async fn complete_login(
    pool: &Pool<Postgres>,
    id: Uuid,
    name: Option<&str>,
) -> Result<DbCustomer> {
    let customer = sqlx::query_as::<_, DbCustomer>(
        r#"
        UPDATE customers
        SET otp_code = NULL, otp_expiry = NULL, name = COALESCE($2, name)
        WHERE id = $1
        RETURNING id, name, mobile, otp_code, otp_expiry, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(customer)
}
