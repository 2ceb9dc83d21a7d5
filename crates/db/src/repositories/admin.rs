use crate::models::DbAdmin;
use argon2::{Argon2, PasswordVerifier};
use chrono::Utc;
use eyre::{eyre, Result};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn get_admin_by_username(
    pool: &Pool<Postgres>,
    username: &str,
) -> Result<Option<DbAdmin>> {
    let admin = sqlx::query_as::<_, DbAdmin>(
        r#"
        SELECT id, username, password_hash, created_at
        FROM admins
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(admin)
}

/// Inserts an admin, leaving an existing one with the same username untouched.
pub async fn create_admin(
    pool: &Pool<Postgres>,
    username: &str,
    password_hash: &str,
) -> Result<DbAdmin> {
    tracing::debug!("Creating admin: username={}", username);

    sqlx::query(
        r#"
        INSERT INTO admins (id, username, password_hash, created_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (username) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(password_hash)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    get_admin_by_username(pool, username)
        .await?
        .ok_or_else(|| eyre!("Admin {} missing after insert", username))
}

/// Checks a password against an admin's stored Argon2 hash.
pub fn verify_password(admin: &DbAdmin, password: &str) -> Result<bool> {
    let parsed_hash = argon2::PasswordHash::new(&admin.password_hash)
        .map_err(|e| eyre!("Invalid password hash: {}", e))?;
    let is_valid = Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok();
    Ok(is_valid)
}
