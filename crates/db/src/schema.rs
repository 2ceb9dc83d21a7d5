use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create admins table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS admins (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            username VARCHAR(255) NOT NULL UNIQUE,
            password_hash VARCHAR(255) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create customers table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS customers (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL DEFAULT '',
            mobile VARCHAR(20) NOT NULL UNIQUE,
            otp_code VARCHAR(10) NULL,
            otp_expiry TIMESTAMP WITH TIME ZONE NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create categories table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            sort_order INTEGER NOT NULL DEFAULT 0,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create menu_items table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS menu_items (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            category_id UUID NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
            name VARCHAR(255) NOT NULL,
            description TEXT NULL,
            price BIGINT NOT NULL,
            image TEXT NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            sort_order INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT positive_price CHECK (price > 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create pickup_locations table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pickup_locations (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            address TEXT NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            sort_order INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create time_slot_config table; the singleton column keeps it to one row
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS time_slot_config (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            singleton BOOLEAN NOT NULL DEFAULT TRUE UNIQUE,
            start_time VARCHAR(5) NOT NULL,
            end_time VARCHAR(5) NOT NULL,
            slot_duration INTEGER NOT NULL,
            max_orders_per_slot INTEGER NOT NULL,
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT single_row CHECK (singleton)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create orders table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS orders (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            order_number VARCHAR(64) NOT NULL UNIQUE,
            customer_name VARCHAR(255) NOT NULL,
            customer_mobile VARCHAR(20) NOT NULL,
            pickup_location_id UUID NOT NULL REFERENCES pickup_locations(id),
            pickup_time TIMESTAMP WITH TIME ZONE NOT NULL,
            total_amount BIGINT NOT NULL,
            status VARCHAR(20) NOT NULL DEFAULT 'PENDING',
            payment_status VARCHAR(20) NOT NULL DEFAULT 'PENDING',
            gateway_order_id VARCHAR(255) NULL UNIQUE,
            gateway_payment_id VARCHAR(255) NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create order_items table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS order_items (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            order_id UUID NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
            menu_item_id UUID NOT NULL REFERENCES menu_items(id),
            quantity INTEGER NOT NULL,
            unit_price BIGINT NOT NULL,
            cup_names TEXT[] NOT NULL DEFAULT '{}',
            CONSTRAINT positive_quantity CHECK (quantity > 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes; a prepared statement takes a single command
    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_menu_items_category_id ON menu_items(category_id)",
        "CREATE INDEX IF NOT EXISTS idx_orders_pickup_time ON orders(pickup_time)",
        "CREATE INDEX IF NOT EXISTS idx_orders_status ON orders(status)",
        "CREATE INDEX IF NOT EXISTS idx_order_items_order_id ON order_items(order_id)",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::create_test_pool;

    #[tokio::test]
    #[ignore = "requires a PostgreSQL test database"]
    async fn schema_initialization_can_run_repeatedly() {
        // create_test_pool has already run it once
        let pool = create_test_pool().await;

        initialize_database(&pool).await.unwrap();

        let indexes = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM pg_indexes WHERE indexname LIKE 'idx_%' AND schemaname = current_schema()",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert!(indexes >= 4);
    }
}
