use std::collections::HashMap;

use crate::models::{DbOrder, DbOrderItem, DbPickupLocation};
use brewline_core::models::order::{OrderDetail, OrderStatus, PaymentStatus, PAYMENT_HOLD_MINUTES};
use brewline_core::pricing::PricedLine;
use chrono::{DateTime, Duration, Utc};
use eyre::{eyre, Result};
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

const ORDER_COLUMNS: &str = "id, order_number, customer_name, customer_mobile, pickup_location_id, \
     pickup_time, total_amount, status, payment_status, gateway_order_id, gateway_payment_id, \
     created_at, updated_at";

/// Values needed to insert a new, unpaid order.
#[derive(Debug, Clone)]
pub struct NewOrder<'a> {
    pub order_number: &'a str,
    pub customer_name: &'a str,
    pub customer_mobile: &'a str,
    pub pickup_location_id: Uuid,
    pub pickup_time: DateTime<Utc>,
    pub total_amount: i64,
    pub lines: &'a [PricedLine],
}

/// Filters for the staff order list. `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub pickup_from: Option<DateTime<Utc>>,
    pub pickup_until: Option<DateTime<Utc>>,
}

/// Counts orders that hold a seat in the slot starting at `pickup_time`:
/// paid orders, plus unpaid ones created within the last
/// [`PAYMENT_HOLD_MINUTES`]. Cancelled orders never count.
pub async fn count_slot_holders(conn: &mut PgConnection, pickup_time: DateTime<Utc>) -> Result<i64> {
    let hold_cutoff = Utc::now() - Duration::minutes(PAYMENT_HOLD_MINUTES);
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM orders
        WHERE pickup_time = $1
          AND status <> 'CANCELLED'
          AND (payment_status = 'PAID'
               OR (payment_status = 'PENDING' AND created_at > $2))
        "#,
    )
    .bind(pickup_time)
    .bind(hold_cutoff)
    .fetch_one(conn)
    .await?;

    Ok(count)
}

/// Pickup times of paid, non-cancelled orders in `[from, until)`.
pub async fn get_paid_pickup_times(
    pool: &Pool<Postgres>,
    from: DateTime<Utc>,
    until: DateTime<Utc>,
) -> Result<Vec<DateTime<Utc>>> {
    let times = sqlx::query_scalar::<_, DateTime<Utc>>(
        r#"
        SELECT pickup_time
        FROM orders
        WHERE pickup_time >= $1
          AND pickup_time < $2
          AND payment_status = 'PAID'
          AND status <> 'CANCELLED'
        "#,
    )
    .bind(from)
    .bind(until)
    .fetch_all(pool)
    .await?;

    Ok(times)
}

/// Inserts an order and its lines on the given connection, which is expected
/// to be inside a transaction.
pub async fn insert_order(conn: &mut PgConnection, new_order: &NewOrder<'_>) -> Result<DbOrder> {
    let now = Utc::now();
    let order = sqlx::query_as::<_, DbOrder>(&format!(
        r#"
        INSERT INTO orders (id, order_number, customer_name, customer_mobile, pickup_location_id,
                            pickup_time, total_amount, status, payment_status, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
        RETURNING {ORDER_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(new_order.order_number)
    .bind(new_order.customer_name)
    .bind(new_order.customer_mobile)
    .bind(new_order.pickup_location_id)
    .bind(new_order.pickup_time)
    .bind(new_order.total_amount)
    .bind(OrderStatus::Pending.as_str())
    .bind(PaymentStatus::Pending.as_str())
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    for line in new_order.lines {
        sqlx::query(
            r#"
            INSERT INTO order_items (id, order_id, menu_item_id, quantity, unit_price, cup_names)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(order.id)
        .bind(line.menu_item_id)
        .bind(line.quantity)
        .bind(line.unit_price)
        .bind(&line.cup_names)
        .execute(&mut *conn)
        .await?;
    }

    tracing::debug!("Order inserted: id={}, number={}", order.id, order.order_number);
    Ok(order)
}

pub async fn set_gateway_order_id(
    pool: &Pool<Postgres>,
    id: Uuid,
    gateway_order_id: &str,
) -> Result<DbOrder> {
    let order = sqlx::query_as::<_, DbOrder>(&format!(
        r#"
        UPDATE orders
        SET gateway_order_id = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING {ORDER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(gateway_order_id)
    .fetch_one(pool)
    .await?;

    Ok(order)
}

/// Releases the seat of an order whose payment could not be started.
pub async fn mark_payment_failed(pool: &Pool<Postgres>, id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE orders
        SET payment_status = $2, status = $3, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(PaymentStatus::Failed.as_str())
    .bind(OrderStatus::Cancelled.as_str())
    .execute(pool)
    .await?;

    Ok(())
}

/// Records a verified payment. Pending orders become confirmed; orders the
/// kitchen has already moved on keep their status.
pub async fn mark_order_paid(
    pool: &Pool<Postgres>,
    gateway_order_id: &str,
    gateway_payment_id: &str,
) -> Result<Option<DbOrder>> {
    let order = sqlx::query_as::<_, DbOrder>(&format!(
        r#"
        UPDATE orders
        SET payment_status = 'PAID',
            gateway_payment_id = $2,
            status = CASE WHEN status = 'PENDING' THEN 'CONFIRMED' ELSE status END,
            updated_at = NOW()
        WHERE gateway_order_id = $1
        RETURNING {ORDER_COLUMNS}
        "#
    ))
    .bind(gateway_order_id)
    .bind(gateway_payment_id)
    .fetch_optional(pool)
    .await?;

    Ok(order)
}

pub async fn get_order_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbOrder>> {
    let order = sqlx::query_as::<_, DbOrder>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(order)
}

pub async fn get_order_by_number(pool: &Pool<Postgres>, order_number: &str) -> Result<Option<DbOrder>> {
    let order = sqlx::query_as::<_, DbOrder>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE order_number = $1"
    ))
    .bind(order_number)
    .fetch_optional(pool)
    .await?;

    Ok(order)
}

/// Orders matching `filter`, earliest pickup first.
pub async fn list_orders(pool: &Pool<Postgres>, filter: &OrderFilter) -> Result<Vec<DbOrder>> {
    let orders = sqlx::query_as::<_, DbOrder>(&format!(
        r#"
        SELECT {ORDER_COLUMNS}
        FROM orders
        WHERE ($1::TEXT IS NULL OR status = $1)
          AND ($4::TEXT IS NULL OR payment_status = $4)
          AND ($2::TIMESTAMPTZ IS NULL OR pickup_time >= $2)
          AND ($3::TIMESTAMPTZ IS NULL OR pickup_time < $3)
        ORDER BY pickup_time ASC, created_at ASC
        "#
    ))
    .bind(filter.status.map(|status| status.as_str()))
    .bind(filter.pickup_from)
    .bind(filter.pickup_until)
    .bind(filter.payment_status.map(|status| status.as_str()))
    .fetch_all(pool)
    .await?;

    Ok(orders)
}

/// Orders the counter still has to prepare or hand over in `[from, until)`.
pub async fn list_active_orders(
    pool: &Pool<Postgres>,
    from: DateTime<Utc>,
    until: DateTime<Utc>,
) -> Result<Vec<DbOrder>> {
    let orders = sqlx::query_as::<_, DbOrder>(&format!(
        r#"
        SELECT {ORDER_COLUMNS}
        FROM orders
        WHERE payment_status = 'PAID'
          AND status IN ('CONFIRMED', 'PREPARING', 'READY')
          AND pickup_time >= $1
          AND pickup_time < $2
        ORDER BY pickup_time ASC, created_at ASC
        "#
    ))
    .bind(from)
    .bind(until)
    .fetch_all(pool)
    .await?;

    Ok(orders)
}

pub async fn update_order_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    status: OrderStatus,
) -> Result<Option<DbOrder>> {
    let order = sqlx::query_as::<_, DbOrder>(&format!(
        r#"
        UPDATE orders
        SET status = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING {ORDER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(status.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(order)
}

/// Moves an order from `from` to `to` only if it is still in `from`.
/// Returns `None` when another update got there first.
pub async fn transition_order_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    from: OrderStatus,
    to: OrderStatus,
) -> Result<Option<DbOrder>> {
    let order = sqlx::query_as::<_, DbOrder>(&format!(
        r#"
        UPDATE orders
        SET status = $3, updated_at = NOW()
        WHERE id = $1 AND status = $2
        RETURNING {ORDER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(from.as_str())
    .bind(to.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(order)
}

async fn get_items_for_orders(pool: &Pool<Postgres>, order_ids: &[Uuid]) -> Result<Vec<DbOrderItem>> {
    let items = sqlx::query_as::<_, DbOrderItem>(
        r#"
        SELECT oi.id, oi.order_id, oi.menu_item_id, mi.name AS menu_item_name,
               oi.quantity, oi.unit_price, oi.cup_names
        FROM order_items oi
        JOIN menu_items mi ON mi.id = oi.menu_item_id
        WHERE oi.order_id = ANY($1)
        ORDER BY mi.name ASC
        "#,
    )
    .bind(order_ids)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

async fn get_locations_by_ids(pool: &Pool<Postgres>, ids: &[Uuid]) -> Result<Vec<DbPickupLocation>> {
    let locations = sqlx::query_as::<_, DbPickupLocation>(
        r#"
        SELECT id, name, address, is_active, sort_order, created_at
        FROM pickup_locations
        WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(locations)
}

/// Attaches line items and pickup locations to order rows, keeping order.
pub async fn load_details(pool: &Pool<Postgres>, orders: Vec<DbOrder>) -> Result<Vec<OrderDetail>> {
    if orders.is_empty() {
        return Ok(Vec::new());
    }

    let order_ids: Vec<Uuid> = orders.iter().map(|order| order.id).collect();
    let mut location_ids: Vec<Uuid> = orders.iter().map(|order| order.pickup_location_id).collect();
    location_ids.sort();
    location_ids.dedup();

    let mut items_by_order: HashMap<Uuid, Vec<DbOrderItem>> = HashMap::new();
    for item in get_items_for_orders(pool, &order_ids).await? {
        items_by_order.entry(item.order_id).or_default().push(item);
    }
    let locations: HashMap<Uuid, DbPickupLocation> = get_locations_by_ids(pool, &location_ids)
        .await?
        .into_iter()
        .map(|location| (location.id, location))
        .collect();

    orders
        .into_iter()
        .map(|row| -> Result<OrderDetail> {
            let location = locations
                .get(&row.pickup_location_id)
                .cloned()
                .ok_or_else(|| eyre!("Pickup location {} missing", row.pickup_location_id))?;
            let items = items_by_order.remove(&row.id).unwrap_or_default();

            Ok(OrderDetail {
                order: row.into_order()?,
                items: items.into_iter().map(Into::into).collect(),
                pickup_location: location.into(),
            })
        })
        .collect()
}

pub async fn load_detail(pool: &Pool<Postgres>, order: DbOrder) -> Result<OrderDetail> {
    load_details(pool, vec![order])
        .await?
        .pop()
        .ok_or_else(|| eyre!("Order detail missing"))
}
