use chrono::{DateTime, Utc};
use eyre::Result;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use brewline_core::models::{
    location::PickupLocation,
    menu::{Category, MenuItem},
    order::{Order, OrderItem},
    time_slot::TimeSlotConfig,
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAdmin {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCustomer {
    pub id: Uuid,
    pub name: String,
    pub mobile: String,
    pub otp_code: Option<String>,
    pub otp_expiry: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCategory {
    pub id: Uuid,
    pub name: String,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<DbCategory> for Category {
    fn from(row: DbCategory) -> Self {
        Category {
            id: row.id,
            name: row.name,
            sort_order: row.sort_order,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbMenuItem {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub image: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

impl From<DbMenuItem> for MenuItem {
    fn from(row: DbMenuItem) -> Self {
        MenuItem {
            id: row.id,
            category_id: row.category_id,
            name: row.name,
            description: row.description,
            price: row.price,
            image: row.image,
            is_active: row.is_active,
            sort_order: row.sort_order,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbPickupLocation {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

impl From<DbPickupLocation> for PickupLocation {
    fn from(row: DbPickupLocation) -> Self {
        PickupLocation {
            id: row.id,
            name: row.name,
            address: row.address,
            is_active: row.is_active,
            sort_order: row.sort_order,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTimeSlotConfig {
    pub id: Uuid,
    pub start_time: String,
    pub end_time: String,
    pub slot_duration: i32,
    pub max_orders_per_slot: i32,
    pub updated_at: DateTime<Utc>,
}

impl From<DbTimeSlotConfig> for TimeSlotConfig {
    fn from(row: DbTimeSlotConfig) -> Self {
        TimeSlotConfig {
            id: row.id,
            start_time: row.start_time,
            end_time: row.end_time,
            slot_duration: row.slot_duration,
            max_orders_per_slot: row.max_orders_per_slot,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbOrder {
    pub id: Uuid,
    pub order_number: String,
    pub customer_name: String,
    pub customer_mobile: String,
    pub pickup_location_id: Uuid,
    pub pickup_time: DateTime<Utc>,
    pub total_amount: i64,
    pub status: String,
    pub payment_status: String,
    pub gateway_order_id: Option<String>,
    pub gateway_payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbOrder {
    /// Converts the row, failing on status values written outside this crate.
    pub fn into_order(self) -> Result<Order> {
        Ok(Order {
            status: self
                .status
                .parse()
                .map_err(|e| eyre::eyre!("Order {} has {}", self.id, e))?,
            payment_status: self
                .payment_status
                .parse()
                .map_err(|e| eyre::eyre!("Order {} has {}", self.id, e))?,
            id: self.id,
            order_number: self.order_number,
            customer_name: self.customer_name,
            customer_mobile: self.customer_mobile,
            pickup_location_id: self.pickup_location_id,
            pickup_time: self.pickup_time,
            total_amount: self.total_amount,
            gateway_order_id: self.gateway_order_id,
            gateway_payment_id: self.gateway_payment_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// An order line joined with the menu item's current name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbOrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub menu_item_id: Uuid,
    pub menu_item_name: String,
    pub quantity: i32,
    pub unit_price: i64,
    pub cup_names: Vec<String>,
}

impl From<DbOrderItem> for OrderItem {
    fn from(row: DbOrderItem) -> Self {
        OrderItem {
            id: row.id,
            menu_item_id: row.menu_item_id,
            menu_item_name: row.menu_item_name,
            quantity: row.quantity,
            unit_price: row.unit_price,
            cup_names: row.cup_names,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brewline_core::models::order::{OrderStatus, PaymentStatus};
    use pretty_assertions::assert_eq;

    fn order_row(status: &str, payment_status: &str) -> DbOrder {
        let now = Utc::now();
        DbOrder {
            id: Uuid::new_v4(),
            order_number: "ORD-1-ABC".to_string(),
            customer_name: "Asha".to_string(),
            customer_mobile: "9876543210".to_string(),
            pickup_location_id: Uuid::new_v4(),
            pickup_time: now,
            total_amount: 159,
            status: status.to_string(),
            payment_status: payment_status.to_string(),
            gateway_order_id: None,
            gateway_payment_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn order_row_parses_statuses() {
        let order = order_row("READY", "PAID").into_order().unwrap();
        assert_eq!(order.status, OrderStatus::Ready);
        assert_eq!(order.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn order_row_with_unknown_status_fails() {
        assert!(order_row("LOST", "PAID").into_order().is_err());
        assert!(order_row("READY", "MAYBE").into_order().is_err());
    }
}
