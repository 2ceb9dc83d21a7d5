use chrono::{DateTime, Utc};
use mockall::mock;
use uuid::Uuid;

use crate::models::{
    DbAdmin, DbCategory, DbCustomer, DbMenuItem, DbOrder, DbPickupLocation, DbTimeSlotConfig,
};
use brewline_core::models::order::OrderStatus;

// Mock repositories for testing
mock! {
    pub MenuRepo {
        pub async fn get_categories(&self, active_only: bool) -> eyre::Result<Vec<DbCategory>>;

        pub async fn get_menu_items(&self, active_only: bool) -> eyre::Result<Vec<DbMenuItem>>;

        pub async fn get_menu_items_by_ids(
            &self,
            ids: Vec<Uuid>,
        ) -> eyre::Result<Vec<DbMenuItem>>;
    }
}

mock! {
    pub LocationRepo {
        pub async fn get_location_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbPickupLocation>>;
    }
}

mock! {
    pub TimeSlotConfigRepo {
        pub async fn get_or_create_config(&self) -> eyre::Result<DbTimeSlotConfig>;
    }
}

mock! {
    pub OrderRepo {
        pub async fn get_paid_pickup_times(
            &self,
            from: DateTime<Utc>,
            until: DateTime<Utc>,
        ) -> eyre::Result<Vec<DateTime<Utc>>>;

        pub async fn count_slot_holders(
            &self,
            pickup_time: DateTime<Utc>,
        ) -> eyre::Result<i64>;

        pub async fn get_order_by_id(&self, id: Uuid) -> eyre::Result<Option<DbOrder>>;

        pub async fn transition_order_status(
            &self,
            id: Uuid,
            from: OrderStatus,
            to: OrderStatus,
        ) -> eyre::Result<Option<DbOrder>>;
    }
}

mock! {
    pub AdminRepo {
        pub async fn get_admin_by_username(
            &self,
            username: &'static str,
        ) -> eyre::Result<Option<DbAdmin>>;
    }
}

mock! {
    pub CustomerRepo {
        pub async fn get_customer_by_mobile(
            &self,
            mobile: &'static str,
        ) -> eyre::Result<Option<DbCustomer>>;
    }
}
