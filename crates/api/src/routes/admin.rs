use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

/// Staff-only endpoints. Every handler here requires an admin session.
pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        // Menu management
        .route("/api/admin/menu", get(handlers::menu::get_admin_menu))
        .route(
            "/api/admin/menu/categories",
            post(handlers::menu::create_category),
        )
        .route(
            "/api/admin/menu/categories/:id",
            patch(handlers::menu::update_category).delete(handlers::menu::delete_category),
        )
        .route("/api/admin/menu/items", post(handlers::menu::create_menu_item))
        .route(
            "/api/admin/menu/items/:id",
            patch(handlers::menu::update_menu_item).delete(handlers::menu::delete_menu_item),
        )
        // Pickup locations
        .route(
            "/api/admin/locations",
            get(handlers::locations::get_admin_locations).post(handlers::locations::create_location),
        )
        .route(
            "/api/admin/locations/:id",
            patch(handlers::locations::update_location).delete(handlers::locations::delete_location),
        )
        // Pickup slots
        .route(
            "/api/admin/timeslots",
            get(handlers::timeslots::get_config).patch(handlers::timeslots::update_config),
        )
        // Orders
        .route("/api/admin/orders", get(handlers::admin_orders::list_orders))
        .route(
            "/api/admin/orders/:id",
            patch(handlers::admin_orders::update_order_status),
        )
        .route(
            "/api/admin/orders/:id/advance",
            post(handlers::admin_orders::advance_order),
        )
}
