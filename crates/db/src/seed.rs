//! Demo data for a fresh database: the default admin, a starter menu, one
//! pickup counter and the default slot configuration. Safe to run repeatedly.

use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

use crate::repositories::{admin, location, menu, time_slot_config};

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

struct SeedItem {
    name: &'static str,
    description: &'static str,
    price: i64,
}

const fn item(name: &'static str, description: &'static str, price: i64) -> SeedItem {
    SeedItem { name, description, price }
}

const MENU: [(&str, &[SeedItem]); 3] = [
    (
        "Hot Coffee",
        &[
            item("Espresso", "Strong and bold single shot", 99),
            item("Americano", "Espresso with hot water", 129),
            item("Cappuccino", "Espresso with steamed milk foam", 149),
            item("Latte", "Espresso with steamed milk", 159),
            item("Mocha", "Espresso with chocolate and milk", 179),
            item("Macchiato", "Espresso with a dash of milk", 139),
        ],
    ),
    (
        "Cold Coffee",
        &[
            item("Iced Americano", "Chilled espresso with cold water", 149),
            item("Iced Latte", "Espresso with cold milk over ice", 169),
            item("Cold Brew", "Slow-steeped for 20 hours", 179),
            item("Frappuccino", "Blended iced coffee drink", 199),
            item("Iced Mocha", "Chocolate espresso over ice", 189),
        ],
    ),
    (
        "Specials",
        &[
            item("Hazelnut Latte", "Latte with roasted hazelnut syrup", 189),
            item("Caramel Macchiato", "Vanilla, milk and caramel drizzle", 199),
        ],
    ),
];

/// Seeds the database. `admin_password_hash` is the Argon2 hash of
/// [`DEFAULT_ADMIN_PASSWORD`].
pub async fn seed_database(pool: &Pool<Postgres>, admin_password_hash: &str) -> Result<()> {
    admin::create_admin(pool, DEFAULT_ADMIN_USERNAME, admin_password_hash).await?;
    info!("Admin user ready");

    let existing = menu::get_categories(pool, false).await?;
    for (sort_order, (category_name, items)) in MENU.iter().enumerate() {
        if existing.iter().any(|c| c.name == *category_name) {
            continue;
        }
        let category = menu::create_category(pool, category_name, sort_order as i32 + 1).await?;
        for (item_order, seed) in items.iter().enumerate() {
            menu::create_menu_item(
                pool,
                category.id,
                seed.name,
                Some(seed.description),
                seed.price,
                None,
                item_order as i32 + 1,
            )
            .await?;
        }
        info!("Seeded category {} with {} items", category_name, items.len());
    }

    if location::get_locations(pool, false).await?.is_empty() {
        location::create_location(pool, "Main Counter", "Ground floor, near the entrance", 1).await?;
        info!("Seeded default pickup location");
    }

    time_slot_config::get_or_create_config(pool).await?;
    info!("Seeding complete");
    Ok(())
}
