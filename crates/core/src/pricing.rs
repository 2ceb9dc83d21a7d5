//! Server-side pricing of order lines against the live menu.

use std::collections::HashMap;

use uuid::Uuid;

use crate::errors::{ShopError, ShopResult};
use crate::models::menu::MenuItem;
use crate::models::order::OrderLineRequest;

/// Upper bound on cups of a single item in one order.
pub const MAX_QUANTITY_PER_LINE: i32 = 50;

/// An order line with the price the shop charges for it.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub menu_item_id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub unit_price: i64,
    pub cup_names: Vec<String>,
}

impl PricedLine {
    pub fn subtotal(&self) -> i64 {
        self.unit_price * self.quantity as i64
    }
}

/// Prices `lines` using `menu`, which must hold every referenced item.
///
/// Inactive or unknown items, non-positive quantities and duplicate lines are
/// rejected. Cup names are padded or truncated to the line quantity.
pub fn price_lines(lines: &[OrderLineRequest], menu: &[MenuItem]) -> ShopResult<(Vec<PricedLine>, i64)> {
    if lines.is_empty() {
        return Err(ShopError::Validation("Order must contain at least one item".to_string()));
    }

    let by_id: HashMap<Uuid, &MenuItem> = menu.iter().map(|item| (item.id, item)).collect();
    let mut priced = Vec::with_capacity(lines.len());
    let mut total = 0;

    for line in lines {
        if !(1..=MAX_QUANTITY_PER_LINE).contains(&line.quantity) {
            return Err(ShopError::Validation(format!(
                "Quantity for item {} must be between 1 and {}",
                line.menu_item_id, MAX_QUANTITY_PER_LINE
            )));
        }
        if priced.iter().any(|p: &PricedLine| p.menu_item_id == line.menu_item_id) {
            return Err(ShopError::Validation(format!(
                "Item {} appears more than once",
                line.menu_item_id
            )));
        }

        let item = by_id
            .get(&line.menu_item_id)
            .filter(|item| item.is_active)
            .ok_or_else(|| {
                ShopError::Validation("One or more menu items are unavailable".to_string())
            })?;

        let mut cup_names = line.cup_names.clone();
        cup_names.resize(line.quantity as usize, String::new());

        let line = PricedLine {
            menu_item_id: item.id,
            name: item.name.clone(),
            quantity: line.quantity,
            unit_price: item.price,
            cup_names,
        };
        total += line.subtotal();
        priced.push(line);
    }

    Ok((priced, total))
}
