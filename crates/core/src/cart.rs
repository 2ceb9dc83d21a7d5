//! # Session Cart
//!
//! The customer's cart is a plain value owned by the client session and sent
//! with each request that needs it. Nothing here is shared or global; every
//! operation takes the cart explicitly.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{ShopError, ShopResult};
use crate::models::order::{CreateOrderRequest, OrderLineRequest};
use crate::pricing::PricedLine;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub menu_item_id: Uuid,
    pub name: String,
    /// Unit price in whole rupees, as last seen by the client.
    pub price: i64,
    pub image: Option<String>,
    pub quantity: i32,
    /// One name per cup, written on the cup at the counter.
    pub cup_names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Cart {
    pub items: Vec<CartItem>,
    pub customer_name: String,
    pub customer_mobile: String,
    pub pickup_location_id: Option<Uuid>,
    pub pickup_time: String,
}

/// Product details needed to put something in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItem {
    pub menu_item_id: Uuid,
    pub name: String,
    pub price: i64,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartQuoteResponse {
    pub cart: Cart,
    pub total: i64,
    pub total_items: i32,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one cup of `item`, appending an empty cup name.
    pub fn add_item(&mut self, item: NewCartItem) {
        if let Some(existing) = self.find_mut(item.menu_item_id) {
            existing.quantity += 1;
            existing.cup_names.push(String::new());
            return;
        }
        self.items.push(CartItem {
            menu_item_id: item.menu_item_id,
            name: item.name,
            price: item.price,
            image: item.image,
            quantity: 1,
            cup_names: vec![String::new()],
        });
    }

    pub fn remove_item(&mut self, menu_item_id: Uuid) {
        self.items.retain(|item| item.menu_item_id != menu_item_id);
    }

    /// Sets the quantity of an item; anything below one removes it.
    pub fn update_quantity(&mut self, menu_item_id: Uuid, quantity: i32) {
        if quantity < 1 {
            self.remove_item(menu_item_id);
            return;
        }
        if let Some(item) = self.find_mut(menu_item_id) {
            item.quantity = quantity;
            item.cup_names.resize(quantity as usize, String::new());
        }
    }

    pub fn update_cup_name(&mut self, menu_item_id: Uuid, index: usize, name: &str) {
        if let Some(slot) = self
            .find_mut(menu_item_id)
            .and_then(|item| item.cup_names.get_mut(index))
        {
            *slot = name.to_string();
        }
    }

    pub fn set_all_cup_names(&mut self, menu_item_id: Uuid, name: &str) {
        if let Some(item) = self.find_mut(menu_item_id) {
            item.cup_names.iter_mut().for_each(|cup| *cup = name.to_string());
        }
    }

    pub fn set_customer_info(&mut self, name: &str, mobile: &str) {
        self.customer_name = name.to_string();
        self.customer_mobile = mobile.to_string();
    }

    pub fn set_pickup_location(&mut self, location_id: Uuid) {
        self.pickup_location_id = Some(location_id);
    }

    pub fn set_pickup_time(&mut self, time: &str) {
        self.pickup_time = time.to_string();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn total(&self) -> i64 {
        self.items
            .iter()
            .map(|item| item.price * item.quantity as i64)
            .sum()
    }

    pub fn total_items(&self) -> i32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Replaces client-side names and prices with the server's view.
    pub fn reprice(&mut self, priced: &[PricedLine]) {
        for line in priced {
            if let Some(item) = self.find_mut(line.menu_item_id) {
                item.name = line.name.clone();
                item.price = line.unit_price;
                item.cup_names = line.cup_names.clone();
            }
        }
    }

    pub fn order_lines(&self) -> Vec<OrderLineRequest> {
        self.items
            .iter()
            .map(|item| OrderLineRequest {
                menu_item_id: item.menu_item_id,
                quantity: item.quantity,
                cup_names: item.cup_names.clone(),
            })
            .collect()
    }

    /// Builds the checkout request, failing if anything required is missing.
    pub fn to_order_request(&self) -> ShopResult<CreateOrderRequest> {
        let missing = |field: &str| ShopError::Validation(format!("Cart is missing {}", field));

        if self.items.is_empty() {
            return Err(missing("items"));
        }
        if self.customer_name.trim().is_empty() {
            return Err(missing("customer name"));
        }
        if self.customer_mobile.trim().is_empty() {
            return Err(missing("customer mobile"));
        }
        let pickup_location_id = self.pickup_location_id.ok_or_else(|| missing("pickup location"))?;
        if self.pickup_time.is_empty() {
            return Err(missing("pickup time"));
        }

        Ok(CreateOrderRequest {
            customer_name: self.customer_name.trim().to_string(),
            customer_mobile: self.customer_mobile.trim().to_string(),
            pickup_location_id,
            pickup_time: self.pickup_time.clone(),
            items: self.order_lines(),
        })
    }

    fn find_mut(&mut self, menu_item_id: Uuid) -> Option<&mut CartItem> {
        self.items
            .iter_mut()
            .find(|item| item.menu_item_id == menu_item_id)
    }
}
