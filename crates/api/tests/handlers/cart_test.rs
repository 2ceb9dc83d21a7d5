use axum::http::StatusCode;
use brewline_api::handlers::cart::quote_cart;
use brewline_core::{
    cart::{Cart, NewCartItem},
    errors::ShopError,
    models::menu::MenuItem,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

use crate::test_utils::{build_app, json_request, menu_item_row, send, FakeGateway, TestContext};

fn stale_item(menu_item_id: Uuid, name: &str, price: i64) -> NewCartItem {
    NewCartItem {
        menu_item_id,
        name: name.to_string(),
        price,
        image: None,
    }
}

#[tokio::test]
async fn test_quote_uses_server_prices() {
    let mut ctx = TestContext::new();
    let latte = menu_item_row(Uuid::new_v4(), "Latte", 159, 1);
    let latte_id = latte.id;

    let mut cart = Cart::new();
    cart.add_item(stale_item(latte_id, "Old Latte", 1));
    cart.add_item(stale_item(latte_id, "Old Latte", 1));
    cart.update_cup_name(latte_id, 1, "Ravi");

    ctx.menu_repo
        .expect_get_menu_items_by_ids()
        .times(1)
        .returning(move |_| Ok(vec![latte.clone()]));
    let ids = cart.items.iter().map(|item| item.menu_item_id).collect();
    let menu: Vec<MenuItem> = ctx
        .menu_repo
        .get_menu_items_by_ids(ids)
        .await
        .unwrap()
        .into_iter()
        .map(Into::into)
        .collect();

    let quote = quote_cart(cart, &menu).unwrap();

    assert_eq!(quote.total, 318);
    assert_eq!(quote.total_items, 2);
    assert_eq!(quote.cart.items[0].name, "Latte");
    assert_eq!(quote.cart.items[0].cup_names, vec![String::new(), "Ravi".to_string()]);
}

#[test]
fn test_quote_rejects_unavailable_items() {
    let mut retired: MenuItem = menu_item_row(Uuid::new_v4(), "Irish Coffee", 249, 1).into();
    retired.is_active = false;

    let mut cart = Cart::new();
    cart.add_item(stale_item(retired.id, "Irish Coffee", 249));

    assert!(matches!(quote_cart(cart, &[retired]), Err(ShopError::Validation(_))));
}

#[tokio::test]
async fn test_empty_cart_quotes_zero_without_menu_lookup() {
    let app = build_app(FakeGateway::configured());

    let (status, body) = send(
        app,
        json_request("POST", "/api/cart/quote", json!({"customerName": "Asha"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
    assert_eq!(body["totalItems"], 0);
    assert_eq!(body["cart"]["customerName"], "Asha");
    assert_eq!(body["cart"]["items"], json!([]));
}
