use axum::{body::Body, http::{Request, StatusCode}};
use brewline_api::handlers::menu::{group_menu, required_name, validate_price};
use brewline_core::errors::ShopError;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::test_utils::{admin_token, build_app, category_row, json_request, menu_item_row, send, FakeGateway, TestContext};

#[tokio::test]
async fn test_menu_groups_items_under_categories() {
    let mut ctx = TestContext::new();
    let hot = category_row("Hot Coffee", 1);
    let cold = category_row("Cold Coffee", 2);
    let (hot_id, cold_id) = (hot.id, cold.id);

    ctx.menu_repo
        .expect_get_categories()
        .withf(|active_only| *active_only)
        .returning(move |_| Ok(vec![hot.clone(), cold.clone()]));
    ctx.menu_repo
        .expect_get_menu_items()
        .returning(move |_| {
            Ok(vec![
                menu_item_row(cold_id, "Cold Brew", 179, 2),
                menu_item_row(hot_id, "Latte", 159, 2),
                menu_item_row(hot_id, "Espresso", 99, 1),
                menu_item_row(cold_id, "Iced Latte", 169, 1),
            ])
        });

    let categories = ctx.menu_repo.get_categories(true).await.unwrap();
    let items = ctx.menu_repo.get_menu_items(true).await.unwrap();
    let menu = group_menu(
        categories.into_iter().map(Into::into).collect(),
        items.into_iter().map(Into::into).collect(),
    );

    let names: Vec<(String, Vec<String>)> = menu
        .categories
        .iter()
        .map(|group| {
            (
                group.category.name.clone(),
                group.items.iter().map(|item| item.name.clone()).collect(),
            )
        })
        .collect();
    assert_eq!(
        names,
        vec![
            ("Hot Coffee".to_string(), vec!["Espresso".to_string(), "Latte".to_string()]),
            ("Cold Coffee".to_string(), vec!["Iced Latte".to_string(), "Cold Brew".to_string()]),
        ]
    );
}

#[tokio::test]
async fn test_menu_keeps_empty_categories_and_drops_orphan_items() {
    let mut ctx = TestContext::new();
    let specials = category_row("Specials", 3);

    ctx.menu_repo
        .expect_get_categories()
        .returning(move |_| Ok(vec![specials.clone()]));

    let categories = ctx.menu_repo.get_categories(false).await.unwrap();
    let orphan = menu_item_row(uuid::Uuid::new_v4(), "Mystery", 10, 0);
    let menu = group_menu(
        categories.into_iter().map(Into::into).collect(),
        vec![orphan.into()],
    );

    assert_eq!(menu.categories.len(), 1);
    assert!(menu.categories[0].items.is_empty());

    let value = serde_json::to_value(&menu).unwrap();
    assert_eq!(value["categories"][0]["name"], "Specials");
    assert_eq!(value["categories"][0]["sortOrder"], 3);
}

#[test]
fn test_menu_field_validation() {
    assert_eq!(required_name("Item name", "  Flat White ").unwrap(), "Flat White");
    assert!(matches!(required_name("Item name", "   "), Err(ShopError::Validation(_))));

    assert!(validate_price(1).is_ok());
    assert!(matches!(validate_price(0), Err(ShopError::Validation(_))));
    assert!(matches!(validate_price(-5), Err(ShopError::Validation(_))));
}

#[tokio::test]
async fn test_admin_menu_requires_login() {
    let app = build_app(FakeGateway::configured());

    let request = Request::builder()
        .uri("/api/admin/menu")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication error: Unauthorized");
}

#[tokio::test]
async fn test_create_item_rejects_bad_price_before_saving() {
    let app = build_app(FakeGateway::configured());

    let mut request = json_request(
        "POST",
        "/api/admin/menu/items",
        json!({
            "categoryId": uuid::Uuid::new_v4(),
            "name": "Flat White",
            "price": 0
        }),
    );
    request.headers_mut().insert(
        "authorization",
        format!("Bearer {}", admin_token()).parse().unwrap(),
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation error: Price must be greater than zero");
}
