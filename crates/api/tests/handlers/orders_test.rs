use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use brewline_api::handlers::orders::{amount_in_paise, prepare_checkout, Checkout};
use brewline_core::{
    errors::{ShopError, ShopResult},
    models::{
        location::PickupLocation,
        menu::MenuItem,
        order::{CreateOrderRequest, OrderLineRequest},
    },
    slots::{ensure_bookable, SlotWindow},
};
use chrono::NaiveTime;
use mockall::predicate;
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

use crate::test_utils::{
    build_app, json_request, local, location_row, menu_item_row, send, utc, FakeGateway,
    TestContext,
};

fn request(location_id: Uuid, items: Vec<OrderLineRequest>) -> CreateOrderRequest {
    CreateOrderRequest {
        customer_name: " Asha ".to_string(),
        customer_mobile: "9876543210".to_string(),
        pickup_location_id: location_id,
        pickup_time: "10:30".to_string(),
        items,
    }
}

fn line(menu_item_id: Uuid, quantity: i32) -> OrderLineRequest {
    OrderLineRequest {
        menu_item_id,
        quantity,
        cup_names: vec!["Asha".to_string()],
    }
}

// Mirrors the lookups `create_order` performs before pricing
async fn checkout_with_mocks(ctx: &mut TestContext, payload: &CreateOrderRequest) -> ShopResult<Checkout> {
    let location: Option<PickupLocation> = ctx
        .location_repo
        .get_location_by_id(payload.pickup_location_id)
        .await?
        .map(Into::into);
    let ids = payload.items.iter().map(|line| line.menu_item_id).collect();
    let menu: Vec<MenuItem> = ctx
        .menu_repo
        .get_menu_items_by_ids(ids)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    prepare_checkout(payload, location.as_ref(), &menu)
}

#[tokio::test]
async fn test_checkout_prices_against_stored_menu() {
    let mut ctx = TestContext::new();
    let counter = location_row("Main Counter", true);
    let counter_id = counter.id;
    let category = Uuid::new_v4();
    let latte = menu_item_row(category, "Latte", 159, 1);
    let espresso = menu_item_row(category, "Espresso", 99, 2);
    let (latte_id, espresso_id) = (latte.id, espresso.id);

    ctx.location_repo
        .expect_get_location_by_id()
        .with(predicate::eq(counter_id))
        .times(1)
        .returning(move |_| Ok(Some(counter.clone())));
    ctx.menu_repo
        .expect_get_menu_items_by_ids()
        .with(predicate::eq(vec![latte_id, espresso_id]))
        .times(1)
        .returning(move |_| Ok(vec![espresso.clone(), latte.clone()]));

    let payload = request(counter_id, vec![line(latte_id, 2), line(espresso_id, 1)]);
    let checkout = checkout_with_mocks(&mut ctx, &payload).await.unwrap();

    assert_eq!(checkout.customer_name, "Asha");
    assert_eq!(checkout.pickup, NaiveTime::from_hms_opt(10, 30, 0).unwrap());
    assert_eq!(checkout.total, 2 * 159 + 99);
    assert_eq!(checkout.lines[0].cup_names, vec!["Asha".to_string(), String::new()]);
    assert_eq!(amount_in_paise(checkout.total), 41_700);
}

#[tokio::test]
async fn test_checkout_rejects_inactive_location() {
    let mut ctx = TestContext::new();
    let closed = location_row("Old Kiosk", false);
    let closed_id = closed.id;
    let item = menu_item_row(Uuid::new_v4(), "Latte", 159, 1);
    let item_id = item.id;

    ctx.location_repo
        .expect_get_location_by_id()
        .returning(move |_| Ok(Some(closed.clone())));
    ctx.menu_repo
        .expect_get_menu_items_by_ids()
        .returning(move |_| Ok(vec![item.clone()]));

    let payload = request(closed_id, vec![line(item_id, 1)]);
    let result = checkout_with_mocks(&mut ctx, &payload).await;

    assert_eq!(
        result.unwrap_err().to_string(),
        "Validation error: Pickup location is unavailable"
    );
}

#[tokio::test]
async fn test_checkout_rejects_unknown_items() {
    let mut ctx = TestContext::new();
    let counter = location_row("Main Counter", true);
    let counter_id = counter.id;

    ctx.location_repo
        .expect_get_location_by_id()
        .returning(move |_| Ok(Some(counter.clone())));
    ctx.menu_repo
        .expect_get_menu_items_by_ids()
        .returning(|_| Ok(Vec::new()));

    let payload = request(counter_id, vec![line(Uuid::new_v4(), 1)]);
    let result = checkout_with_mocks(&mut ctx, &payload).await;

    assert!(matches!(result, Err(ShopError::Validation(_))));
}

#[test]
fn test_checkout_validates_customer_and_pickup_time() {
    let location: PickupLocation = location_row("Main Counter", true).into();
    let item: MenuItem = menu_item_row(Uuid::new_v4(), "Latte", 159, 1).into();
    let valid = request(location.id, vec![line(item.id, 1)]);

    let mut bad_mobile = valid.clone();
    bad_mobile.customer_mobile = "1234567890".to_string();
    let mut no_name = valid.clone();
    no_name.customer_name = "  ".to_string();
    let mut bad_time = valid.clone();
    bad_time.pickup_time = "half ten".to_string();

    for payload in [bad_mobile, no_name, bad_time] {
        let result = prepare_checkout(&payload, Some(&location), std::slice::from_ref(&item));
        assert!(matches!(result, Err(ShopError::Validation(_))), "{:?}", payload);
    }
    assert!(prepare_checkout(&valid, None, std::slice::from_ref(&item)).is_err());
    assert!(prepare_checkout(&valid, Some(&location), std::slice::from_ref(&item)).is_ok());
}

#[tokio::test]
async fn test_last_seat_goes_to_first_order() {
    let mut ctx = TestContext::new();
    let window = SlotWindow::new("09:00", "12:00", 15, 2).unwrap();
    let now = local((2024, 5, 1), (9, 0));
    let pickup = NaiveTime::from_hms_opt(10, 30, 0).unwrap();
    // 10:30 IST
    let pickup_at = utc(2024, 5, 1, 5, 0);

    let mut holders = vec![2, 1].into_iter();
    ctx.order_repo
        .expect_count_slot_holders()
        .with(predicate::eq(pickup_at))
        .times(2)
        .returning(move |_| Ok(holders.next().unwrap_or(0)));

    let full = ctx.order_repo.count_slot_holders(pickup_at).await.unwrap();
    assert!(matches!(
        ensure_bookable(&window, pickup, full, now),
        Err(ShopError::Conflict(_))
    ));

    let one_left = ctx.order_repo.count_slot_holders(pickup_at).await.unwrap();
    assert!(ensure_bookable(&window, pickup, one_left, now).is_ok());
}

#[tokio::test]
async fn test_checkout_fails_fast_without_gateway() {
    let app = build_app(FakeGateway::unconfigured());

    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/orders",
            json!({
                "customerName": "Asha",
                "customerMobile": "9876543210",
                "pickupLocationId": Uuid::new_v4(),
                "pickupTime": "10:30",
                "items": [{"menuItemId": Uuid::new_v4(), "quantity": 1}]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Payment error: Payment gateway is not configured");
}

#[tokio::test]
async fn test_verify_rejects_forged_signature() {
    let app = build_app(FakeGateway::configured());

    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/orders/verify",
            json!({
                "razorpay_order_id": "order_abc",
                "razorpay_payment_id": "pay_xyz",
                "razorpay_signature": "deadbeef"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation error: Invalid payment signature");
}

#[tokio::test]
async fn test_order_lookup_needs_an_identifier() {
    let app = build_app(FakeGateway::configured());

    let request = Request::builder()
        .uri("/api/orders")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation error: Order id or order number is required");
}
