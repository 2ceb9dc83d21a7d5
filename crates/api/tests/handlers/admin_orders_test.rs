use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use brewline_api::{
    clock::ShopClock,
    handlers::admin_orders::{advance_target, parse_order_filter, AdminOrderQuery},
    middleware::auth::SessionSigner,
};
use brewline_core::{
    errors::{ShopError, ShopResult},
    models::{
        auth::SessionClaims,
        order::{OrderStatus, PaymentStatus},
    },
};
use chrono::{Duration, Utc};
use mockall::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use uuid::Uuid;

use crate::test_utils::{
    build_app, customer_token, order_row, send, utc, FakeGateway, TestContext, SESSION_SECRET,
};

fn kolkata() -> ShopClock {
    ShopClock::new(chrono_tz::Asia::Kolkata)
}

fn query(status: Option<&str>, date: Option<&str>) -> AdminOrderQuery {
    AdminOrderQuery {
        status: status.map(str::to_string),
        date: date.map(str::to_string),
        payment: None,
    }
}

#[rstest]
#[case(None, None)]
#[case(Some("all"), None)]
#[case(Some(""), None)]
#[case(Some("ready"), Some(OrderStatus::Ready))]
#[case(Some("PREPARING"), Some(OrderStatus::Preparing))]
fn test_status_filter(#[case] status: Option<&str>, #[case] expected: Option<OrderStatus>) {
    let filter = parse_order_filter(&query(status, None), &kolkata()).unwrap();
    assert_eq!(filter.status, expected);
    assert_eq!(filter.payment_status, Some(PaymentStatus::Paid));
    assert_eq!(filter.pickup_from, None);
}

#[rstest]
#[case(None, Some(PaymentStatus::Paid))]
#[case(Some(""), Some(PaymentStatus::Paid))]
#[case(Some("all"), None)]
#[case(Some("pending"), Some(PaymentStatus::Pending))]
#[case(Some("FAILED"), Some(PaymentStatus::Failed))]
fn test_payment_filter_surfaces_unpaid_checkouts(
    #[case] payment: Option<&str>,
    #[case] expected: Option<PaymentStatus>,
) {
    let mut query = query(None, None);
    query.payment = payment.map(str::to_string);

    let filter = parse_order_filter(&query, &kolkata()).unwrap();
    assert_eq!(filter.payment_status, expected);
}

#[test]
fn test_unknown_payment_filter_rejected() {
    let mut query = query(None, None);
    query.payment = Some("REFUNDED".to_string());

    assert!(matches!(
        parse_order_filter(&query, &kolkata()),
        Err(ShopError::Validation(_))
    ));
}

#[test]
fn test_date_filter_covers_shop_day() {
    let filter = parse_order_filter(&query(Some("all"), Some("2024-05-01")), &kolkata()).unwrap();

    assert_eq!(filter.pickup_from, Some(utc(2024, 4, 30, 18, 30)));
    assert_eq!(filter.pickup_until, Some(utc(2024, 5, 1, 18, 30)));
}

#[rstest]
#[case(Some("LOST"), None)]
#[case(None, Some("01/05/2024"))]
#[case(None, Some("2024-02-30"))]
fn test_invalid_filters_rejected(#[case] status: Option<&str>, #[case] date: Option<&str>) {
    assert!(matches!(
        parse_order_filter(&query(status, date), &kolkata()),
        Err(ShopError::Validation(_))
    ));
}

#[rstest]
#[case(OrderStatus::Confirmed, OrderStatus::Preparing)]
#[case(OrderStatus::Preparing, OrderStatus::Ready)]
#[case(OrderStatus::Ready, OrderStatus::Completed)]
fn test_counter_progression(#[case] current: OrderStatus, #[case] next: OrderStatus) {
    assert_eq!(advance_target(current).unwrap(), next);
}

#[rstest]
#[case(OrderStatus::Pending)]
#[case(OrderStatus::Completed)]
#[case(OrderStatus::Cancelled)]
fn test_terminal_orders_do_not_advance(#[case] current: OrderStatus) {
    assert!(matches!(advance_target(current), Err(ShopError::Conflict(_))));
}

// Mirrors `advance_order` with the repository mocked out
async fn advance_with_mocks(ctx: &mut TestContext, id: Uuid) -> ShopResult<OrderStatus> {
    let current = ctx
        .order_repo
        .get_order_by_id(id)
        .await?
        .ok_or_else(|| ShopError::NotFound(format!("Order with ID {} not found", id)))?
        .into_order()?;
    let next = advance_target(current.status)?;

    let updated = ctx
        .order_repo
        .transition_order_status(id, current.status, next)
        .await?
        .ok_or_else(|| ShopError::Conflict("Order was updated by someone else".to_string()))?
        .into_order()?;
    Ok(updated.status)
}

#[tokio::test]
async fn test_advance_moves_one_step() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();

    ctx.order_repo
        .expect_get_order_by_id()
        .with(predicate::eq(id))
        .returning(move |id| Ok(Some(order_row(id, "PREPARING", "PAID"))));
    ctx.order_repo
        .expect_transition_order_status()
        .with(
            predicate::eq(id),
            predicate::eq(OrderStatus::Preparing),
            predicate::eq(OrderStatus::Ready),
        )
        .times(1)
        .returning(|id, _, to| Ok(Some(order_row(id, to.as_str(), "PAID"))));

    assert_eq!(advance_with_mocks(&mut ctx, id).await.unwrap(), OrderStatus::Ready);
}

#[tokio::test]
async fn test_advance_loses_race_with_conflict() {
    let mut ctx = TestContext::new();

    ctx.order_repo
        .expect_get_order_by_id()
        .returning(|id| Ok(Some(order_row(id, "CONFIRMED", "PAID"))));
    ctx.order_repo
        .expect_transition_order_status()
        .returning(|_, _, _| Ok(None));

    let result = advance_with_mocks(&mut ctx, Uuid::new_v4()).await;
    assert!(matches!(result, Err(ShopError::Conflict(_))));
}

#[tokio::test]
async fn test_advance_unknown_order() {
    let mut ctx = TestContext::new();

    ctx.order_repo
        .expect_get_order_by_id()
        .returning(|_| Ok(None));
    ctx.order_repo.expect_transition_order_status().never();

    let result = advance_with_mocks(&mut ctx, Uuid::new_v4()).await;
    assert!(matches!(result, Err(ShopError::NotFound(_))));
}

fn get(uri: &str, token: Option<String>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

#[rstest]
#[case::no_token(None)]
#[case::customer_token(Some(customer_token()))]
#[case::garbage_token(Some("not-a-token".to_string()))]
#[case::expired_token(Some(
    SessionSigner::new(SESSION_SECRET)
        .sign(&SessionClaims::admin(Uuid::new_v4(), "admin", Utc::now() - Duration::days(8)))
        .unwrap()
))]
#[case::foreign_secret(Some(
    SessionSigner::new("someone-else")
        .sign(&SessionClaims::admin(Uuid::new_v4(), "admin", Utc::now()))
        .unwrap()
))]
#[tokio::test]
async fn test_staff_endpoints_reject_non_admins(#[case] token: Option<String>) {
    for uri in ["/api/admin/orders", "/api/counter/orders", "/api/admin/timeslots"] {
        let app = build_app(FakeGateway::configured());
        let (status, _) = send(app, get(uri, token.clone())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
    }
}
