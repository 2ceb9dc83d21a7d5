use axum::http::StatusCode;
use brewline_api::{
    clock::ShopClock,
    handlers::timeslots::{build_slot_listing, validate_config_update},
};
use brewline_core::{
    errors::ShopError,
    models::time_slot::{TimeSlotConfig, UpdateTimeSlotConfigRequest},
};
use chrono::NaiveDateTime;
use mockall::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

use crate::test_utils::{
    admin_token, build_app, config_row, json_request, local, send, utc, FakeGateway, TestContext,
};

#[tokio::test]
async fn test_listing_marks_paid_bookings_in_shop_time() {
    let mut ctx = TestContext::new();
    let clock = ShopClock::new(chrono_tz::Asia::Kolkata);
    let now = local((2024, 5, 1), (8, 0));
    let (from, until) = clock.today_bounds(now).unwrap();

    ctx.time_slot_config_repo
        .expect_get_or_create_config()
        .returning(|| Ok(config_row("09:00", "10:00", 30, 2)));
    ctx.order_repo
        .expect_get_paid_pickup_times()
        .with(predicate::eq(from), predicate::eq(until))
        .times(1)
        .returning(|_, _| {
            // 09:30 IST twice, 09:00 IST once
            Ok(vec![
                utc(2024, 5, 1, 4, 0),
                utc(2024, 5, 1, 4, 0),
                utc(2024, 5, 1, 3, 30),
            ])
        });

    let config: TimeSlotConfig = ctx.time_slot_config_repo.get_or_create_config().await.unwrap().into();
    let pickups = ctx.order_repo.get_paid_pickup_times(from, until).await.unwrap();
    let listing = build_slot_listing(
        &config,
        pickups.into_iter().map(|pickup| clock.to_local(pickup)),
        now,
    )
    .unwrap();

    let value = serde_json::to_value(&listing).unwrap();
    assert_eq!(
        value,
        json!({
            "slots": [
                {"time": "09:00", "displayTime": "09:00 am", "available": true},
                {"time": "09:30", "displayTime": "09:30 am", "available": false},
            ],
            "config": {"startTime": "09:00", "endTime": "10:00", "slotDuration": 30}
        })
    );
}

#[test]
fn test_listing_applies_lead_time() {
    let config: TimeSlotConfig = config_row("09:00", "10:00", 15, 5).into();
    let listing = build_slot_listing(&config, Vec::<NaiveDateTime>::new(), local((2024, 5, 1), (9, 10))).unwrap();

    let available: Vec<(&str, bool)> = listing
        .slots
        .iter()
        .map(|slot| (slot.time.as_str(), slot.available))
        .collect();
    assert_eq!(
        available,
        vec![("09:00", false), ("09:15", false), ("09:30", true), ("09:45", true)]
    );
}

#[test]
fn test_listing_rejects_corrupt_config() {
    let config: TimeSlotConfig = config_row("9am", "10:00", 15, 5).into();
    let result = build_slot_listing(&config, Vec::<NaiveDateTime>::new(), local((2024, 5, 1), (8, 0)));

    assert!(matches!(result, Err(ShopError::Validation(_))));
}

fn update(start: &str, end: &str, slot_duration: i32, max: i32) -> UpdateTimeSlotConfigRequest {
    UpdateTimeSlotConfigRequest {
        start_time: start.to_string(),
        end_time: end.to_string(),
        slot_duration,
        max_orders_per_slot: max,
    }
}

#[rstest]
#[case::closes_before_opening(update("18:00", "09:00", 15, 5))]
#[case::zero_length_window(update("09:00", "09:00", 15, 5))]
#[case::unsupported_duration(update("09:00", "22:00", 25, 5))]
#[case::no_capacity(update("09:00", "22:00", 15, 0))]
#[case::malformed_time(update("9:00", "22:00", 15, 5))]
fn test_config_update_rejected(#[case] payload: UpdateTimeSlotConfigRequest) {
    assert!(matches!(
        validate_config_update(&payload),
        Err(ShopError::Validation(_))
    ));
}

#[test]
fn test_config_update_accepted() {
    let window = validate_config_update(&update(" 07:30", "11:00 ", 20, 3)).unwrap();

    assert_eq!(window.slot_duration, 20);
    assert_eq!(window.max_orders_per_slot, 3);
    assert_eq!(window.slot_starts().count(), 11);
}

#[tokio::test]
async fn test_config_update_endpoint_validates_before_saving() {
    let app = build_app(FakeGateway::configured());

    let mut request = json_request(
        "PATCH",
        "/api/admin/timeslots",
        json!({"startTime": "22:00", "endTime": "09:00", "slotDuration": 15, "maxOrdersPerSlot": 5}),
    );
    request.headers_mut().insert(
        "cookie",
        format!("admin_token={}", admin_token()).parse().unwrap(),
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation error: Start time must be before end time");
}
