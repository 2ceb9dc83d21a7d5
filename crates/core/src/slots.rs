//! # Pickup Slot Availability
//!
//! Turns the shop's operating window into the list of pickup slots offered
//! for today, marking each slot unavailable when it is too close to "now" or
//! when it already holds as many orders as the slot capacity allows.
//!
//! Everything here is a pure computation over values the caller has already
//! fetched. The caller supplies the shop-local wall clock so that results are
//! deterministic under test.

use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};

use crate::errors::{ShopError, ShopResult};
use crate::models::time_slot::{Slot, TimeSlotConfig};

/// Minimum time between now and the earliest bookable pickup.
pub const LEAD_TIME_MINUTES: i64 = 15;

/// Slot lengths staff may choose from, in minutes.
pub const ALLOWED_SLOT_DURATIONS: [i32; 5] = [10, 15, 20, 30, 60];

/// Orders already placed for today, keyed by `HH:MM` slot start.
pub type BookingTally = HashMap<String, i64>;

/// A validated operating window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub slot_duration: i32,
    pub max_orders_per_slot: i32,
}

impl SlotWindow {
    /// Validates a stored configuration.
    ///
    /// A window whose start is not before its end is accepted and simply
    /// yields no slots.
    pub fn from_config(config: &TimeSlotConfig) -> ShopResult<Self> {
        Self::new(
            &config.start_time,
            &config.end_time,
            config.slot_duration,
            config.max_orders_per_slot,
        )
    }

    pub fn new(
        start_time: &str,
        end_time: &str,
        slot_duration: i32,
        max_orders_per_slot: i32,
    ) -> ShopResult<Self> {
        let start = parse_clock(start_time)?;
        let end = parse_clock(end_time)?;

        if !ALLOWED_SLOT_DURATIONS.contains(&slot_duration) {
            return Err(ShopError::Validation(format!(
                "Slot duration must be one of {:?} minutes, got {}",
                ALLOWED_SLOT_DURATIONS, slot_duration
            )));
        }
        if max_orders_per_slot < 1 {
            return Err(ShopError::Validation(format!(
                "Max orders per slot must be at least 1, got {}",
                max_orders_per_slot
            )));
        }

        Ok(Self {
            start,
            end,
            slot_duration,
            max_orders_per_slot,
        })
    }

    fn step(&self) -> Duration {
        Duration::minutes(self.slot_duration as i64)
    }

    /// Slot start times inside the window, in order.
    pub fn slot_starts(&self) -> impl Iterator<Item = NaiveTime> + '_ {
        let end = self.end;
        let step = self.step();
        std::iter::successors(Some(self.start), move |current| {
            // overflowing_add_signed wraps past midnight; a wrapped value is
            // never a later slot of the same day.
            let (next, wrapped) = current.overflowing_add_signed(step);
            (wrapped == 0 && next > *current).then_some(next)
        })
        .take_while(move |time| *time < end)
    }

    /// Whether `time` is the start of one of the window's slots.
    pub fn is_slot_start(&self, time: NaiveTime) -> bool {
        if time < self.start || time >= self.end {
            return false;
        }
        let offset = (time - self.start).num_minutes();
        time.second() == 0 && offset % self.slot_duration as i64 == 0
    }
}

/// Parses a strict 24-hour `HH:MM` value.
pub fn parse_clock(value: &str) -> ShopResult<NaiveTime> {
    let malformed = || ShopError::Validation(format!("Invalid time '{}', expected HH:MM", value));

    let (hours, minutes) = value.split_once(':').ok_or_else(malformed)?;
    if hours.len() != 2 || minutes.len() != 2 {
        return Err(malformed());
    }
    let hours: u32 = hours.parse().map_err(|_| malformed())?;
    let minutes: u32 = minutes.parse().map_err(|_| malformed())?;

    NaiveTime::from_hms_opt(hours, minutes, 0).ok_or_else(malformed)
}

/// `HH:MM` key used for slots and booking tallies.
pub fn format_clock(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Customer-facing 12-hour rendering, e.g. `09:15 am`.
pub fn display_clock(time: NaiveTime) -> String {
    time.format("%I:%M %P").to_string()
}

/// Counts pickups per `HH:MM` slot, truncating seconds.
pub fn tally_bookings<I>(pickups: I) -> BookingTally
where
    I: IntoIterator<Item = NaiveDateTime>,
{
    let mut tally = BookingTally::new();
    for pickup in pickups {
        *tally.entry(format_clock(pickup.time())).or_insert(0) += 1;
    }
    tally
}

/// Produces today's pickup slots for `window`.
///
/// `now` is the shop-local wall clock. A slot is available only when it
/// starts at least [`LEAD_TIME_MINUTES`] after `now` and holds fewer than
/// `max_orders_per_slot` bookings.
pub fn generate_slots(window: &SlotWindow, booked: &BookingTally, now: NaiveDateTime) -> Vec<Slot> {
    let today = now.date();
    let cutoff = now + Duration::minutes(LEAD_TIME_MINUTES);
    let max = window.max_orders_per_slot as i64;

    window
        .slot_starts()
        .map(|time| {
            let key = format_clock(time);
            let count = booked.get(&key).copied().unwrap_or(0);
            let too_soon = today.and_time(time) < cutoff;
            let full = count >= max;

            Slot {
                time: key,
                display_time: display_clock(time),
                available: !too_soon && !full,
            }
        })
        .collect()
}

/// Confirms that a customer may still book `pickup` today.
///
/// Used at order creation, with `booked` being the number of orders that
/// already hold this slot.
pub fn ensure_bookable(
    window: &SlotWindow,
    pickup: NaiveTime,
    booked: i64,
    now: NaiveDateTime,
) -> ShopResult<()> {
    if !window.is_slot_start(pickup) {
        return Err(ShopError::Validation(format!(
            "{} is not a pickup slot",
            format_clock(pickup)
        )));
    }
    if now.date().and_time(pickup) < now + Duration::minutes(LEAD_TIME_MINUTES) {
        return Err(ShopError::Validation(format!(
            "Pickup slot {} is too soon",
            format_clock(pickup)
        )));
    }
    if booked >= window.max_orders_per_slot as i64 {
        return Err(ShopError::Conflict(format!(
            "Pickup slot {} is fully booked",
            format_clock(pickup)
        )));
    }
    Ok(())
}
