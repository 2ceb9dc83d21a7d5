use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default opening time used when no configuration has been saved yet.
pub const DEFAULT_START_TIME: &str = "09:00";
/// Default closing time used when no configuration has been saved yet.
pub const DEFAULT_END_TIME: &str = "22:00";
pub const DEFAULT_SLOT_DURATION: i32 = 15;
pub const DEFAULT_MAX_ORDERS_PER_SLOT: i32 = 5;

/// Operating window and per-slot capacity for pickup scheduling.
///
/// Times are stored as `HH:MM` wall-clock strings in the shop's timezone and
/// are only checked when a [`crate::slots::SlotWindow`] is built from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotConfig {
    pub id: Uuid,
    pub start_time: String,
    pub end_time: String,
    pub slot_duration: i32,
    pub max_orders_per_slot: i32,
    pub updated_at: DateTime<Utc>,
}

/// A single pickup slot offered to customers. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub time: String,
    pub display_time: String,
    pub available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotConfigSummary {
    pub start_time: String,
    pub end_time: String,
    pub slot_duration: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetTimeSlotsResponse {
    pub slots: Vec<Slot>,
    pub config: SlotConfigSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTimeSlotConfigRequest {
    pub start_time: String,
    pub end_time: String,
    pub slot_duration: i32,
    pub max_orders_per_slot: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlotConfigResponse {
    pub config: TimeSlotConfig,
}
