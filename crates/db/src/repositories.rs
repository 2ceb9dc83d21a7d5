pub mod admin;
pub mod customer;
pub mod location;
pub mod menu;
pub mod order;
pub mod time_slot_config;
