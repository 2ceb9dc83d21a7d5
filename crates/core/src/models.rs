pub mod auth;
pub mod location;
pub mod menu;
pub mod order;
pub mod time_slot;
