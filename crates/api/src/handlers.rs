pub mod admin_orders;
pub mod auth;
pub mod cart;
pub mod counter;
pub mod locations;
pub mod menu;
pub mod orders;
pub mod timeslots;
