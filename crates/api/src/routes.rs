pub mod admin;
pub mod auth;
pub mod cart;
pub mod counter;
pub mod health;
pub mod locations;
pub mod menu;
pub mod orders;
pub mod timeslots;
