//! # Brewline Core
//!
//! Domain types and pure business rules shared by the database and API crates:
//! wire models, the error taxonomy, the pickup-slot availability calculator,
//! the session cart and order pricing.

pub mod cart;
pub mod errors;
pub mod models;
pub mod pricing;
pub mod slots;
