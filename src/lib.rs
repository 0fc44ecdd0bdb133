//! Storefront
//!
//! Catalog filtering, cart pricing, promo codes and checkout for a small
//! clothing store, with in-memory seed data and a simulated payment gateway.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod details;
pub mod fixtures;
pub mod notifications;
pub mod observability;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod promo;
pub mod render;
pub mod routes;
pub mod store;
