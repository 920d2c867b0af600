//! Ticket order service for city events: a JSON API over events, customers
//! and ticket orders, plus the static page that drives it.
pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod seed;
pub mod state;
pub mod store;
pub mod utils;
