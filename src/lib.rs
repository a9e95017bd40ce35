//! lore-server library crate.
//!
//! The binary in `main.rs` wires these modules together; integration tests
//! build the same router against an embedded in-memory store.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod tenant;
