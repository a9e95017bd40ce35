//! Entity services: validation, ownership gating, query construction.
//!
//! Handlers stay thin; all lifecycle logic lives here and reaches the
//! database exclusively through the isolated executor in [`crate::db`].

pub mod characters;
pub mod locations;
pub mod moments;
pub mod preview;
