//! Domain logic for the staybook booking backend.
//!
//! This crate has no I/O and no internal dependencies so the API layer,
//! the store adapters, and tests can all share the same rules.

pub mod availability;
pub mod booking;
pub mod day_range;
pub mod error;
pub mod money;
pub mod stay;
pub mod types;
pub mod unit;
