//! Row structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row, plus the `Deserialize` DTOs that create it.

pub mod availability;
pub mod reservation;
pub mod unit;
