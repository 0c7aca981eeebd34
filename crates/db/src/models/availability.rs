//! Availability override model.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use staybook_core::types::{Day, DbId, Timestamp};

/// A row from the `availability_overrides` table.
///
/// `(unit_id, date)` is unique; `id` is not stable across bulk rewrites.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct AvailabilityOverride {
    pub id: DbId,
    pub unit_id: DbId,
    pub date: Day,
    pub is_available: bool,
    pub custom_price: Option<Decimal>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
