//! Rental unit model and DTOs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use staybook_core::error::CoreError;
use staybook_core::types::{DbId, Timestamp};
use staybook_core::unit::check_unit;

/// A row from the `units` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Unit {
    pub id: DbId,
    pub name: String,
    pub nightly_price: Decimal,
    pub currency: String,
    pub max_guests: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a unit.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUnit {
    pub name: String,
    pub nightly_price: Decimal,
    /// Defaults to `USD` if omitted.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Defaults to 1 if omitted.
    #[serde(default = "default_max_guests")]
    pub max_guests: i32,
}

impl CreateUnit {
    pub fn validate(&self) -> Result<(), CoreError> {
        check_unit(&self.name, self.nightly_price, &self.currency, self.max_guests).into_result()
    }
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_max_guests() -> i32 {
    1
}
