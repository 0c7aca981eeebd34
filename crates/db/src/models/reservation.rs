//! Reservation model.
//!
//! Bookings and blocks share one table; `is_blocked` tells them apart and a
//! CHECK constraint keeps guest and pricing columns filled for bookings. The
//! request DTOs live in `staybook_core::booking`.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use staybook_core::booking::{GuestFields, PricingFields, ReservationSnapshot};
use staybook_core::error::CoreError;
use staybook_core::stay::StayWindow;
use staybook_core::types::{Day, DbId, Timestamp};

/// A row from the `reservations` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Reservation {
    pub id: DbId,
    pub reference: String,
    pub unit_id: DbId,
    pub start_date: Day,
    pub end_date: Day,
    pub is_blocked: bool,
    pub guest_name: Option<String>,
    pub guest_phone: Option<String>,
    pub guest_email: Option<String>,
    pub guest_sex: Option<String>,
    pub client_type: Option<String>,
    pub guest_count: Option<i32>,
    pub nights: Option<i32>,
    pub per_night: Option<Decimal>,
    pub subtotal: Option<Decimal>,
    pub service_fee: Option<Decimal>,
    pub total: Option<Decimal>,
    pub currency: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Reservation {
    /// The stored `[start_date, end_date)` window.
    pub fn window(&self) -> Result<StayWindow, CoreError> {
        StayWindow::new(self.start_date, self.end_date).map_err(|_| {
            CoreError::Internal(format!(
                "reservation {} is stored with end_date before start_date",
                self.id
            ))
        })
    }

    pub fn guest_fields(&self) -> GuestFields {
        GuestFields {
            guest_name: self.guest_name.clone(),
            guest_phone: self.guest_phone.clone(),
            guest_email: self.guest_email.clone(),
            guest_sex: self.guest_sex.clone(),
            client_type: self.client_type.clone(),
            guest_count: self.guest_count,
        }
    }

    pub fn pricing_fields(&self) -> PricingFields {
        PricingFields {
            nights: self.nights,
            per_night: self.per_night,
            subtotal: self.subtotal,
            service_fee: self.service_fee,
            total: self.total,
            currency: self.currency.clone(),
        }
    }

    /// Current state as the base for a partial update.
    pub fn snapshot(&self) -> Result<ReservationSnapshot, CoreError> {
        Ok(ReservationSnapshot {
            unit_id: self.unit_id,
            window: self.window()?,
            is_blocked: self.is_blocked,
            guest: self.guest_fields(),
            pricing: self.pricing_fields(),
            notes: self.notes.clone(),
        })
    }
}
