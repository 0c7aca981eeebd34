//! Guest bookings and administrative blocks.
//!
//! A reservation is either a real guest booking, which must carry complete
//! guest and pricing details, or a block (maintenance, owner use) where those
//! details are optional. Request bodies arrive flat with an `is_blocked` flag
//! and are turned into [`Occupancy`] here, so code past this point never has
//! to re-check which fields are present.

use rand::distr::Alphanumeric;
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{CoreError, FieldErrors};
use crate::money::check_amount;
use crate::stay::StayWindow;
use crate::types::{Day, DbId};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const SEX_MALE: &str = "male";
pub const SEX_FEMALE: &str = "female";
pub const VALID_SEXES: &[&str] = &[SEX_MALE, SEX_FEMALE];

pub const CLIENT_INDIVIDUAL: &str = "individual";
pub const CLIENT_COMPANY: &str = "company";
pub const VALID_CLIENT_TYPES: &[&str] = &[CLIENT_INDIVIDUAL, CLIENT_COMPANY];

pub const MAX_NOTES_LEN: usize = 2000;

/// Every reservation reference starts with this prefix.
pub const REFERENCE_PREFIX: &str = "BK-";
const REFERENCE_CODE_LEN: usize = 8;

// ---------------------------------------------------------------------------
// Guest details
// ---------------------------------------------------------------------------

/// Guest columns as they appear on the wire and in storage; every field optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct GuestFields {
    #[validate(length(
        min = 1,
        max = 255,
        message = "guest_name must be between 1 and 255 characters"
    ))]
    pub guest_name: Option<String>,
    #[validate(length(
        min = 3,
        max = 32,
        message = "guest_phone must be between 3 and 32 characters"
    ))]
    pub guest_phone: Option<String>,
    #[validate(email(message = "guest_email must be a valid email address"))]
    pub guest_email: Option<String>,
    pub guest_sex: Option<String>,
    pub client_type: Option<String>,
    #[validate(range(min = 1, max = 100, message = "guest_count must be between 1 and 100"))]
    pub guest_count: Option<i32>,
}

impl GuestFields {
    /// Format checks for whichever fields are present.
    pub fn check(&self) -> FieldErrors {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from(e),
        };
        if let Some(sex) = self.guest_sex.as_deref() {
            if !VALID_SEXES.contains(&sex) {
                errors.add(
                    "guest_sex",
                    format!("guest_sex must be one of: {}", VALID_SEXES.join(", ")),
                );
            }
        }
        if let Some(kind) = self.client_type.as_deref() {
            if !VALID_CLIENT_TYPES.contains(&kind) {
                errors.add(
                    "client_type",
                    format!(
                        "client_type must be one of: {}",
                        VALID_CLIENT_TYPES.join(", ")
                    ),
                );
            }
        }
        errors
    }

    /// Fields present in `patch` win; the rest keep their current value.
    pub fn overlay(self, patch: GuestFields) -> GuestFields {
        GuestFields {
            guest_name: patch.guest_name.or(self.guest_name),
            guest_phone: patch.guest_phone.or(self.guest_phone),
            guest_email: patch.guest_email.or(self.guest_email),
            guest_sex: patch.guest_sex.or(self.guest_sex),
            client_type: patch.client_type.or(self.client_type),
            guest_count: patch.guest_count.or(self.guest_count),
        }
    }

    /// Promote to [`GuestDetails`], reporting every missing field at once.
    pub fn require(self) -> Result<GuestDetails, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = required(self.guest_name, "guest_name", &mut errors);
        let phone = required(self.guest_phone, "guest_phone", &mut errors);
        let email = required(self.guest_email, "guest_email", &mut errors);
        let sex = required(self.guest_sex, "guest_sex", &mut errors);
        let client_type = required(self.client_type, "client_type", &mut errors);
        let guest_count = required(self.guest_count, "guest_count", &mut errors);

        match (name, phone, email, sex, client_type, guest_count) {
            (Some(name), Some(phone), Some(email), Some(sex), Some(client_type), Some(guest_count))
                if errors.is_empty() =>
            {
                Ok(GuestDetails {
                    name,
                    phone,
                    email,
                    sex,
                    client_type,
                    guest_count,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Complete guest details, required for a real booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestDetails {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub sex: String,
    pub client_type: String,
    pub guest_count: i32,
}

impl GuestDetails {
    pub fn to_fields(&self) -> GuestFields {
        GuestFields {
            guest_name: Some(self.name.clone()),
            guest_phone: Some(self.phone.clone()),
            guest_email: Some(self.email.clone()),
            guest_sex: Some(self.sex.clone()),
            client_type: Some(self.client_type.clone()),
            guest_count: Some(self.guest_count),
        }
    }
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

/// Pricing columns as they appear on the wire and in storage; every field optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PricingFields {
    #[validate(range(min = 0, message = "nights must not be negative"))]
    pub nights: Option<i32>,
    pub per_night: Option<Decimal>,
    pub subtotal: Option<Decimal>,
    pub service_fee: Option<Decimal>,
    pub total: Option<Decimal>,
    pub currency: Option<String>,
}

impl PricingFields {
    /// Format checks for whichever fields are present.
    pub fn check(&self) -> FieldErrors {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from(e),
        };
        for (field, amount) in [
            ("per_night", self.per_night),
            ("subtotal", self.subtotal),
            ("service_fee", self.service_fee),
            ("total", self.total),
        ] {
            if let Some(amount) = amount {
                check_amount(field, amount, &mut errors);
            }
        }
        if let Some(code) = self.currency.as_deref() {
            if !is_currency_code(code) {
                errors.add("currency", "currency must be a 3-letter ISO 4217 code");
            }
        }
        errors
    }

    /// Fields present in `patch` win; the rest keep their current value.
    pub fn overlay(self, patch: PricingFields) -> PricingFields {
        PricingFields {
            nights: patch.nights.or(self.nights),
            per_night: patch.per_night.or(self.per_night),
            subtotal: patch.subtotal.or(self.subtotal),
            service_fee: patch.service_fee.or(self.service_fee),
            total: patch.total.or(self.total),
            currency: patch.currency.or(self.currency),
        }
    }

    /// Promote to [`Pricing`], reporting every missing field at once.
    pub fn require(self) -> Result<Pricing, FieldErrors> {
        let mut errors = FieldErrors::new();
        let nights = required(self.nights, "nights", &mut errors);
        let per_night = required(self.per_night, "per_night", &mut errors);
        let subtotal = required(self.subtotal, "subtotal", &mut errors);
        let service_fee = required(self.service_fee, "service_fee", &mut errors);
        let total = required(self.total, "total", &mut errors);
        let currency = required(self.currency, "currency", &mut errors);

        match (nights, per_night, subtotal, service_fee, total, currency) {
            (Some(nights), Some(per_night), Some(subtotal), Some(service_fee), Some(total), Some(currency))
                if errors.is_empty() =>
            {
                Ok(Pricing {
                    nights,
                    per_night,
                    subtotal,
                    service_fee,
                    total,
                    currency,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Complete pricing, required for a real booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pricing {
    pub nights: i32,
    pub per_night: Decimal,
    pub subtotal: Decimal,
    pub service_fee: Decimal,
    pub total: Decimal,
    pub currency: String,
}

impl Pricing {
    pub fn to_fields(&self) -> PricingFields {
        PricingFields {
            nights: Some(self.nights),
            per_night: Some(self.per_night),
            subtotal: Some(self.subtotal),
            service_fee: Some(self.service_fee),
            total: Some(self.total),
            currency: Some(self.currency.clone()),
        }
    }
}

/// ISO 4217 shape: three upper-case ASCII letters.
pub fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())
}

fn required<T>(value: Option<T>, field: &str, errors: &mut FieldErrors) -> Option<T> {
    if value.is_none() {
        errors.add(
            field,
            format!("{field} is required unless the reservation is blocked"),
        );
    }
    value
}

// ---------------------------------------------------------------------------
// Occupancy
// ---------------------------------------------------------------------------

/// What a reservation holds the unit for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Occupancy {
    /// A real guest stay.
    Booking { guest: GuestDetails, pricing: Pricing },
    /// An administrative block; guest and pricing columns are kept as given.
    Block {
        guest: GuestFields,
        pricing: PricingFields,
    },
}

impl Occupancy {
    /// Choose the variant from the `is_blocked` flag and validate accordingly.
    pub fn from_fields(
        is_blocked: bool,
        guest: GuestFields,
        pricing: PricingFields,
    ) -> Result<Self, FieldErrors> {
        let mut errors = guest.check();
        errors.merge(pricing.check());

        if is_blocked {
            return if errors.is_empty() {
                Ok(Occupancy::Block { guest, pricing })
            } else {
                Err(errors)
            };
        }

        let guest = guest.require().map_err(|e| errors.merge(e));
        let pricing = pricing.require().map_err(|e| errors.merge(e));
        match (guest, pricing) {
            (Ok(guest), Ok(pricing)) if errors.is_empty() => {
                Ok(Occupancy::Booking { guest, pricing })
            }
            _ => Err(errors),
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, Occupancy::Block { .. })
    }

    /// Flattened guest columns for storage.
    pub fn guest_fields(&self) -> GuestFields {
        match self {
            Occupancy::Booking { guest, .. } => guest.to_fields(),
            Occupancy::Block { guest, .. } => guest.clone(),
        }
    }

    /// Flattened pricing columns for storage.
    pub fn pricing_fields(&self) -> PricingFields {
        match self {
            Occupancy::Booking { pricing, .. } => pricing.to_fields(),
            Occupancy::Block { pricing, .. } => pricing.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Reservations
// ---------------------------------------------------------------------------

/// A fully validated reservation ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReservation {
    pub unit_id: DbId,
    pub window: StayWindow,
    pub occupancy: Occupancy,
    pub notes: Option<String>,
}

/// The current state of a stored reservation, used as the base of an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationSnapshot {
    pub unit_id: DbId,
    pub window: StayWindow,
    pub is_blocked: bool,
    pub guest: GuestFields,
    pub pricing: PricingFields,
    pub notes: Option<String>,
}

/// Body of `POST /reservations`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReservationRequest {
    pub unit_id: DbId,
    pub start_date: Day,
    pub end_date: Day,
    #[serde(default)]
    pub is_blocked: bool,
    #[serde(flatten)]
    pub guest: GuestFields,
    #[serde(flatten)]
    pub pricing: PricingFields,
    pub notes: Option<String>,
}

impl CreateReservationRequest {
    /// Validate the body. Guest bookings may not start before `today`.
    pub fn into_new_reservation(self, today: Day) -> Result<NewReservation, CoreError> {
        let mut errors = FieldErrors::new();

        if self.end_date < self.start_date {
            errors.add("end_date", "end_date must be on or after start_date");
        }
        if !self.is_blocked && self.start_date < today {
            errors.add("start_date", "start_date must not be in the past");
        }
        check_notes(self.notes.as_deref(), &mut errors);

        let occupancy = match Occupancy::from_fields(self.is_blocked, self.guest, self.pricing) {
            Ok(occupancy) => Some(occupancy),
            Err(e) => {
                errors.merge(e);
                None
            }
        };

        match occupancy {
            Some(occupancy) if errors.is_empty() => Ok(NewReservation {
                unit_id: self.unit_id,
                window: StayWindow::new(self.start_date, self.end_date)?,
                occupancy,
                notes: self.notes,
            }),
            _ => Err(CoreError::Validation(errors)),
        }
    }
}

/// Body of `PUT|PATCH /reservations/{id}`. Absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateReservationRequest {
    pub unit_id: Option<DbId>,
    pub start_date: Option<Day>,
    pub end_date: Option<Day>,
    pub is_blocked: Option<bool>,
    #[serde(flatten)]
    pub guest: GuestFields,
    #[serde(flatten)]
    pub pricing: PricingFields,
    pub notes: Option<String>,
}

impl UpdateReservationRequest {
    /// Whether the update can move the reservation onto other dates or
    /// another unit. Only such updates need an overlap re-check.
    pub fn touches_window(&self) -> bool {
        self.unit_id.is_some() || self.start_date.is_some() || self.end_date.is_some()
    }

    /// Merge onto `current` and re-validate the result as a whole.
    pub fn apply_to(self, current: ReservationSnapshot) -> Result<NewReservation, CoreError> {
        let mut errors = FieldErrors::new();

        let start = self.start_date.unwrap_or(current.window.start());
        let end = self.end_date.unwrap_or(current.window.end());
        if end < start {
            errors.add("end_date", "end_date must be on or after start_date");
        }

        let notes = self.notes.or(current.notes);
        check_notes(notes.as_deref(), &mut errors);

        let is_blocked = self.is_blocked.unwrap_or(current.is_blocked);
        let guest = current.guest.overlay(self.guest);
        let pricing = current.pricing.overlay(self.pricing);
        let occupancy = match Occupancy::from_fields(is_blocked, guest, pricing) {
            Ok(occupancy) => Some(occupancy),
            Err(e) => {
                errors.merge(e);
                None
            }
        };

        match occupancy {
            Some(occupancy) if errors.is_empty() => Ok(NewReservation {
                unit_id: self.unit_id.unwrap_or(current.unit_id),
                window: StayWindow::new(start, end)?,
                occupancy,
                notes,
            }),
            _ => Err(CoreError::Validation(errors)),
        }
    }
}

fn check_notes(notes: Option<&str>, errors: &mut FieldErrors) {
    if notes.is_some_and(|n| n.chars().count() > MAX_NOTES_LEN) {
        errors.add(
            "notes",
            format!("notes must be at most {MAX_NOTES_LEN} characters"),
        );
    }
}

// ---------------------------------------------------------------------------
// Reference codes
// ---------------------------------------------------------------------------

/// Generate a human-readable reference such as `BK-7Q2ZK9WD`.
pub fn generate_reference() -> String {
    let code: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(REFERENCE_CODE_LEN)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect();
    format!("{REFERENCE_PREFIX}{code}")
}

/// Whether `reference` has the shape produced by [`generate_reference`].
pub fn is_valid_reference(reference: &str) -> bool {
    reference
        .strip_prefix(REFERENCE_PREFIX)
        .is_some_and(|code| {
            code.len() == REFERENCE_CODE_LEN
                && code
                    .bytes()
                    .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        })
}
