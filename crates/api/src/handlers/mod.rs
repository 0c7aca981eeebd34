pub mod availability;
pub mod reservations;
pub mod units;
