//! The two booking components and the flows built on them.
//!
//! Both depend only on the store ports in `staybook_db::store`, never on
//! each other.

pub mod availability;
pub mod overlap_guard;
pub mod reservations;

pub use availability::AvailabilityCalendar;
pub use overlap_guard::ReservationOverlapGuard;
pub use reservations::ReservationService;
