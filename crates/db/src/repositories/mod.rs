//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods that
//! accept a pool, a connection, or any `PgExecutor` as the first argument.

pub mod availability_repo;
pub mod reservation_repo;
pub mod unit_repo;

pub use availability_repo::AvailabilityRepo;
pub use reservation_repo::ReservationRepo;
pub use unit_repo::UnitRepo;
