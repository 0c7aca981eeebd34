//! The double-booking check.
//!
//! [`ReservationOverlapGuard::check_conflict`] is the read-only predicate
//! used for UI pre-checks. Writers call
//! [`ReservationOverlapGuard::ensure_free`] inside a unit write section so
//! no other writer on the unit can slip in between the check and the write.

use std::sync::Arc;

use staybook_core::error::CoreError;
use staybook_core::stay::{find_conflict, overlap_conflict, StayWindow};
use staybook_core::types::DbId;
use staybook_db::store::{ReservationStore, UnitWrite};

#[derive(Clone)]
pub struct ReservationOverlapGuard {
    store: Arc<dyn ReservationStore>,
}

impl ReservationOverlapGuard {
    pub fn new(store: Arc<dyn ReservationStore>) -> Self {
        Self { store }
    }

    /// Whether `candidate` collides with any stay on `unit_id` other than
    /// `exclude_id`. Takes no lock; the answer may be stale by the time a
    /// write happens.
    pub async fn check_conflict(
        &self,
        unit_id: DbId,
        candidate: &StayWindow,
        exclude_id: Option<DbId>,
    ) -> Result<bool, CoreError> {
        let booked = self.store.booked_windows(unit_id, exclude_id).await?;
        Ok(find_conflict(&booked, candidate, exclude_id).is_some())
    }

    /// Reject `candidate` with the overlap conflict if it collides with a
    /// stay already visible to `section`.
    pub async fn ensure_free(
        section: &mut dyn UnitWrite,
        candidate: &StayWindow,
        exclude_id: Option<DbId>,
    ) -> Result<(), CoreError> {
        let booked = section.booked_windows(exclude_id).await?;
        if let Some(hit) = find_conflict(&booked, candidate, exclude_id) {
            tracing::debug!(
                unit_id = section.unit_id(),
                conflicting_id = hit.reservation_id,
                start_date = %candidate.start(),
                end_date = %candidate.end(),
                "Rejected overlapping reservation",
            );
            return Err(overlap_conflict());
        }
        Ok(())
    }
}
