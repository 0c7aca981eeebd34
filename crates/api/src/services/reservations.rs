//! Reservation create/update/delete flows.

use std::sync::Arc;

use chrono::Utc;
use staybook_core::booking::{
    generate_reference, CreateReservationRequest, UpdateReservationRequest,
};
use staybook_core::day_range::DayRange;
use staybook_core::error::CoreError;
use staybook_core::stay::StayWindow;
use staybook_core::types::{Day, DbId};
use staybook_db::models::reservation::Reservation;
use staybook_db::store::{ReservationStore, UnitStore, UnitWrite};

use super::overlap_guard::ReservationOverlapGuard;

const RESERVATION: &str = "Reservation";
const UNIT: &str = "Unit";

/// Re-locks allowed when a reservation changes unit under a pending update.
const MAX_SECTION_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct ReservationService {
    store: Arc<dyn ReservationStore>,
    units: Arc<dyn UnitStore>,
    guard: ReservationOverlapGuard,
}

impl ReservationService {
    pub fn new(store: Arc<dyn ReservationStore>, units: Arc<dyn UnitStore>) -> Self {
        let guard = ReservationOverlapGuard::new(Arc::clone(&store));
        Self {
            store,
            units,
            guard,
        }
    }

    pub fn guard(&self) -> &ReservationOverlapGuard {
        &self.guard
    }

    /// Create a reservation, with "today" taken from the UTC clock.
    pub async fn create(&self, request: CreateReservationRequest) -> Result<Reservation, CoreError> {
        self.create_as_of(request, Utc::now().date_naive()).await
    }

    /// Create a reservation as if the current date were `today`.
    pub async fn create_as_of(
        &self,
        request: CreateReservationRequest,
        today: Day,
    ) -> Result<Reservation, CoreError> {
        let new = request.into_new_reservation(today)?;
        let mut section = self.open_section(new.unit_id).await?;

        ReservationOverlapGuard::ensure_free(section.as_mut(), &new.window, None).await?;
        let reference = generate_reference();
        let row = section.insert(&new, &reference).await?;
        section.commit().await?;

        tracing::info!(
            reservation_id = row.id,
            unit_id = row.unit_id,
            reference = %row.reference,
            is_blocked = row.is_blocked,
            "Reservation created",
        );
        Ok(row)
    }

    /// Apply a partial update. The overlap check runs only when the patch
    /// names `unit_id`, `start_date` or `end_date`.
    ///
    /// The stored row is re-read inside the write section, so the merge never
    /// lands on a copy a concurrent writer has since moved.
    pub async fn update(
        &self,
        id: DbId,
        patch: UpdateReservationRequest,
    ) -> Result<Reservation, CoreError> {
        let touches_window = patch.touches_window();
        let mut unit_id = match patch.unit_id {
            Some(unit_id) => unit_id,
            None => self.get(id).await?.unit_id,
        };

        for _ in 0..MAX_SECTION_ATTEMPTS {
            let mut section = self.open_section(unit_id).await?;
            let current = section.find(id).await?.ok_or(CoreError::NotFound {
                entity: RESERVATION,
                id,
            })?;
            let merged = patch.clone().apply_to(current.snapshot()?)?;
            if merged.unit_id != section.unit_id() {
                // Moved to another unit since it was looked up; lock that one.
                unit_id = merged.unit_id;
                continue;
            }

            if touches_window {
                ReservationOverlapGuard::ensure_free(section.as_mut(), &merged.window, Some(id))
                    .await?;
            }
            let row = section
                .update(id, &merged)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: RESERVATION,
                    id,
                })?;
            section.commit().await?;

            tracing::info!(
                reservation_id = row.id,
                unit_id = row.unit_id,
                rechecked = touches_window,
                "Reservation updated",
            );
            return Ok(row);
        }

        Err(CoreError::Internal(format!(
            "reservation {id} kept moving between units during update"
        )))
    }

    pub async fn get(&self, id: DbId) -> Result<Reservation, CoreError> {
        self.store
            .find_reservation(id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: RESERVATION,
                id,
            })
    }

    pub async fn delete(&self, id: DbId) -> Result<(), CoreError> {
        if !self.store.delete_reservation(id).await? {
            return Err(CoreError::NotFound {
                entity: RESERVATION,
                id,
            });
        }
        tracing::info!(reservation_id = id, "Reservation deleted");
        Ok(())
    }

    /// Reservations of a unit by `start_date`, optionally only those touching `days`.
    pub async fn list_for_unit(
        &self,
        unit_id: DbId,
        days: Option<DayRange>,
    ) -> Result<Vec<Reservation>, CoreError> {
        self.ensure_unit(unit_id).await?;
        Ok(self.store.list_reservations(unit_id, days).await?)
    }

    /// Read-only overlap probe for a unit that must exist.
    pub async fn check_conflict(
        &self,
        unit_id: DbId,
        candidate: &StayWindow,
        exclude_id: Option<DbId>,
    ) -> Result<bool, CoreError> {
        self.ensure_unit(unit_id).await?;
        self.guard
            .check_conflict(unit_id, candidate, exclude_id)
            .await
    }

    /// A reservation body naming a missing unit is a validation error on `unit_id`.
    async fn open_section(&self, unit_id: DbId) -> Result<Box<dyn UnitWrite>, CoreError> {
        self.store
            .begin_unit_write(unit_id)
            .await?
            .ok_or_else(|| CoreError::invalid("unit_id", "unit_id does not reference an existing unit"))
    }

    async fn ensure_unit(&self, unit_id: DbId) -> Result<(), CoreError> {
        if self.units.unit_exists(unit_id).await? {
            Ok(())
        } else {
            Err(CoreError::NotFound {
                entity: UNIT,
                id: unit_id,
            })
        }
    }
}
