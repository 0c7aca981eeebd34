//! Per-day availability overrides for a unit.

use std::sync::Arc;

use staybook_core::availability::{SetDayRequest, SetRangeRequest};
use staybook_core::day_range::DayRange;
use staybook_core::error::CoreError;
use staybook_core::types::{Day, DbId};
use staybook_db::models::availability::AvailabilityOverride;
use staybook_db::store::{AvailabilityStore, UnitStore};

#[derive(Clone)]
pub struct AvailabilityCalendar {
    store: Arc<dyn AvailabilityStore>,
    units: Arc<dyn UnitStore>,
}

impl AvailabilityCalendar {
    pub fn new(store: Arc<dyn AvailabilityStore>, units: Arc<dyn UnitStore>) -> Self {
        Self { store, units }
    }

    /// Overrides stored for days in `days`. Days without a row are not
    /// synthesized; they are available at the unit's price.
    pub async fn get_range(
        &self,
        unit_id: DbId,
        days: DayRange,
    ) -> Result<Vec<AvailabilityOverride>, CoreError> {
        self.ensure_unit(unit_id).await?;
        Ok(self.store.list_overrides(unit_id, days).await?)
    }

    /// Insert or overwrite the override for one day.
    pub async fn set_day(
        &self,
        unit_id: DbId,
        request: SetDayRequest,
    ) -> Result<AvailabilityOverride, CoreError> {
        request.setting.check().into_result()?;
        self.ensure_unit(unit_id).await?;

        let row = self
            .store
            .upsert_override(unit_id, request.date, &request.setting)
            .await?;
        tracing::info!(
            unit_id,
            date = %row.date,
            is_available = row.is_available,
            "Availability day set",
        );
        Ok(row)
    }

    /// Replace every override in `[start_date, end_date]` at once.
    ///
    /// Returns the number of days written. On failure no day in the range
    /// has changed.
    pub async fn set_range(&self, unit_id: DbId, request: SetRangeRequest) -> Result<u64, CoreError> {
        let mut errors = request.setting.check();
        let days = match DayRange::new_bulk(request.start_date, request.end_date) {
            Ok(days) => Some(days),
            Err(CoreError::Validation(e)) => {
                errors.merge(e);
                None
            }
            Err(other) => return Err(other),
        };
        let days = match days {
            Some(days) if errors.is_empty() => days,
            _ => return Err(CoreError::Validation(errors)),
        };
        self.ensure_unit(unit_id).await?;

        let count = self
            .store
            .replace_range(unit_id, days, &request.setting)
            .await?;
        tracing::info!(
            unit_id,
            start_date = %days.start(),
            end_date = %days.end(),
            count,
            "Availability range replaced",
        );
        Ok(count)
    }

    /// Remove one day's override. Returns whether a row existed; a missing
    /// row is not an error.
    pub async fn delete_day(&self, unit_id: DbId, date: Day) -> Result<bool, CoreError> {
        self.ensure_unit(unit_id).await?;
        let deleted = self.store.delete_override(unit_id, date).await?;
        tracing::info!(unit_id, %date, deleted, "Availability day cleared");
        Ok(deleted)
    }

    async fn ensure_unit(&self, unit_id: DbId) -> Result<(), CoreError> {
        if self.units.unit_exists(unit_id).await? {
            Ok(())
        } else {
            Err(CoreError::NotFound {
                entity: "Unit",
                id: unit_id,
            })
        }
    }
}
