use std::sync::Arc;

use staybook_db::memory::MemoryStore;
use staybook_db::postgres::PgStore;
use staybook_db::store::{AvailabilityStore, ReservationStore, UnitStore};
use staybook_db::DbPool;

use crate::config::{ServerConfig, StorageBackend};
use crate::services::{AvailabilityCalendar, ReservationService};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    pub units: Arc<dyn UnitStore>,
    pub reservations: ReservationService,
    pub calendar: AvailabilityCalendar,
    /// Set for the PostgreSQL backend; pinged by `/health`.
    pub pool: Option<DbPool>,
}

impl AppState {
    /// State backed by PostgreSQL.
    pub fn postgres(config: ServerConfig, pool: DbPool) -> Self {
        Self::from_store(config, PgStore::new(pool.clone()), Some(pool))
    }

    /// State backed by an in-process store.
    pub fn memory(config: ServerConfig, store: MemoryStore) -> Self {
        Self::from_store(config, store, None)
    }

    fn from_store<S>(config: ServerConfig, store: S, pool: Option<DbPool>) -> Self
    where
        S: UnitStore + ReservationStore + AvailabilityStore + 'static,
    {
        let store = Arc::new(store);
        let units: Arc<dyn UnitStore> = store.clone();
        let reservations: Arc<dyn ReservationStore> = store.clone();
        let availability: Arc<dyn AvailabilityStore> = store;

        Self {
            config: Arc::new(config),
            reservations: ReservationService::new(reservations, Arc::clone(&units)),
            calendar: AvailabilityCalendar::new(availability, Arc::clone(&units)),
            units,
            pool,
        }
    }

    pub fn storage(&self) -> StorageBackend {
        if self.pool.is_some() {
            StorageBackend::Postgres
        } else {
            StorageBackend::Memory
        }
    }
}
