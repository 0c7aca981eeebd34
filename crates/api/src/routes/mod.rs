pub mod health;
pub mod reservations;
pub mod units;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /units                                              list, create
/// /units/{id}                                         get
/// /units/{unit_id}/reservations                       list (?start_date&end_date)
/// /units/{unit_id}/reservations/conflicts             overlap probe
/// /units/{unit_id}/availability                       get range, set day
/// /units/{unit_id}/availability/bulk                  set range (POST)
/// /units/{unit_id}/availability/{date}                clear day (DELETE)
///
/// /reservations                                       create
/// /reservations/{id}                                  get, update (PUT/PATCH), delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/units", units::router())
        .nest("/reservations", reservations::router())
}
