//! Route definitions for the `/units` resource.
//!
//! Also nests the unit-scoped reservation and availability routes under
//! `/units/{unit_id}/...`.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{availability, reservations, units};
use crate::state::AppState;

/// Routes mounted at `/units`.
///
/// ```text
/// GET    /                                       -> list
/// POST   /                                       -> create
/// GET    /{id}                                   -> get_by_id
///
/// GET    /{unit_id}/reservations                 -> list_by_unit
/// GET    /{unit_id}/reservations/conflicts       -> check_conflict
///
/// GET    /{unit_id}/availability                 -> get_range
/// POST   /{unit_id}/availability                 -> set_day
/// POST   /{unit_id}/availability/bulk            -> set_range
/// DELETE /{unit_id}/availability/{date}          -> delete_day
/// ```
pub fn router() -> Router<AppState> {
    let reservation_routes = Router::new()
        .route("/", get(reservations::list_by_unit))
        .route("/conflicts", get(reservations::check_conflict));

    let availability_routes = Router::new()
        .route(
            "/",
            get(availability::get_range).post(availability::set_day),
        )
        .route("/bulk", post(availability::set_range))
        .route("/{date}", delete(availability::delete_day));

    Router::new()
        .route("/", get(units::list).post(units::create))
        .route("/{id}", get(units::get_by_id))
        .nest("/{unit_id}/reservations", reservation_routes)
        .nest("/{unit_id}/availability", availability_routes)
}
