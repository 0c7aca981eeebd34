//! Handlers for reservations and the unit-scoped reservation views.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use staybook_core::booking::{CreateReservationRequest, UpdateReservationRequest};
use staybook_core::types::DbId;
use staybook_db::models::reservation::Reservation;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::query::{ConflictParams, DateRangeParams};
use crate::response::{ConflictResponse, DataResponse};
use crate::state::AppState;

/// POST /api/v1/reservations
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Reservation>>)> {
    let reservation = state.reservations.create(input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: reservation })))
}

/// GET /api/v1/reservations/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Reservation>>> {
    let reservation = state.reservations.get(id).await?;
    Ok(Json(DataResponse { data: reservation }))
}

/// PUT|PATCH /api/v1/reservations/{id}
///
/// Both verbs accept a partial body; absent fields keep their stored value.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateReservationRequest>,
) -> AppResult<Json<DataResponse<Reservation>>> {
    let reservation = state.reservations.update(id, input).await?;
    Ok(Json(DataResponse { data: reservation }))
}

/// DELETE /api/v1/reservations/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    state.reservations.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/units/{unit_id}/reservations
pub async fn list_by_unit(
    State(state): State<AppState>,
    Path(unit_id): Path<DbId>,
    Query(params): Query<DateRangeParams>,
) -> AppResult<Json<DataResponse<Vec<Reservation>>>> {
    let days = params.optional()?;
    let reservations = state.reservations.list_for_unit(unit_id, days).await?;
    Ok(Json(DataResponse { data: reservations }))
}

/// GET /api/v1/units/{unit_id}/reservations/conflicts
pub async fn check_conflict(
    State(state): State<AppState>,
    Path(unit_id): Path<DbId>,
    Query(params): Query<ConflictParams>,
) -> AppResult<Json<DataResponse<ConflictResponse>>> {
    let window = params.window()?;
    let conflict = state
        .reservations
        .check_conflict(unit_id, &window, params.exclude_id)
        .await?;
    Ok(Json(DataResponse {
        data: ConflictResponse { conflict },
    }))
}
