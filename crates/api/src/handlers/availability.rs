//! Handlers for `/units/{unit_id}/availability`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use staybook_core::availability::{SetDayRequest, SetRangeRequest};
use staybook_core::types::{Day, DbId};
use staybook_db::models::availability::AvailabilityOverride;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::query::DateRangeParams;
use crate::response::{CountResponse, DataResponse, DeletedResponse};
use crate::state::AppState;

/// GET /api/v1/units/{unit_id}/availability?start_date=&end_date=
pub async fn get_range(
    State(state): State<AppState>,
    Path(unit_id): Path<DbId>,
    Query(params): Query<DateRangeParams>,
) -> AppResult<Json<DataResponse<Vec<AvailabilityOverride>>>> {
    let days = params.require()?;
    let overrides = state.calendar.get_range(unit_id, days).await?;
    Ok(Json(DataResponse { data: overrides }))
}

/// POST /api/v1/units/{unit_id}/availability
pub async fn set_day(
    State(state): State<AppState>,
    Path(unit_id): Path<DbId>,
    AppJson(input): AppJson<SetDayRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<AvailabilityOverride>>)> {
    let row = state.calendar.set_day(unit_id, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: row })))
}

/// POST /api/v1/units/{unit_id}/availability/bulk
pub async fn set_range(
    State(state): State<AppState>,
    Path(unit_id): Path<DbId>,
    AppJson(input): AppJson<SetRangeRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<CountResponse>>)> {
    let count = state.calendar.set_range(unit_id, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CountResponse { count },
        }),
    ))
}

/// DELETE /api/v1/units/{unit_id}/availability/{date}
pub async fn delete_day(
    State(state): State<AppState>,
    Path((unit_id, date)): Path<(DbId, Day)>,
) -> AppResult<Json<DataResponse<DeletedResponse>>> {
    let deleted = state.calendar.delete_day(unit_id, date).await?;
    Ok(Json(DataResponse {
        data: DeletedResponse { deleted },
    }))
}
