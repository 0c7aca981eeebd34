//! Handlers for the `/units` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use staybook_core::types::DbId;
use staybook_db::models::unit::{CreateUnit, Unit};

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/units
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateUnit>,
) -> AppResult<(StatusCode, Json<DataResponse<Unit>>)> {
    input.validate()?;
    let unit = state.units.create_unit(&input).await?;
    tracing::info!(unit_id = unit.id, "Unit created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: unit })))
}

/// GET /api/v1/units
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Unit>>>> {
    let units = state.units.list_units().await?;
    Ok(Json(DataResponse { data: units }))
}

/// GET /api/v1/units/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Unit>>> {
    let unit = state
        .units
        .find_unit(id)
        .await?
        .ok_or(AppError::not_found("Unit", id))?;
    Ok(Json(DataResponse { data: unit }))
}
