//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Use [`DataResponse`]
//! instead of ad-hoc `serde_json::json!({ "data": ... })` to get
//! compile-time type safety and consistent serialization.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(DataResponse { data: reservations }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Payload of `POST /units/{unit_id}/availability/bulk`.
#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

/// Payload of `DELETE /units/{unit_id}/availability/{date}`.
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

/// Payload of `GET /units/{unit_id}/reservations/conflicts`.
#[derive(Debug, Serialize)]
pub struct ConflictResponse {
    pub conflict: bool,
}
