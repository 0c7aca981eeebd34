//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no router needed.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use staybook_api::error::AppError;
use staybook_core::error::{CoreError, FieldErrors, StoreError};
use staybook_core::stay::overlap_conflict;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// Test: CoreError::NotFound maps to 404 with NOT_FOUND code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_error_returns_404() {
    let (status, json) = error_to_response(AppError::not_found("Reservation", 42)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Reservation with id 42 not found");
    assert!(json.get("errors").is_none());
}

// ---------------------------------------------------------------------------
// Test: validation errors are 422 with a field-keyed `errors` object
// ---------------------------------------------------------------------------

#[tokio::test]
async fn validation_error_returns_422_with_field_map() {
    let mut errors = FieldErrors::single("guest_name", "guest_name is required unless the reservation is blocked");
    errors.add("end_date", "end_date must be on or after start_date");
    let err = AppError::Core(CoreError::Validation(errors));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(
        json["errors"]["guest_name"][0],
        "guest_name is required unless the reservation is blocked"
    );
    assert_eq!(json["errors"]["end_date"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Test: the overlap conflict is 422 keyed on start_date
// ---------------------------------------------------------------------------

#[tokio::test]
async fn overlap_conflict_returns_422_on_start_date() {
    let (status, json) = error_to_response(AppError::Core(overlap_conflict())).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(
        json["errors"]["start_date"],
        serde_json::json!(["these dates overlap with an existing reservation"])
    );
}

// ---------------------------------------------------------------------------
// Test: unique violations map to 409
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unique_violation_returns_409() {
    let err = AppError::from(StoreError::UniqueViolation {
        constraint: "uq_reservations_reference".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "DUPLICATE");
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("uq_reservations_reference"));
}

// ---------------------------------------------------------------------------
// Test: backend failures are 500 with a sanitized message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn store_backend_error_returns_500_and_sanitizes_message() {
    let err = AppError::from(StoreError::backend("connection to 10.0.0.5 refused"));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn internal_error_returns_500_and_sanitizes_message() {
    let err = AppError::InternalError("secret database credentials leaked".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn bad_request_error_returns_400() {
    let (status, json) = error_to_response(AppError::BadRequest("bad date".into())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "bad date");
}
