//! JSON body extractor that reports malformed bodies in the API's error
//! envelope instead of axum's plain-text rejection.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use staybook_core::error::{CoreError, FieldErrors};

use crate::error::AppError;

/// Drop-in replacement for [`axum::Json`] in handler arguments.
///
/// A body that is not JSON at all is a 400 `BAD_REQUEST`. A well-formed body
/// with a missing or mistyped field is a 422 `VALIDATION_ERROR` keyed by the
/// offending field:
///
/// ```ignore
/// pub async fn create(AppJson(input): AppJson<CreateUnit>) -> AppResult<..> { .. }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<serde_json::Value>::from_request(req, state).await?;
        serde_path_to_error::deserialize(value)
            .map(AppJson)
            .map_err(|err| AppError::Core(CoreError::Validation(body_field_errors(&err))))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Key a deserialization failure by the field it concerns.
fn body_field_errors(err: &serde_path_to_error::Error<serde_json::Error>) -> FieldErrors {
    let message = err.inner().to_string();
    if let Some(field) = missing_field(&message) {
        return FieldErrors::single(field, format!("{field} is required"));
    }

    let path = err.path().to_string();
    let field = if path.is_empty() || path == "." {
        "body".to_string()
    } else {
        path
    };
    let message = format!("{field} is invalid: {message}");
    FieldErrors::single(field, message)
}

/// Field name out of serde's `missing field `name`` message.
fn missing_field(message: &str) -> Option<&str> {
    message
        .strip_prefix("missing field `")?
        .split('`')
        .next()
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Body {
        start_date: chrono::NaiveDate,
        end_date: chrono::NaiveDate,
        count: Option<i32>,
    }

    fn errors_for(value: serde_json::Value) -> FieldErrors {
        let err = serde_path_to_error::deserialize::<_, Body>(value).unwrap_err();
        body_field_errors(&err)
    }

    #[test]
    fn missing_field_is_keyed_by_name() {
        let errors = errors_for(serde_json::json!({ "start_date": "2030-01-01" }));
        assert_eq!(
            errors.get("end_date"),
            Some(&["end_date is required".to_string()][..])
        );
    }

    #[test]
    fn mistyped_field_is_keyed_by_path() {
        let errors = errors_for(serde_json::json!({
            "start_date": "not a date",
            "end_date": "2030-01-02",
        }));
        assert!(errors.get("start_date").is_some());
    }

    #[test]
    fn non_object_body_is_keyed_as_body() {
        let errors = errors_for(serde_json::json!("just text"));
        assert!(errors.get("body").is_some());
    }

    #[test]
    fn missing_field_parses_serde_message() {
        assert_eq!(missing_field("missing field `unit_id`"), Some("unit_id"));
        assert_eq!(missing_field("invalid type: string"), None);
    }
}
