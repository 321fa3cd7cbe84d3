//! HTTP mapping for core errors
//!
//! Every error leaves the API as `{"error": message, "status": code}`;
//! field errors also carry `valid_fields` and, when one is known, a
//! `suggestion`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::core::error::FurqanError;

/// Map a core error to its HTTP status code
pub fn status_code(err: &FurqanError) -> StatusCode {
    match err {
        FurqanError::NotFound(_) => StatusCode::NOT_FOUND,
        FurqanError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
        e if e.is_bad_request() => StatusCode::BAD_REQUEST,
        e if e.is_conflict() => StatusCode::CONFLICT,
        e if e.is_unavailable() => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Implement IntoResponse for automatic error conversion in Axum
impl IntoResponse for FurqanError {
    fn into_response(self) -> Response {
        let status = status_code(&self);
        if status.is_server_error() && status != StatusCode::SERVICE_UNAVAILABLE {
            error!(error = %self, "Request failed with an internal error");
        }

        let mut body = json!({
            "error": self.message(),
            "status": status.as_u16(),
        });
        if let FurqanError::InvalidQueryField {
            valid_fields,
            suggestion,
            ..
        } = self
        {
            body["valid_fields"] = json!(valid_fields);
            if let Some(suggestion) = suggestion {
                body["suggestion"] = json!(suggestion);
            }
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        let err = FurqanError::NotFound("part 31".to_string());
        assert_eq!(status_code(&err), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_protected_reference_status() {
        let err = FurqanError::ProtectedReference {
            entity: "part",
            number: 1,
            references: 148,
        };
        assert_eq!(status_code(&err), StatusCode::CONFLICT);
    }

    #[test]
    fn test_invalid_query_status() {
        let err = FurqanError::InvalidQuery("empty".to_string());
        assert_eq!(status_code(&err), StatusCode::BAD_REQUEST);
        let err = FurqanError::InvalidCursor("bad encoding".to_string());
        assert_eq!(status_code(&err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unavailable_and_internal_status() {
        let err = FurqanError::IndexUnavailable("building".to_string());
        assert_eq!(status_code(&err), StatusCode::SERVICE_UNAVAILABLE);

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        assert_eq!(
            status_code(&FurqanError::from(io_err)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_method_not_allowed_status() {
        let err = FurqanError::MethodNotAllowed("POST".to_string());
        assert_eq!(status_code(&err), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn test_field_error_response() {
        let err = FurqanError::InvalidQueryField {
            field: "surah".to_string(),
            message: "cannot order by this field".to_string(),
            valid_fields: vec!["chapter".to_string(), "number".to_string()],
            suggestion: Some("chapter".to_string()),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
