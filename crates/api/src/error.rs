use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use sitesentry_common::TelemetryError;
use sitesentry_tracking::contact::FieldError;

/// HTTP-facing error. Internal detail is logged at the construction site
/// and never echoed to the client; the contact path is the one exception
/// where field-level validation detail goes back to the submitter.
#[derive(Debug)]
pub enum ApiError {
    /// 400 with a generic body (tracking endpoints).
    Validation,
    /// 400 with per-field details (contact form only).
    ContactValidation(Vec<FieldError>),
    /// 429.
    RateLimited,
    /// 401 (admin stats).
    Unauthorized,
    /// 500 with a path-appropriate generic message.
    Internal { message: &'static str },
}

impl ApiError {
    /// Map a pipeline failure on a tracking endpoint, logging the detail.
    pub fn tracking(err: TelemetryError) -> Self {
        match err {
            TelemetryError::Validation(detail) => {
                tracing::debug!(detail = %detail, "rejected tracking payload");
                ApiError::Validation
            }
            other => {
                tracing::error!(error = %other, "tracking ingestion failed");
                ApiError::Internal {
                    message: "Tracking failed",
                }
            }
        }
    }

    /// Map a contact-path failure (delivery or storage), logging the detail.
    pub fn contact(err: TelemetryError) -> Self {
        tracing::error!(error = %err, "contact submission failed");
        ApiError::Internal {
            message: "Failed to send email. Please try again later.",
        }
    }

    /// Map a dashboard query failure, logging the detail.
    pub fn stats(err: TelemetryError) -> Self {
        tracing::error!(error = %err, "stats aggregation failed");
        ApiError::Internal {
            message: "Failed to fetch stats",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid request" })),
            )
                .into_response(),
            ApiError::ContactValidation(details) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid form data", "details": details })),
            )
                .into_response(),
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({ "error": "Too many requests. Please try again later." })),
            )
                .into_response(),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Unauthorized" })),
            )
                .into_response(),
            ApiError::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": message })),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(
            ApiError::Validation.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::RateLimited.into_response().status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ApiError::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Internal { message: "Tracking failed" }
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn storage_detail_never_reaches_the_body() {
        let err = ApiError::tracking(TelemetryError::Storage(
            "unable to open database file /var/lib/secret.sqlite3".to_string(),
        ));
        match err {
            ApiError::Internal { message } => assert_eq!(message, "Tracking failed"),
            other => panic!("expected Internal, got {:?}", other),
        }
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let err = ApiError::tracking(TelemetryError::validation("sessionId must not be empty"));
        assert!(matches!(err, ApiError::Validation));
    }
}
