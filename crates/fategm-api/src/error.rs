//! Fate GM Helper — API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fategm_core::error::DomainError;
use serde::Serialize;

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
    /// The offending request field, for validation errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
}

/// HTTP-layer wrapper around `DomainError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, field) = match &self.0 {
            DomainError::CampaignNotFound(_) => {
                (StatusCode::NOT_FOUND, "campaign_not_found", None)
            }
            DomainError::InvalidState(_) => (StatusCode::BAD_REQUEST, "invalid_state", None),
            DomainError::Validation { field, .. } => {
                (StatusCode::BAD_REQUEST, "validation_error", Some(*field))
            }
            DomainError::Conflict(_) => (StatusCode::CONFLICT, "conflict", None),
            DomainError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error", None)
            }
        };

        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
            field,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use uuid::Uuid;

    fn status_of(err: DomainError) -> StatusCode {
        let response = ApiError(err).into_response();
        response.status()
    }

    #[test]
    fn test_campaign_not_found_maps_to_404() {
        let id = Uuid::new_v4();
        assert_eq!(
            status_of(DomainError::CampaignNotFound(id)),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_invalid_state_maps_to_400() {
        assert_eq!(
            status_of(DomainError::InvalidState("no open round".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_validation_maps_to_400() {
        assert_eq!(
            status_of(DomainError::validation("content", "must not be empty")),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_conflict_maps_to_409() {
        assert_eq!(
            status_of(DomainError::Conflict("lost the race".into())),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_infrastructure_maps_to_500() {
        assert_eq!(
            status_of(DomainError::Infrastructure("db down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
