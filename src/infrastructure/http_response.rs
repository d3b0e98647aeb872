// HTTP error mapping for API handlers
use crate::application::error::CoreError;
use crate::domain::rover::PatchError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    InvalidPatch(#[from] PatchError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(CoreError::ThreatNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::InvalidPatch(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn public_message(&self) -> String {
        match self {
            ApiError::Core(CoreError::ThreatNotFound(_)) => "Threat not found".to_string(),
            ApiError::InvalidPatch(e) => e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(status = %status, error = %self, "Request failed");
        let body = json!({
            "success": false,
            "error": self.public_message(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_status_codes() {
        let not_found = ApiError::from(CoreError::ThreatNotFound(Uuid::new_v4()));
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.public_message(), "Threat not found");

        let invalid = ApiError::from(PatchError::NegativeDistance(-2.0));
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
