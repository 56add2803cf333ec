use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use verdant_core::service::SubmitError;

/// HTTP-facing error for all routes. Client-correctable failures map to 400,
/// everything else to 500; the body is always `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error("Missing user_id")]
    MissingUserId,

    #[error("Unknown domain `{0}`")]
    UnknownDomain(String),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Submit(SubmitError::MalformedRequest(_))
            | ApiError::Submit(SubmitError::MissingFields)
            | ApiError::Submit(SubmitError::UnknownCategory(_))
            | ApiError::MissingUserId
            | ApiError::UnknownDomain(_) => StatusCode::BAD_REQUEST,
            ApiError::Submit(SubmitError::NotConfigured)
            | ApiError::Submit(SubmitError::Persistence(_))
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(source = ?self, "request failed");
        }

        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use verdant_core::service::SubmitError;

    use super::ApiError;

    fn malformed() -> SubmitError {
        SubmitError::MalformedRequest(serde_json::from_str::<serde_json::Value>("{").unwrap_err())
    }

    #[test]
    fn client_errors_map_to_bad_request() {
        for error in [
            ApiError::Submit(malformed()),
            ApiError::Submit(SubmitError::MissingFields),
            ApiError::Submit(SubmitError::UnknownCategory("plutonium".to_owned())),
            ApiError::MissingUserId,
            ApiError::UnknownDomain("soil".to_owned()),
        ] {
            assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn infrastructure_errors_map_to_internal() {
        for error in [
            ApiError::Submit(SubmitError::NotConfigured),
            ApiError::Submit(SubmitError::Persistence(anyhow::anyhow!("down"))),
            ApiError::Internal(anyhow::anyhow!("down")),
        ] {
            assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn validation_message_matches_contract() {
        assert_eq!(
            ApiError::Submit(SubmitError::MissingFields).to_string(),
            "Missing category, entry, or user_id"
        );
    }
}
