use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DonationError {
    #[error("{0}")]
    Validation(String),

    #[error("PayPal credentials not set on server")]
    CredentialsMissing,

    #[error("PayPal token error ({status}): {body}")]
    UpstreamAuth { status: u16, body: String },

    #[error("Could not create order")]
    UpstreamOrder { details: serde_json::Value },

    #[error("Capture failed")]
    UpstreamCapture { details: serde_json::Value },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Store error: {0}")]
    Store(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl DonationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DonationError::Validation(_) => StatusCode::BAD_REQUEST,
            DonationError::UpstreamAuth { .. }
            | DonationError::UpstreamOrder { .. }
            | DonationError::UpstreamCapture { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            DonationError::Validation(_) => "VALIDATION_ERROR",
            DonationError::CredentialsMissing => "CREDENTIALS_MISSING",
            DonationError::UpstreamAuth { .. } => "UPSTREAM_AUTH_ERROR",
            DonationError::UpstreamOrder { .. } => "UPSTREAM_ORDER_ERROR",
            DonationError::UpstreamCapture { .. } => "UPSTREAM_CAPTURE_ERROR",
            _ => "INTERNAL_ERROR",
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            DonationError::UpstreamOrder { details } | DonationError::UpstreamCapture { details } => {
                Some(details.clone())
            }
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    pub timestamp: chrono::DateTime<Utc>,
    pub request_id: String,
}

impl IntoResponse for DonationError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            error_code: error_code.to_string(),
            details: self.details(),
            timestamp: Utc::now(),
            request_id: Uuid::new_v4().to_string(),
        };

        if status.is_client_error() {
            tracing::warn!(error = %self, error_code = error_code, "Request rejected");
        } else {
            tracing::error!(error = ?self, error_code = error_code, "Request failed");
        }

        (status, Json(body)).into_response()
    }
}
