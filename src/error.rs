use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;

/// JSON error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
}

/// Application errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Upload is not a well-formed report
    #[error("Malformed report: {0}")]
    MalformedReport(String),

    /// Requested logical destination is not in the registry
    #[error("Destination unknown: {0}")]
    UnknownDestination(String),

    /// Messaging provider could not be reached or rejected the startup calls
    #[error("Messaging provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable token used in `reason=` log fields
    pub fn reason(&self) -> &'static str {
        match self {
            AppError::MalformedReport(_) => "malformed_report",
            AppError::UnknownDestination(_) => "unknown_destination",
            AppError::ProviderUnavailable(_) => "provider_unavailable",
            AppError::DeliveryFailed(_) => "delivery_failed",
            AppError::Validation(_) | AppError::PayloadTooLarge(_) => "upload_rejected",
            AppError::Internal(_) => "queue_closed",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MalformedReport(_) => StatusCode::BAD_REQUEST,
            AppError::UnknownDestination(_) => StatusCode::NOT_FOUND,
            AppError::ProviderUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::DeliveryFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error_type = match self {
            AppError::MalformedReport(_) => "MalformedReport",
            AppError::UnknownDestination(_) => "UnknownDestination",
            AppError::ProviderUnavailable(_) => "ProviderUnavailable",
            AppError::DeliveryFailed(_) => "DeliveryFailed",
            AppError::Validation(_) => "ValidationError",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::Internal(_) => "InternalError",
        };

        let response = ErrorResponse {
            error: ErrorDetail {
                error_type: error_type.to_string(),
                message: self.to_string(),
            },
        };

        HttpResponse::build(self.status_code()).json(response)
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
