//! Centralized error types for the Embercast core library.
//!
//! Protocol layers define their own error enums (`SoapError`, `GenaError`,
//! `MediaError`); this module folds them into a crate-wide [`EmbercastError`]
//! with machine-readable codes and HTTP status mapping for the callback API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::media::MediaError;
use crate::renderer::gena::GenaError;
use crate::renderer::soap::SoapError;

/// Trait for error types that provide machine-readable error codes.
pub trait ErrorCode {
    /// Returns a machine-readable error code for API responses.
    fn code(&self) -> &'static str;
}

impl ErrorCode for SoapError {
    fn code(&self) -> &'static str {
        match self {
            Self::Http(_) => "http_request_failed",
            Self::HttpStatus(_, _) => "http_error_status",
            Self::Fault(_) => "soap_fault",
            Self::Parse => "soap_parse_error",
        }
    }
}

impl ErrorCode for GenaError {
    fn code(&self) -> &'static str {
        match self {
            Self::Http(_) => "http_request_failed",
            Self::SubscriptionFailed(_) => "gena_subscription_failed",
            Self::RenewalFailed(_) => "gena_renewal_failed",
            Self::MissingSid => "gena_missing_sid",
        }
    }
}

impl ErrorCode for MediaError {
    fn code(&self) -> &'static str {
        match self {
            Self::Http(_) => "http_request_failed",
            Self::Status(_) => "media_service_error",
            Self::Unavailable(_) => "media_unavailable",
        }
    }
}

/// Application-wide error type for the Embercast bridge.
#[derive(Debug, Error)]
pub enum EmbercastError {
    /// SOAP request to the renderer failed.
    #[error("SOAP request failed: {0}")]
    Soap(String),

    /// GENA subscription operation failed.
    #[error("GENA operation failed: {0}")]
    Gena(String),

    /// Media resolution or metadata lookup failed.
    #[error("Media resolution failed: {0}")]
    Media(String),

    /// Client sent an invalid or malformed request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Network-related error (IP detection, bind failures).
    #[error("Network error: {0}")]
    Network(String),

    /// Server configuration error (missing required settings).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EmbercastError {
    /// Returns a machine-readable error code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Soap(_) => "soap_error",
            Self::Gena(_) => "gena_error",
            Self::Media(_) => "media_error",
            Self::InvalidRequest(_) => "invalid_request",
            Self::Network(_) => "network_error",
            Self::Configuration(_) => "configuration_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Maps the error to an appropriate HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convenient Result alias for application-wide operations.
pub type EmbercastResult<T> = Result<T, EmbercastError>;

/// JSON response body for error responses.
#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
    status: u16,
}

impl IntoResponse for EmbercastError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.code(),
            message: self.to_string(),
            status: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<SoapError> for EmbercastError {
    fn from(err: SoapError) -> Self {
        Self::Soap(err.to_string())
    }
}

impl From<GenaError> for EmbercastError {
    fn from(err: GenaError) -> Self {
        Self::Gena(err.to_string())
    }
}

impl From<MediaError> for EmbercastError {
    fn from(err: MediaError) -> Self {
        Self::Media(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_request_maps_to_bad_request() {
        let err = EmbercastError::InvalidRequest("missing SID".into());
        assert_eq!(err.code(), "invalid_request");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn soap_error_converts_with_code() {
        let err: EmbercastError = SoapError::Fault("702".into()).into();
        assert_eq!(err.code(), "soap_error");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn media_error_codes() {
        assert_eq!(MediaError::Unavailable("abc".into()).code(), "media_unavailable");
        assert_eq!(MediaError::Status(502).code(), "media_service_error");
    }
}
