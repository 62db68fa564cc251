//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`.
//!
//! The taxonomy follows four families:
//!
//! - validation failures (422, per-field messages, never reach the network)
//! - not-found (404, a normal outcome surfaced as a user message)
//! - transient I/O failures against the hosted backend (502, one-shot
//!   retry message, no automatic retry)
//! - invariant violations (an insert that "succeeded" without returning a
//!   record), surfaced like I/O failures but logged distinctly

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use inkpress_core::CartError;

use crate::store::{StorageError, StoreError};

/// A single failed form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    #[must_use]
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_owned(),
            message: message.to_owned(),
        }
    }
}

/// Collected form validation failures, surfaced next to their fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, field: &str, message: &str) {
        self.0.push(FieldError::new(field, message));
    }

    /// Convert into a result: `Ok(())` when no field failed.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one field failed.
    pub fn into_result(self) -> std::result::Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{joined}")
    }
}

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Data store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Object storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Client-side input failed schema rules before any network call.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

/// JSON body for error responses.
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<ValidationErrors>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // The invariant case gets its own log line so diagnostics can tell
        // it from ordinary transport failures.
        if let Self::Store(StoreError::MissingRecord(collection)) = &self {
            tracing::error!(
                collection = %collection,
                "store reported success but returned no record"
            );
        }

        // Capture server errors to Sentry
        if matches!(self, Self::Store(_) | Self::Storage(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Store(_) | Self::Storage(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let (message, errors) = match self {
            Self::Store(_) | Self::Storage(_) => (
                "External service error. Please try again.".to_string(),
                None,
            ),
            Self::Internal(_) => ("Internal server error".to_string(), None),
            Self::Validation(errors) => {
                ("Please correct the highlighted fields.".to_string(), Some(errors))
            }
            Self::NotFound(message) | Self::BadRequest(message) => (message, None),
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                message,
                errors,
            }),
        )
            .into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product: business-cards".to_string());
        assert_eq!(err.to_string(), "Not found: product: business-cards");

        let err = AppError::BadRequest("cart is empty".to_string());
        assert_eq!(err.to_string(), "Bad request: cart is empty");
    }

    #[test]
    fn test_validation_errors_display() {
        let mut errors = ValidationErrors::default();
        errors.push("customer_email", "Invalid email address");
        errors.push("postcode", "Valid postcode is required");
        assert_eq!(
            errors.to_string(),
            "customer_email: Invalid email address; postcode: Valid postcode is required"
        );
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            let response = err.into_response();
            response.status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Validation(ValidationErrors(vec![
                FieldError::new("customer_name", "Name must be at least 2 characters")
            ]))),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Store(StoreError::MissingRecord("orders"))),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_cart_error_maps_to_bad_request() {
        let err = AppError::from(CartError::ZeroQuantity);
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationErrors::default().into_result().is_ok());

        let mut errors = ValidationErrors::default();
        errors.push("city", "City is required");
        assert!(errors.into_result().is_err());
    }
}
