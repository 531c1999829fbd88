use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Main error type for the roadcall-pricing service
#[derive(Debug)]
pub enum RoadcallError {
    // HTTP and API errors
    BadRequest(String),
    NotFound(String),
    InternalServer(String),

    // Catalog store errors
    StoreConnection(String),
    StoreQuery(String),
    StoreSerialization(String),

    // Serialization and parsing errors
    JsonParsing(String),
    JsonSerialization(String),
    InvalidFormat(String),

    // Business logic errors
    ServiceNotFound(String),
    GarageNotFound(String),

    // Validation errors
    ValidationFailed(Vec<ValidationError>),
    MissingRequiredField(String),
    InvalidFieldValue { field: String, value: String, reason: String },

    // Configuration and setup errors
    ConfigurationError(String),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl fmt::Display for RoadcallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoadcallError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            RoadcallError::NotFound(msg) => write!(f, "Not found: {}", msg),
            RoadcallError::InternalServer(msg) => write!(f, "Internal server error: {}", msg),

            RoadcallError::StoreConnection(msg) => write!(f, "Store connection error: {}", msg),
            RoadcallError::StoreQuery(msg) => write!(f, "Store query error: {}", msg),
            RoadcallError::StoreSerialization(msg) => write!(f, "Store serialization error: {}", msg),

            RoadcallError::JsonParsing(msg) => write!(f, "JSON parsing error: {}", msg),
            RoadcallError::JsonSerialization(msg) => write!(f, "JSON serialization error: {}", msg),
            RoadcallError::InvalidFormat(msg) => write!(f, "Invalid format: {}", msg),

            RoadcallError::ServiceNotFound(id) => write!(f, "Service not found: {}", id),
            RoadcallError::GarageNotFound(id) => write!(f, "Garage not found: {}", id),

            RoadcallError::ValidationFailed(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            RoadcallError::MissingRequiredField(field) => write!(f, "Missing required field: {}", field),
            RoadcallError::InvalidFieldValue { field, value, reason } => {
                write!(f, "Invalid value '{}' for field '{}': {}", value, field, reason)
            }

            RoadcallError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for RoadcallError {}

impl IntoResponse for RoadcallError {
    fn into_response(self) -> Response {
        let (status, error_type, message, details) = match self {
            RoadcallError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            RoadcallError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),

            RoadcallError::ValidationFailed(errors) => {
                let details = serde_json::to_value(&errors).ok();
                (StatusCode::BAD_REQUEST, "validation_failed", "Validation errors occurred".to_string(), details)
            }
            RoadcallError::MissingRequiredField(field) => {
                (StatusCode::BAD_REQUEST, "missing_field", format!("Missing required field: {}", field), None)
            }
            RoadcallError::InvalidFieldValue { field, reason, .. } => {
                (StatusCode::BAD_REQUEST, "invalid_field", format!("Invalid value for {}: {}", field, reason), None)
            }
            RoadcallError::InvalidFormat(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_format", msg, None)
            }

            RoadcallError::ServiceNotFound(id) => (StatusCode::NOT_FOUND, "service_not_found", format!("Service not found: {}", id), None),
            RoadcallError::GarageNotFound(id) => (StatusCode::NOT_FOUND, "garage_not_found", format!("Garage not found: {}", id), None),

            // All other errors are treated as internal server errors
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", self.to_string(), None),
        };

        let error_response = ErrorResponse {
            success: false,
            error: error_type.to_string(),
            message,
            details,
        };

        (status, axum::Json(error_response)).into_response()
    }
}

// Convenience type alias for Results
pub type RoadcallResult<T> = Result<T, RoadcallError>;

// Conversion implementations for common error types
impl From<redis::RedisError> for RoadcallError {
    fn from(err: redis::RedisError) -> Self {
        match err.kind() {
            redis::ErrorKind::IoError => RoadcallError::StoreConnection(err.to_string()),
            redis::ErrorKind::ResponseError => RoadcallError::StoreQuery(err.to_string()),
            redis::ErrorKind::AuthenticationFailed => RoadcallError::StoreConnection("Authentication failed".to_string()),
            _ => RoadcallError::StoreQuery(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RoadcallError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() {
            RoadcallError::JsonParsing(err.to_string())
        } else {
            RoadcallError::JsonSerialization(err.to_string())
        }
    }
}

impl From<chrono::ParseError> for RoadcallError {
    fn from(err: chrono::ParseError) -> Self {
        RoadcallError::InvalidFormat(format!("Invalid date/time format: {}", err))
    }
}

// Helper functions for creating common errors
impl RoadcallError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        RoadcallError::BadRequest(msg.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        RoadcallError::NotFound(resource.into())
    }

    pub fn internal_error(msg: impl Into<String>) -> Self {
        RoadcallError::InternalServer(msg.into())
    }

    pub fn validation_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        RoadcallError::ValidationFailed(vec![ValidationError {
            field: field.into(),
            message: message.into(),
        }])
    }

    pub fn service_not_found(service_id: impl Into<String>) -> Self {
        RoadcallError::ServiceNotFound(service_id.into())
    }

    pub fn garage_not_found(garage_id: impl Into<String>) -> Self {
        RoadcallError::GarageNotFound(garage_id.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = RoadcallError::ServiceNotFound("svc-123".to_string());
        assert_eq!(error.to_string(), "Service not found: svc-123");
    }

    #[test]
    fn test_validation_error() {
        let error = RoadcallError::validation_error("basePrice", "must be a non-negative number");
        match error {
            RoadcallError::ValidationFailed(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "basePrice");
                assert_eq!(errors[0].message, "must be a non-negative number");
            }
            _ => panic!("Expected ValidationFailed error"),
        }
    }

    #[test]
    fn test_helper_functions() {
        assert!(matches!(RoadcallError::bad_request("test"), RoadcallError::BadRequest(_)));
        assert!(matches!(RoadcallError::not_found("test"), RoadcallError::NotFound(_)));
        assert!(matches!(RoadcallError::internal_error("test"), RoadcallError::InternalServer(_)));
        assert!(matches!(RoadcallError::garage_not_found("grg-1"), RoadcallError::GarageNotFound(_)));
    }
}
