// HTTP API error types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::database::DatabaseError;

/// HTTP API error with appropriate status codes and client-friendly payloads.
///
/// Every payload carries the entity name and a machine-readable error key
/// (e.g. "idexists", "idnull") so callers can distinguish failure reasons
/// without parsing messages.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequestAlert {
        message: String,
        entity_name: &'static str,
        error_key: &'static str,
    },
    ValidationError {
        message: String,
        entity_name: &'static str,
        field_errors: HashMap<String, String>,
    },

    // 401 Unauthorized
    Unauthorized(String),

    // 404 Not Found
    NotFound { entity_name: &'static str },

    // 500 Internal Server Error
    InternalServerError(String),
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequestAlert { .. } => 400,
            ApiError::ValidationError { .. } => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::NotFound { .. } => 404,
            ApiError::InternalServerError(_) => 500,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequestAlert { message, .. } => message,
            ApiError::ValidationError { message, .. } => message,
            ApiError::Unauthorized(msg) => msg,
            ApiError::NotFound { .. } => "Not found",
            ApiError::InternalServerError(msg) => msg,
        }
    }

    pub fn error_key(&self) -> &'static str {
        match self {
            ApiError::BadRequestAlert { error_key, .. } => error_key,
            ApiError::ValidationError { .. } => "validation",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::NotFound { .. } => "notfound",
            ApiError::InternalServerError(_) => "internal",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::BadRequestAlert {
                message,
                entity_name,
                error_key,
            } => json!({
                "error": true,
                "message": message,
                "entityName": entity_name,
                "errorKey": error_key,
            }),
            ApiError::ValidationError {
                message,
                entity_name,
                field_errors,
            } => json!({
                "error": true,
                "message": message,
                "entityName": entity_name,
                "errorKey": "validation",
                "fieldErrors": field_errors,
            }),
            ApiError::NotFound { entity_name } => json!({
                "error": true,
                "message": "Not found",
                "entityName": entity_name,
                "errorKey": "notfound",
            }),
            _ => json!({
                "error": true,
                "message": self.message(),
                "errorKey": self.error_key(),
            }),
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request_alert(
        message: impl Into<String>,
        entity_name: &'static str,
        error_key: &'static str,
    ) -> Self {
        ApiError::BadRequestAlert {
            message: message.into(),
            entity_name,
            error_key,
        }
    }

    pub fn validation_error(
        message: impl Into<String>,
        entity_name: &'static str,
        field_errors: HashMap<String, String>,
    ) -> Self {
        ApiError::ValidationError {
            message: message.into(),
            entity_name,
            field_errors,
        }
    }

    pub fn required_field(entity_name: &'static str, field: &str) -> Self {
        let mut field_errors = HashMap::new();
        field_errors.insert(field.to_string(), "must not be null".to_string());
        ApiError::validation_error("Validation failed", entity_name, field_errors)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(entity_name: &'static str) -> Self {
        ApiError::NotFound { entity_name }
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

// Storage errors are logged with full detail and translated into a generic
// server error; SQL details never reach clients.
impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        tracing::error!("database error: {}", err);
        ApiError::internal_server_error("An error occurred while processing your request")
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("sqlx error: {}", err);
        ApiError::internal_server_error("An error occurred while processing your request")
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
