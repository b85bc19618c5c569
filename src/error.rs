// Function error types
use serde_json::{json, Value};

use crate::api::event::HttpResponse;
use crate::database::DatabaseError;

/// Failures the router renders as `{"error": "..."}` responses
#[derive(Debug)]
pub enum ApiError {
    // 401 Unauthorized
    Unauthorized,
    InvalidCredentials,

    // 404 Not Found
    NotFound,

    // 500 Internal Server Error; the detail is logged, never returned
    InvalidBody(String),
    Database(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Unauthorized => 401,
            ApiError::InvalidCredentials => 401,
            ApiError::NotFound => 404,
            ApiError::InvalidBody(_) => 500,
            ApiError::Database(_) => 500,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "Unauthorized",
            ApiError::InvalidCredentials => "Invalid credentials",
            ApiError::NotFound => "Not found",
            ApiError::InvalidBody(_) | ApiError::Database(_) => "Internal server error",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({ "error": self.message() })
    }

    pub fn into_response(self) -> HttpResponse {
        HttpResponse::json(self.status_code(), &self.to_json())
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        // Log the real error but return generic message
        tracing::error!("Database error: {}", err);
        ApiError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("Malformed request body: {}", err);
        ApiError::InvalidBody(err.to_string())
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::InvalidBody(detail) | ApiError::Database(detail) => write!(f, "{}: {}", self.message(), detail),
            _ => write!(f, "{}", self.message()),
        }
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_errors_hide_details() {
        let err = ApiError::from(DatabaseError::Constraint("orders_privilege_id_fkey".to_string()));
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.to_json(), json!({ "error": "Internal server error" }));
        assert!(err.to_string().contains("orders_privilege_id_fkey"));
    }

    #[test]
    fn auth_and_routing_errors_have_fixed_bodies() {
        assert_eq!(ApiError::Unauthorized.to_json(), json!({ "error": "Unauthorized" }));
        assert_eq!(ApiError::InvalidCredentials.to_json(), json!({ "error": "Invalid credentials" }));
        assert_eq!(ApiError::NotFound.status_code(), 404);
    }
}
