// HTTP API Error Types
use axum::response::IntoResponse;
use serde_json::{json, Value};

use crate::auth::roles::AuthorizationError;
use crate::middleware::response::ProxyResponse;
use crate::storage::StoreError;

pub const FORBIDDEN_MESSAGE: &str = "User is not authorized to perform this action";
pub const LIST_FAILED_MESSAGE: &str = "Failed to list files";

/// HTTP API error with the status code and JSON body the client sees
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    // 401 Unauthorized (local server only; API Gateway rejects these upstream)
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 500 The role claim could not be read; fixing it takes operator action
    AuthorizationCheck(String),

    // 500 The object store call failed
    StoreFailure { message: String, error: String },

    // 500 Internal Server Error
    InternalServerError(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::AuthorizationCheck(_) => 500,
            ApiError::StoreFailure { .. } => 500,
            ApiError::InternalServerError(_) => 500,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::AuthorizationCheck(msg) => msg,
            ApiError::StoreFailure { message, .. } => message,
            ApiError::InternalServerError(msg) => msg,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::StoreFailure { message, error } => json!({
                "message": message,
                "error": error,
            }),
            _ => json!({ "message": self.message() }),
        }
    }

    /// Get error code for logs and metrics labels
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::AuthorizationCheck(_) => "AUTHORIZATION_CHECK_FAILED",
            ApiError::StoreFailure { .. } => "STORE_FAILURE",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden() -> Self {
        ApiError::Forbidden(FORBIDDEN_MESSAGE.to_string())
    }

    /// Guidance for the operator when the role attribute is missing or malformed
    pub fn authorization_check(role_claim: &str) -> Self {
        ApiError::AuthorizationCheck(format!(
            "Unable to check user role, please ensure you have Cognito configured correctly with a {} attribute.",
            role_claim
        ))
    }

    pub fn store_failure(error: impl Into<String>) -> Self {
        ApiError::StoreFailure {
            message: LIST_FAILED_MESSAGE.to_string(),
            error: error.into(),
        }
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    /// Map a role-policy failure given the claim name the policy inspected
    pub fn from_authorization(err: &AuthorizationError, role_claim: &str) -> Self {
        match err {
            AuthorizationError::Forbidden => ApiError::forbidden(),
            AuthorizationError::ClaimUnreadable(_) => ApiError::authorization_check(role_claim),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::store_failure(err.to_string())
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum, through the same envelope the
// Lambda surface returns
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        ProxyResponse::from(self).into_response()
    }
}
