// auth/roles.rs - role-list authorization over upstream identity claims
//
// The identity layer (Cognito behind API Gateway, or the local JWT middleware)
// has already verified the token. What is left is reading the role list out
// of a custom attribute and checking it for the privileged role.

use serde_json::Value;
use thiserror::Error;

use super::IdentityClaims;
use crate::config::AuthConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    /// The role claim is absent or not a JSON string array. Access is denied.
    #[error("role claim unreadable: {0}")]
    ClaimUnreadable(String),

    /// The role list is readable but contains no privileged role
    #[error("no privileged role present")]
    Forbidden,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePolicy {
    claim: String,
    privileged_substring: String,
}

impl RolePolicy {
    pub fn new(claim: impl Into<String>, privileged_substring: impl Into<String>) -> Self {
        Self {
            claim: claim.into(),
            privileged_substring: privileged_substring.into(),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.role_claim, &config.privileged_role)
    }

    pub fn claim(&self) -> &str {
        &self.claim
    }

    /// Read the ordered role list out of the claims bag
    pub fn roles(&self, claims: Option<&IdentityClaims>) -> Result<Vec<String>, AuthorizationError> {
        let claims = claims.ok_or_else(|| {
            AuthorizationError::ClaimUnreadable("no identity claims on request".to_string())
        })?;

        let raw = match claims.get(&self.claim) {
            Some(Value::String(raw)) => raw,
            Some(other) => {
                return Err(AuthorizationError::ClaimUnreadable(format!(
                    "claim '{}' is a {}, expected a JSON-encoded string",
                    self.claim,
                    value_kind(other)
                )))
            }
            None => {
                return Err(AuthorizationError::ClaimUnreadable(format!(
                    "claim '{}' is missing",
                    self.claim
                )))
            }
        };

        serde_json::from_str::<Vec<String>>(raw).map_err(|e| {
            AuthorizationError::ClaimUnreadable(format!("claim '{}' is not a JSON string array: {}", self.claim, e))
        })
    }

    /// Fail-closed check: only a readable role list with a privileged entry passes
    pub fn authorize(&self, claims: Option<&IdentityClaims>) -> Result<(), AuthorizationError> {
        let roles = self.roles(claims)?;

        if roles.iter().any(|role| role.contains(&self.privileged_substring)) {
            Ok(())
        } else {
            Err(AuthorizationError::Forbidden)
        }
    }
}

impl Default for RolePolicy {
    fn default() -> Self {
        Self::new("custom:role", "Admin")
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
