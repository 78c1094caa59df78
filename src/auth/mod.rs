pub mod roles;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

pub use roles::{AuthorizationError, RolePolicy};

/// Claims attached to a request by the identity layer, already verified.
/// Values stay as raw JSON; only the role policy interprets them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityClaims(HashMap<String, Value>);

impl IdentityClaims {
    pub fn new(claims: HashMap<String, Value>) -> Self {
        Self(claims)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    pub fn subject(&self) -> Option<&str> {
        self.0
            .get("sub")
            .or_else(|| self.0.get("cognito:username"))
            .and_then(Value::as_str)
    }
}

impl FromIterator<(String, Value)> for IdentityClaims {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),
    #[error("JWT secret not configured")]
    InvalidSecret,
}

/// Mint a development token shaped like a Cognito ID token: the role list is
/// JSON-encoded into a single string claim.
pub fn generate_jwt(
    subject: &str,
    roles: &[String],
    role_claim: &str,
    secret: &str,
    expiry_hours: u64,
) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let now = Utc::now();
    let exp = i64::try_from(expiry_hours)
        .ok()
        .and_then(Duration::try_hours)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| JwtError::TokenGeneration(format!("token lifetime of {} hours is out of range", expiry_hours)))?
        .timestamp();
    let encoded_roles =
        serde_json::to_string(roles).map_err(|e| JwtError::TokenGeneration(e.to_string()))?;

    let mut claims = IdentityClaims::default();
    claims.insert("sub", Value::String(subject.to_string()));
    claims.insert(role_claim, Value::String(encoded_roles));
    claims.insert("iat", Value::from(now.timestamp()));
    claims.insert("exp", Value::from(exp));

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Verify an HS256 token and return its claims bag
pub fn decode_jwt(token: &str, secret: &str) -> Result<IdentityClaims, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<IdentityClaims>(token, &decoding_key, &validation)
        .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}
