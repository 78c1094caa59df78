use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::auth::IdentityClaims;

/// The parts of an API Gateway proxy event the listing proxy reads.
/// Works for both REST (v1) and HTTP API (v2) payloads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyEvent {
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
    #[serde(default)]
    pub request_context: RequestContext,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub authorizer: Option<Authorizer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Authorizer {
    /// HTTP API JWT authorizer
    #[serde(default)]
    pub jwt: Option<JwtAuthorizer>,
    /// REST API Cognito user-pool authorizer
    #[serde(default)]
    pub claims: Option<HashMap<String, Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JwtAuthorizer {
    #[serde(default)]
    pub claims: Option<HashMap<String, Value>>,
}

impl ProxyEvent {
    /// Claims verified by the gateway authorizer; the HTTP API shape wins
    pub fn claims(&self) -> Option<IdentityClaims> {
        let authorizer = self.request_context.authorizer.as_ref()?;

        authorizer
            .jwt
            .as_ref()
            .and_then(|jwt| jwt.claims.clone())
            .or_else(|| authorizer.claims.clone())
            .map(IdentityClaims::new)
    }

    /// The body as the proxy should see it. A base64 payload is not decoded:
    /// listing bodies are plain JSON, so it is treated as undecodable.
    pub fn json_body(&self) -> Option<&str> {
        if self.is_base64_encoded {
            tracing::warn!("Ignoring base64-encoded listing request body");
            return None;
        }
        self.body.as_deref()
    }
}
