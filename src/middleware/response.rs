use axum::{
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::ApiError;

pub const ALLOW_ORIGIN_HEADER: &str = "Access-Control-Allow-Origin";

/// API Gateway proxy-style response: every exit path of the listing proxy
/// ends in one of these, on both the Lambda and the local surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    /// JSON-encoded body
    pub body: String,
}

impl ProxyResponse {
    /// Build a response with the open cross-origin header already set
    pub fn json(status_code: u16, body: &Value) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(ALLOW_ORIGIN_HEADER.to_string(), "*".to_string());

        Self {
            status_code,
            headers,
            body: body.to_string(),
        }
    }

    /// Create a 200 OK response from any serializable payload
    pub fn ok<T: Serialize>(data: &T) -> Self {
        match serde_json::to_value(data) {
            Ok(value) => Self::json(200, &value),
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                Self::from(ApiError::internal_server_error("Failed to serialize response data"))
            }
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Parse the body back into JSON; `Value::Null` if it is not JSON
    pub fn body_json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

impl From<ApiError> for ProxyResponse {
    fn from(err: ApiError) -> Self {
        ProxyResponse::json(err.status_code(), &err.to_json())
    }
}

impl IntoResponse for ProxyResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = (status, self.body).into_response();
        let headers = response.headers_mut();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

        for (name, value) in &self.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => tracing::warn!("Dropping invalid response header '{}'", name),
            }
        }

        response
    }
}

/// Small helper for handlers that only need a JSON body with the CORS header
pub fn json_response(status_code: u16, body: Value) -> ProxyResponse {
    ProxyResponse::json(status_code, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_every_constructor_sets_allow_origin() {
        let ok = ProxyResponse::ok(&json!({ "Contents": [] }));
        let err = ProxyResponse::from(ApiError::forbidden());
        assert_eq!(ok.header("access-control-allow-origin"), Some("*"));
        assert_eq!(err.header(ALLOW_ORIGIN_HEADER), Some("*"));
        assert_eq!(err.status_code, 403);
    }

    #[test]
    fn test_serializes_in_gateway_shape() {
        let response = ProxyResponse::json(200, &json!({ "Contents": [] }));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["statusCode"], 200);
        assert_eq!(value["headers"][ALLOW_ORIGIN_HEADER], "*");
        assert_eq!(value["body"], r#"{"Contents":[]}"#);
    }

    #[test]
    fn test_into_axum_response_copies_headers() {
        let response = ProxyResponse::from(ApiError::store_failure("boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers().get("access-control-allow-origin").and_then(|v| v.to_str().ok()),
            Some("*")
        );
    }
}
