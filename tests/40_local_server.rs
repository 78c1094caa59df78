mod common;

use std::sync::Arc;

use abe_proxy::auth::{generate_jwt, RolePolicy};
use abe_proxy::server::{app, AppState};
use abe_proxy::storage::MemoryStore;
use abe_proxy::types::ObjectDescriptor;
use abe_proxy::ListingProxy;
use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use common::{BUCKET, SECRET};

fn test_app(page_size: usize) -> axum::Router {
    test_app_with_logging(page_size, true)
}

fn test_app_with_logging(page_size: usize, request_logging: bool) -> axum::Router {
    let store = MemoryStore::new(page_size);
    for key in ["guides/intake.pdf", "guides/rfp.pdf", "templates/sow.docx"] {
        store.insert(BUCKET, ObjectDescriptor::with_key(key)).unwrap();
    }

    let proxy = ListingProxy::new(Arc::new(store), BUCKET, RolePolicy::default());
    app(AppState::new(proxy, SECRET).with_request_logging(request_logging))
}

fn token_for(roles: &[&str]) -> String {
    let roles: Vec<String> = roles.iter().map(|r| r.to_string()).collect();
    generate_jwt("tester", &roles, "custom:role", SECRET, 1).unwrap()
}

fn list_request(token: Option<&str>, body: &str) -> Request<Body> {
    list_request_bytes(token, body.as_bytes().to_vec())
}

fn list_request_bytes(token: Option<&str>, body: Vec<u8>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri("/admin/list-files");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body)).unwrap()
}

async fn read_json(response: axum::response::Response) -> Result<Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn allow_origin(response: &axum::response::Response) -> Option<&str> {
    response
        .headers()
        .get("access-control-allow-origin")
        .and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let response = test_app(10)
        .oneshot(Request::builder().uri("/health").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await?;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["bucket_configured"], true);
    Ok(())
}

#[tokio::test]
async fn missing_token_is_401_with_cors() -> Result<()> {
    let response = test_app(10).oneshot(list_request(None, "")).await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(allow_origin(&response), Some("*"));
    let body = read_json(response).await?;
    assert_eq!(body["message"], "Missing Authorization header");
    Ok(())
}

#[tokio::test]
async fn forged_token_is_401() -> Result<()> {
    let forged = generate_jwt("mallory", &["Admin".to_string()], "custom:role", "wrong-secret", 1)?;
    let response = test_app(10).oneshot(list_request(Some(&forged), "")).await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn reader_token_is_403() -> Result<()> {
    let token = token_for(&["Reader"]);
    let response = test_app(10).oneshot(list_request(Some(&token), "")).await?;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(allow_origin(&response), Some("*"));
    Ok(())
}

#[tokio::test]
async fn admin_pages_through_the_bucket() -> Result<()> {
    let token = token_for(&["Reader", "Admin"]);

    let response = test_app(2).oneshot(list_request(Some(&token), "")).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(allow_origin(&response), Some("*"));
    let first = read_json(response).await?;
    assert_eq!(first["Contents"].as_array().map(Vec::len), Some(2));
    let cursor = first["NextContinuationToken"].as_str().unwrap_or_default().to_string();
    assert_eq!(cursor, "guides/rfp.pdf");

    let body = serde_json::json!({ "continuationToken": cursor, "pageIndex": 1 }).to_string();
    let response = test_app(2).oneshot(list_request(Some(&token), &body)).await?;
    let second = read_json(response).await?;
    assert_eq!(second["Contents"][0]["Key"], "templates/sow.docx");
    assert!(second.get("NextContinuationToken").is_none());
    Ok(())
}

#[tokio::test]
async fn malformed_body_lists_first_page() -> Result<()> {
    let token = token_for(&["Admin"]);
    let response = test_app(10).oneshot(list_request(Some(&token), "not json")).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await?;
    assert_eq!(body["Contents"].as_array().map(Vec::len), Some(3));
    Ok(())
}

#[tokio::test]
async fn non_utf8_body_reaches_the_role_check() -> Result<()> {
    let reader = token_for(&["Reader"]);
    let response = test_app(10)
        .oneshot(list_request_bytes(Some(&reader), vec![0xff, 0xfe]))
        .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(allow_origin(&response), Some("*"));

    let admin = token_for(&["Admin"]);
    let response = test_app(10)
        .oneshot(list_request_bytes(Some(&admin), vec![0xff, 0xfe]))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await?;
    assert_eq!(body["Contents"].as_array().map(Vec::len), Some(3));
    Ok(())
}

#[tokio::test]
async fn request_logging_disabled_still_serves() -> Result<()> {
    let token = token_for(&["Admin"]);
    let response = test_app_with_logging(10, false)
        .oneshot(list_request(Some(&token), ""))
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(allow_origin(&response), Some("*"));
    Ok(())
}
