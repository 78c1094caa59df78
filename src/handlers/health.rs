use axum::extract::State;
use serde_json::json;

use crate::middleware::response::{json_response, ProxyResponse};
use crate::server::AppState;

pub async fn root() -> ProxyResponse {
    let version = env!("CARGO_PKG_VERSION");

    json_response(
        200,
        json!({
            "name": "ABE listing proxy",
            "version": version,
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "list_files": "POST /admin/list-files (bearer JWT, privileged role)",
            }
        }),
    )
}

/// Liveness only; the store is not probed so health checks cost no S3 calls
pub async fn health(State(state): State<AppState>) -> ProxyResponse {
    let now = chrono::Utc::now();

    json_response(
        200,
        json!({
            "status": "ok",
            "timestamp": now,
            "bucket_configured": !state.proxy.bucket().is_empty(),
        }),
    )
}
