// handlers/list_files.rs - POST /admin/list-files handler

use axum::body::Bytes;
use axum::extract::{Extension, State};

use crate::auth::IdentityClaims;
use crate::middleware::response::ProxyResponse;
use crate::server::AppState;

/// POST /admin/list-files - list one page of the knowledge bucket
///
/// The body is taken as raw bytes and handed to the proxy as text so decoding
/// behaves the same as under Lambda: a malformed or non-UTF-8 body lists from
/// the start instead of being rejected by an extractor ahead of the role check.
///
/// Body: `{ "continuationToken"?: string, "pageIndex"?: number }`
pub async fn list_files(
    State(state): State<AppState>,
    claims: Option<Extension<IdentityClaims>>,
    body: Bytes,
) -> ProxyResponse {
    let claims = claims.map(|Extension(claims)| claims);
    let body = match std::str::from_utf8(&body) {
        Ok(text) => Some(text).filter(|b| !b.is_empty()),
        Err(e) => {
            tracing::warn!("Ignoring non-UTF-8 listing request body: {}", e);
            None
        }
    };

    state.proxy.handle(claims.as_ref(), body).await
}
