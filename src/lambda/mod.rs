//! Lambda hosting surface: API Gateway proxy events in, proxy responses out.

pub mod event;

use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use std::sync::Arc;

use crate::middleware::response::ProxyResponse;
use crate::proxy::ListingProxy;

pub use event::ProxyEvent;

/// Run one invocation. An event that does not even deserialize is treated
/// as carrying no claims, so it is denied with the usual CORS-annotated body
/// instead of surfacing a runtime error.
pub async fn handle_event(proxy: &ListingProxy, payload: Value) -> ProxyResponse {
    let event = match serde_json::from_value::<ProxyEvent>(payload) {
        Ok(event) => event,
        Err(e) => {
            tracing::error!("Unreadable proxy event: {}", e);
            ProxyEvent::default()
        }
    };

    if let Some(request_id) = &event.request_context.request_id {
        tracing::debug!("Handling gateway request {}", request_id);
    }

    let claims = event.claims();
    proxy.handle(claims.as_ref(), event.json_body()).await
}

/// Register the handler with the Lambda runtime and serve until shutdown
pub async fn run(proxy: ListingProxy) -> Result<(), Error> {
    let proxy = Arc::new(proxy);

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let proxy = Arc::clone(&proxy);
        async move { Ok::<ProxyResponse, Error>(handle_event(&proxy, event.payload).await) }
    }))
    .await
}
