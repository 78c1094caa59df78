use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers;
use crate::proxy::ListingProxy;

/// Shared state for the local server, built once at startup
#[derive(Clone, Debug)]
pub struct AppState {
    pub proxy: Arc<ListingProxy>,
    pub jwt_secret: Arc<str>,
    pub request_logging: bool,
}

impl AppState {
    pub fn new(proxy: ListingProxy, jwt_secret: &str) -> Self {
        Self {
            proxy: Arc::new(proxy),
            jwt_secret: Arc::from(jwt_secret),
            request_logging: true,
        }
    }

    pub fn with_request_logging(mut self, enabled: bool) -> Self {
        self.request_logging = enabled;
        self
    }
}

pub fn app(state: AppState) -> Router {
    let router = Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        // Admin routes behind the bearer-token layer
        .merge(admin_routes(state.clone()))
        // Global middleware
        .layer(CorsLayer::permissive());

    // Per-request spans only when request logging is enabled
    let router = if state.request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/list-files", post(handlers::list_files))
        .route_layer(middleware::from_fn_with_state(state, crate::middleware::jwt_claims_middleware))
}
