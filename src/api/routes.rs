use axum::{routing::get, Router};

use crate::api::handlers::{self, AppState};
use crate::store::FixtureStore;

pub fn create_router<S: FixtureStore + 'static>() -> Router<AppState<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Mock introspection
        .route("/_mock/registry", get(handlers::registry_stats::<S>))
        .route("/_mock/patterns", get(handlers::list_patterns::<S>))
        // Every other path is resolved against the endpoint catalog
        .fallback(handlers::mock_request::<S>)
}
