//! Application router assembly.

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::account::account_routes;
use super::catalog::catalog_routes;
use super::entitlement::entitlement_routes;
use super::health::health;
use super::state::AppState;
use super::webhooks::webhook_routes;
use crate::config::ServerConfig;

/// Build the complete application router.
///
/// # Routes
/// - `GET /health`
/// - `/api/videos/...` - catalog, access and purchase options
/// - `POST /api/purchases`
/// - `/api/account/...`
/// - `POST /api/webhooks/stripe`
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let api = Router::new()
        .merge(catalog_routes())
        .merge(entitlement_routes())
        .nest("/account", account_routes())
        .nest("/webhooks", webhook_routes());

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .with_state(state)
        .layer(cors_layer(config))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TimeoutLayer::new(config.request_timeout())),
        )
}

/// CORS policy from configured origins.
///
/// With no origins configured, development allows any origin and
/// production allows none.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        if config.is_production() {
            return CorsLayer::new();
        }
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-user-id")])
}
