//! The lockerhub HTTP application.
//!
//! `main.rs` and the integration tests both call [`build_app_router`], so
//! tests exercise the same auth, timeout and error mapping as production.

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::json;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::routes;
use crate::state::AppState;

/// Echoed on every response so a rent or return can be traced in the logs.
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Mount `/health` and `/api/v1` and wrap them in the middleware stack.
///
/// Layers run outermost first on the way in: CORS, request id assignment,
/// tracing, request id echo, timeout, then panic recovery around the
/// handlers. A request that outlives `request_timeout_secs` gets a 408; the
/// database transaction it held is rolled back when its future is dropped.
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .fallback(route_not_found)
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(build_cors_layer(config))
        .with_state(state)
}

/// Unmatched paths answer in the same `{error, code}` shape as handler errors.
async fn route_not_found(uri: Uri) -> Response {
    let body = json!({
        "error": format!("No route for {}", uri.path()),
        "code": "NOT_FOUND",
    });
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

/// CORS for the station kiosk and admin frontends listed in `CORS_ORIGINS`.
///
/// Panics at startup on an origin that is not a valid header value.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{o}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
