#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use lockerhub_api::auth::jwt::{generate_access_token, JwtConfig};
use lockerhub_api::config::ServerConfig;
use lockerhub_api::router::build_app_router;
use lockerhub_api::state::AppState;
use lockerhub_core::roles::{ROLE_ADMIN, ROLE_USER};
use lockerhub_core::types::DbId;
use sqlx::PgPool;
use tower::ServiceExt;

pub const ADMIN_ID: DbId = 1;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        db_max_connections: 5,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router, with the production middleware stack,
/// over the given pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState::new(pool, config.clone());
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

pub fn admin_token() -> String {
    generate_access_token(ADMIN_ID, ROLE_ADMIN, &test_config().jwt).unwrap()
}

pub fn user_token(user_id: DbId) -> String {
    generate_access_token(user_id, ROLE_USER, &test_config().jwt).unwrap()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a station through the API and return its id.
pub async fn create_station(pool: &PgPool, name: &str) -> DbId {
    let body = serde_json::json!({ "name": name, "latitude": 37.5665, "longitude": 126.978 });
    let app = build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/stations", body, &admin_token()).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

/// Create `count` lockers at a station through the API and return their ids.
pub async fn create_lockers(pool: &PgPool, station_id: DbId, count: i64) -> Vec<DbId> {
    let body = serde_json::json!({ "stationId": station_id, "numberLockers": count });
    let app = build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/lockers", body, &admin_token()).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response)
        .await
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_i64().unwrap())
        .collect()
}
