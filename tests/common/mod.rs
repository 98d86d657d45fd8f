#![allow(dead_code)]
#![allow(clippy::expect_used)]

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;

use lobby_api::api::Api;
use lobby_api::config::{Config, Environment};
use lobby_api::state::AppState;

/// A response reduced to what the tests look at.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Parse the body as JSON, `Null` if it is not.
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

fn test_config(database_url: Option<&str>) -> Config {
    Config {
        database_url: database_url.map(str::to_string),
        server_host: std::net::IpAddr::from([127, 0, 0, 1]),
        server_port: 0,
        environment: Environment::Development,
        log_level: "warn".to_string(),
        run_migrations: true,
    }
}

/// Full middleware stack backed by a migrated in-memory `SQLite` database.
///
/// The returned connection shares the app's database, for seeding and inspection.
pub async fn test_app() -> (Router, DatabaseConnection) {
    let db = sea_orm::Database::connect("sqlite::memory:")
        .await
        .expect("connect to in-memory sqlite");
    Migrator::up(&db, None).await.expect("apply migrations");

    let state = AppState {
        db: Some(db.clone()),
        config: test_config(Some("sqlite::memory:")),
    };

    (Api::build_router(state), db)
}

/// Full middleware stack with no database configured.
pub fn unconfigured_app() -> Router {
    Api::build_router(AppState {
        db: None,
        config: test_config(None),
    })
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.expect("router is infallible");

    let status = response.status();
    let headers = response.headers().clone();
    let body = response
        .into_body()
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .unwrap_or_default();

    TestResponse {
        status,
        headers,
        body: String::from_utf8(body.to_vec()).unwrap_or_default(),
    }
}

pub async fn request(app: &Router, method: &str, uri: &str) -> TestResponse {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("valid request");
    send(app, request).await
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    request(app, "GET", uri).await
}

pub async fn post_json(app: &Router, uri: &str, body: &Value) -> TestResponse {
    post_raw(app, uri, body.to_string()).await
}

pub async fn post_raw(app: &Router, uri: &str, body: String) -> TestResponse {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .expect("valid request");
    send(app, request).await
}

/// `DELETE` with an optional session header, sent under the given header name.
pub async fn delete(app: &Router, uri: &str, session: Option<(&str, &str)>) -> TestResponse {
    let mut builder = Request::builder().method("DELETE").uri(uri);
    if let Some((name, token)) = session {
        builder = builder.header(name, token);
    }
    send(app, builder.body(Body::empty()).expect("valid request")).await
}
