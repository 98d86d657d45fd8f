mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn health_reports_connected_database() {
    let (app, _db) = common::test_app().await;
    let res = common::get(&app, "/health").await;

    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let (app, _db) = common::test_app().await;
    let res = common::get(&app, "/nonexistent").await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.json()["code"], "NOT_FOUND");
}

#[tokio::test]
async fn preflight_is_answered_without_a_handler() {
    let (app, _db) = common::test_app().await;
    let res = common::request(&app, "OPTIONS", "/").await;

    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.is_empty());
    let header = |name: &str| {
        res.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase()
    };
    assert_eq!(header("access-control-allow-origin"), "*");
    assert!(header("access-control-allow-methods").contains("delete"));
    assert!(header("access-control-allow-headers").contains("x-session-id"));
    assert_eq!(header("access-control-max-age"), "86400");
}

// ──────────────────────────────────────────────────────────────────────────────
// No DATABASE_URL
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn unconfigured_store_fails_every_lobby_request() {
    let app = common::unconfigured_app();

    let responses = [
        common::get(&app, "/").await,
        common::post_json(&app, "/", &json!({ "action": "join", "username": "Alice" })).await,
        common::delete(&app, "/", Some(("X-Session-ID", "token"))).await,
    ];

    for res in responses {
        assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
        let body = res.json();
        assert_eq!(body["code"], "CONFIG_ERROR");
        assert_eq!(body["error"], "Database not configured");
    }
}

#[tokio::test]
async fn unconfigured_store_still_answers_preflight_and_health() {
    let app = common::unconfigured_app();

    let res = common::request(&app, "OPTIONS", "/").await;
    assert_eq!(res.status, StatusCode::OK);

    let res = common::get(&app, "/health").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["database"], "unconfigured");
}
