//! API integration tests
//!
//! Drive the full router against the in-memory store.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use eqtrack_server::{
    api,
    config::{AppConfig, StoreBackend},
    repository::memory::MemoryStore,
    services::Services,
    AppState,
};

async fn app() -> Router {
    let mut config = AppConfig::default();
    config.database.backend = StoreBackend::Memory;

    let services = Services::new(Arc::new(MemoryStore::new()), config.auth.clone()).await;
    api::create_router(AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    })
}

async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Sign up and sign in, returning (token, user id)
async fn register(app: &Router, name: &str) -> (String, String) {
    let (status, _) = send(
        app,
        Method::POST,
        "/api/v1/auth/signup",
        None,
        Some(json!({
            "email": format!("{}@example.com", name),
            "password": "hunter22",
            "username": name
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/auth/signin",
        None,
        Some(json!({
            "email": format!("{}@example.com", name),
            "password": "hunter22"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    (
        body["token"].as_str().unwrap().to_string(),
        body["user"]["user_id"].as_str().unwrap().to_string(),
    )
}

async fn add_equipment(app: &Router, token: &str, name: &str, category: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/equipments",
        Some(token),
        Some(json!({ "name": name, "category": category })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "available");
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/api/v1/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["backend"], "memory");
}

#[tokio::test]
async fn test_requires_authentication() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/v1/equipments", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "NotAuthorized");

    let (status, _) = send(&app, Method::GET, "/api/v1/equipments", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_and_sign_out() {
    let app = app().await;
    let (token, user_id) = register(&app, "alice").await;

    let (status, body) = send(&app, Method::GET, "/api/v1/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], user_id.as_str());
    assert_eq!(body["email"], "alice@example.com");
    assert!(body.get("password_hash").is_none());

    let (status, _) = send(&app, Method::POST, "/api/v1/auth/signout", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, "/api/v1/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_duplicate_signup_conflicts() {
    let app = app().await;
    register(&app, "alice").await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/auth/signup",
        None,
        Some(json!({ "email": "alice@example.com", "password": "hunter22", "username": "alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_check_out_and_check_in_cycle() {
    let app = app().await;
    let (token, user_id) = register(&app, "alice").await;
    let id = add_equipment(&app, &token, "Drill", "tools").await;

    let (status, body) = send(&app, Method::POST, &format!("/api/v1/equipments/{}/check-out", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["type"], "check_out");

    let (_, body) = send(&app, Method::GET, &format!("/api/v1/equipments/{}", id), Some(&token), None).await;
    assert_eq!(body["status"], "unavailable");
    assert_eq!(body["current_holder"]["user_id"], user_id.as_str());
    assert_eq!(body["current_holder"]["username"], "alice");

    // Second check-out is refused while the item is held
    let (status, body) = send(&app, Method::POST, &format!("/api/v1/equipments/{}/check-out", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "InvalidTransition");

    let (status, _) = send(&app, Method::POST, &format!("/api/v1/equipments/{}/check-in", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, Method::GET, &format!("/api/v1/equipments/{}", id), Some(&token), None).await;
    assert_eq!(body["status"], "available");
    assert!(body["current_holder"].is_null());

    let (status, body) = send(&app, Method::GET, &format!("/api/v1/equipments/{}/transactions", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let history = body.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["type"], "check_in");
}

#[tokio::test]
async fn test_holder_filter_and_check_in_all() {
    let app = app().await;
    let (alice, alice_id) = register(&app, "alice").await;
    let (bob, _) = register(&app, "bob").await;

    let a = add_equipment(&app, &alice, "Drill", "tools").await;
    let b = add_equipment(&app, &alice, "Laptop", "it").await;
    let c = add_equipment(&app, &alice, "Saw", "tools").await;

    for id in [a, b] {
        send(&app, Method::POST, &format!("/api/v1/equipments/{}/check-out", id), Some(&alice), None).await;
    }
    send(&app, Method::POST, &format!("/api/v1/equipments/{}/check-out", c), Some(&bob), None).await;

    let (_, body) = send(&app, Method::GET, &format!("/api/v1/equipments?holder={}", alice_id), Some(&alice), None).await;
    let ids: Vec<i64> = body.as_array().unwrap().iter().map(|e| e["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![a, b]);

    let (_, body) = send(&app, Method::GET, "/api/v1/equipments?category=tools", Some(&alice), None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = send(&app, Method::POST, "/api/v1/equipments/check-in-all", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["equipment_ids"], json!([a, b]));

    let (status, body) = send(&app, Method::POST, "/api/v1/equipments/check-in-all", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["equipment_ids"], json!([]));

    let (_, body) = send(&app, Method::GET, "/api/v1/dashboard", Some(&alice), None).await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["available"], 2);
    assert_eq!(body["profiles"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_update_delete_and_audit_trail() {
    let app = app().await;
    let (token, _) = register(&app, "alice").await;
    let id = add_equipment(&app, &token, "Drill", "tools").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/equipments/{}", id),
        Some(&token),
        Some(json!({ "description": "Cordless" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Drill");
    assert_eq!(body["description"], "Cordless");

    let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/equipments/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, &format!("/api/v1/equipments/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, Method::GET, "/api/v1/logs", Some(&token), None).await;
    let actions: Vec<&str> = body.as_array().unwrap().iter().map(|l| l["action"].as_str().unwrap()).collect();
    assert_eq!(actions, vec!["deleted equipment", "updated equipment", "added new equipment"]);
    assert_eq!(body[0]["username"], "alice");
    assert_eq!(body[0]["details"]["equipment_name"], "Drill");
}

#[tokio::test]
async fn test_invalid_equipment_rejected() {
    let app = app().await;
    let (token, _) = register(&app, "alice").await;
    let (status, _) = send(&app, Method::POST, "/api/v1/equipments", Some(&token), Some(json!({ "name": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_profiles_listing_and_lookup() {
    let app = app().await;
    let (token, alice_id) = register(&app, "alice").await;
    register(&app, "bob").await;

    let (status, body) = send(&app, Method::GET, "/api/v1/profiles", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body.as_array().unwrap().iter().map(|p| p["username"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["alice", "bob"]);

    let (status, body) = send(&app, Method::GET, &format!("/api/v1/profiles/{}", alice_id), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "alice@example.com");

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/v1/profiles/00000000-0000-0000-0000-000000000000",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_null_clears_field() {
    let app = app().await;
    let (token, _) = register(&app, "alice").await;
    let id = add_equipment(&app, &token, "Drill", "tools").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/equipments/{}", id),
        Some(&token),
        Some(json!({ "category": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["category"].is_null());
    assert_eq!(body["name"], "Drill");
}
