use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::Service;

use server::auth::AppState;
use server::routes;
use service::store::repository::mock::MemoryCatalogRepository;
use service::TokenService;

fn cors() -> tower_http::cors::CorsLayer {
    tower_http::cors::CorsLayer::very_permissive()
}

fn build_app() -> Router {
    let state = AppState {
        store: Arc::new(MemoryCatalogRepository::default()),
        tokens: Arc::new(TokenService::with_default_ttl("test-secret")),
    };
    routes::build_router(state, cors())
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(serde_json::to_vec(&body).unwrap())).unwrap()
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn missing_header_is_unauthorized() -> anyhow::Result<()> {
    let mut app = build_app();

    let req = Request::builder()
        .method("POST")
        .uri("/services")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&json!({"name": "Paella"}))?))?;
    let resp = app.call(req).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn garbage_token_is_forbidden() -> anyhow::Result<()> {
    let mut app = build_app();

    let req = json_request("POST", "/services", Some("garbage"), json!({"name": "Paella"}));
    let resp = app.call(req).await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn expired_token_is_forbidden() -> anyhow::Result<()> {
    let mut app = build_app();

    // Same secret as the app, but issued already past its expiry.
    let stale_issuer = TokenService::new("test-secret", chrono::Duration::seconds(-120));
    let token = stale_issuer.issue(serde_json::Map::new())?;

    let req = json_request("POST", "/services", Some(&token), json!({"name": "Paella"}));
    let resp = app.call(req).await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn issued_token_admits_request() -> anyhow::Result<()> {
    let mut app = build_app();

    let req = json_request("POST", "/jwt", None, json!({"email": "a@b.com"}));
    let resp = app.call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let token = body_json(resp).await["token"].as_str().unwrap().to_string();

    let req = json_request("POST", "/services", Some(&token), json!({"name": "Paella"}));
    let resp = app.call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let outcome = body_json(resp).await;
    assert!(outcome["insertedId"].is_string());
    Ok(())
}

#[tokio::test]
async fn public_reads_need_no_credential() -> anyhow::Result<()> {
    let mut app = build_app();

    for uri in ["/", "/health", "/services", "/home/services", "/reviews"] {
        let req = Request::builder().method("GET").uri(uri).body(Body::empty())?;
        let resp = app.call(req).await?;
        assert_eq!(resp.status(), StatusCode::OK, "GET {uri}");
    }
    Ok(())
}

#[tokio::test]
async fn private_reads_are_gated() -> anyhow::Result<()> {
    let mut app = build_app();

    let req = Request::builder().method("GET").uri("/myreviews/U1").body(Body::empty())?;
    let resp = app.call(req).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = json_request("POST", "/jwt", None, json!({"email": "a@b.com"}));
    let resp = app.call(req).await?;
    let token = body_json(resp).await["token"].as_str().unwrap().to_string();

    let req = Request::builder()
        .method("GET")
        .uri("/myreviews/U1")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())?;
    let resp = app.call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    Ok(())
}
