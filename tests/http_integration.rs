//! HTTP-level tests: routing, identity, status codes and JSON shapes.

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::*;
use vod_access::adapters::http::{build_router, USER_ID_HEADER};
use vod_access::config::ServerConfig;

fn app(world: &World) -> Router {
    build_router(world.app_state(), &ServerConfig::default())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str, user: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(user) = user {
        builder = builder.header(USER_ID_HEADER, user);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, user: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(USER_ID_HEADER, user)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn health_reports_ok() {
    let world = World::new().await;
    let (status, body) = send(app(&world), get("/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn lists_videos_without_identity() {
    let world = World::new().await;
    let (status, body) = send(app(&world), get("/api/videos", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["videos"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn unknown_video_is_404_and_bad_id_is_400() {
    let world = World::new().await;

    let (status, body) = send(app(&world), get("/api/videos/77", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, body) = send(app(&world), get("/api/videos/abc", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

// =============================================================================
// Access and purchase options
// =============================================================================

#[tokio::test]
async fn access_requires_identity() {
    let world = World::new().await;

    let (status, body) = send(app(&world), get("/api/videos/2/access", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "AUTHENTICATION_REQUIRED");

    let (status, _) = send(app(&world), get("/api/videos/2/access", Some("nobody"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn access_reports_decision() {
    let world = World::new().await;

    let (status, body) = send(app(&world), get("/api/videos/1/access", Some("1"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"has_access": true, "decision": "free"}));

    let (_, body) = send(app(&world), get("/api/videos/2/access", Some("1"))).await;
    assert_eq!(body, json!({"has_access": false, "decision": "denied"}));
}

#[tokio::test]
async fn purchase_options_honor_simplified_flag() {
    let world = World::new().await;

    let (status, body) = send(
        app(&world),
        get("/api/videos/2/purchase-options", Some("1")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let kinds: Vec<&str> = body["purchase_options"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["video", "series", "module"]);
    assert_eq!(body["purchase_options"][0]["amount"], 299);
    assert_eq!(body["purchase_options"][0]["currency"], "nzd");

    let (_, body) = send(
        app(&world),
        get("/api/videos/2/purchase-options?simplified=true", Some("1")),
    )
    .await;
    assert_eq!(body["purchase_options"].as_array().unwrap().len(), 1);
}

// =============================================================================
// Purchases
// =============================================================================

#[tokio::test]
async fn module_purchase_returns_created() {
    let world = World::new().await;
    let request = post_json(
        "/api/purchases",
        "1",
        json!({"kind": "module", "name": "Premium", "price_id": "price_premium"}),
    );

    let (status, body) = send(app(&world), request).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["kind"], "module");
    assert!(body["processor_reference"].as_str().unwrap().starts_with("sub_"));
}

#[tokio::test]
async fn purchase_errors_map_to_statuses() {
    let world = World::new().await;

    let (status, body) = send(
        app(&world),
        post_json(
            "/api/purchases",
            "1",
            json!({"kind": "bundle", "name": "x", "price_id": "p"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_PURCHASE_KIND");

    let (status, body) = send(
        app(&world),
        post_json(
            "/api/purchases",
            "2",
            json!({"kind": "module", "name": "Premium", "price_id": "price_premium"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body["code"], "CUSTOMER_NOT_PROVISIONED");

    let (status, body) = send(
        app(&world),
        post_json(
            "/api/purchases",
            "1",
            json!({"kind": "series", "name": "Drama", "price_id": "price_wrong"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert!(world.billing.billing_calls().is_empty());
}

// =============================================================================
// Account
// =============================================================================

#[tokio::test]
async fn account_exposes_billing_flags_only() {
    let world = World::new().await;
    let (status, body) = send(app(&world), get("/api/account", Some("1"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["billing_enabled"], true);
    assert_eq!(body["has_payment_method"], true);
    assert!(body.get("customer_id").is_none());
}

#[tokio::test]
async fn payment_setup_works_without_body() {
    let world = World::new().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/account/payment-setup")
        .header(USER_ID_HEADER, "2")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app(&world), request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["url"].as_str().unwrap().starts_with("https://"));
    let setup = world
        .billing
        .calls()
        .into_iter()
        .find(|c| c.method == "create_setup_session")
        .unwrap();
    assert_eq!(setup.args[1], format!("{}/account", BASE_URL));
    assert!(world.users.get(NEWCOMER).unwrap().customer_id.is_some());
}

#[tokio::test]
async fn portal_without_customer_is_payment_required() {
    let world = World::new().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/account/portal")
        .header(USER_ID_HEADER, "2")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app(&world), request).await;

    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body["code"], "CUSTOMER_NOT_PROVISIONED");
}

// =============================================================================
// Webhooks
// =============================================================================

fn webhook(payload: Vec<u8>, signature: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/webhooks/stripe")
        .header("content-type", "application/json");
    if let Some(signature) = signature {
        builder = builder.header("Stripe-Signature", signature);
    }
    builder.body(Body::from(payload)).unwrap()
}

#[tokio::test]
async fn signed_webhook_is_acknowledged() {
    let world = World::new().await;
    let (payload, signature) = signed_subscription_event(
        "evt_http_1",
        "customer.subscription.deleted",
        "sub_main_1",
        "canceled",
    );

    let (status, body) = send(app(&world), webhook(payload, Some(&signature))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"received": true, "event_id": "evt_http_1"}));
    assert!(world.ledger.subscriptions().is_empty());
}

#[tokio::test]
async fn unsigned_or_tampered_webhook_is_rejected() {
    let world = World::new().await;
    let (payload, signature) = signed_subscription_event(
        "evt_http_2",
        "customer.subscription.deleted",
        "sub_main_1",
        "canceled",
    );

    let (status, _) = send(app(&world), webhook(payload.clone(), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let mut tampered = payload;
    tampered.extend_from_slice(b" ");
    let (status, body) = send(app(&world), webhook(tampered, Some(&signature))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_SIGNATURE");

    assert_eq!(world.ledger.subscriptions().len(), 1);
}
