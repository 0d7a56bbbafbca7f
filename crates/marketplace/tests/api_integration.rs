//! Integration tests for the REST API
//!
//! Tests the full HTTP stack including:
//! - Identity headers and role checks
//! - Catalog endpoints
//! - Order placement and status updates
//! - Matching suggestions and dashboards

use ashmart::{
    AppState, EngineSettings, InMemoryDemandRepository, InMemoryOrderRepository,
    InMemoryProductRepository, InMemoryUserDirectory, create_router,
};
use ashmart_clock::ManualClock;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

// ============================================================================
// Test Fixtures
// ============================================================================

fn create_test_state() -> Arc<AppState<ManualClock>> {
    Arc::new(AppState::new(
        Arc::new(ManualClock::default()),
        Arc::new(InMemoryProductRepository::new()),
        Arc::new(InMemoryDemandRepository::new()),
        Arc::new(InMemoryOrderRepository::new()),
        Arc::new(InMemoryUserDirectory::new()),
        EngineSettings::default(),
    ))
}

fn request(
    method: &str,
    uri: &str,
    identity: Option<(&str, &str)>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((user, role)) = identity {
        builder = builder.header("X-User-Id", user).header("X-User-Role", role);
    }
    match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => s.parse().unwrap(),
        other => other.to_string().parse().unwrap(),
    }
}

fn product_body(quantity: u64, price: u64, city: &str) -> Value {
    json!({
        "title": format!("Fly ash from {}", city),
        "ash_type": "fly_ash",
        "quantity_available": quantity,
        "price_per_ton": price,
        "location": { "address": "Plant gate 2", "city": city, "state": "Maharashtra" },
        "quality_specs": { "loi_percent": 4.5 }
    })
}

fn demand_body(quantity: u64, max_price: u64) -> Value {
    json!({
        "title": "Fly ash for PPC blending",
        "ash_type": "fly_ash",
        "quantity_required": quantity,
        "max_price_per_ton": max_price,
        "delivery": { "address": "Cement works", "city": "Mumbai", "state": "Maharashtra" },
        "required_by": "2099-12-31T00:00:00Z"
    })
}

const SUPPLIER: Option<(&str, &str)> = Some(("supplier-1", "supplier"));
const BUYER: Option<(&str, &str)> = Some(("buyer-1", "buyer"));
const ADMIN: Option<(&str, &str)> = Some(("admin-1", "admin"));

async fn create_product(app: &Router, quantity: u64, price: u64, city: &str) -> String {
    let (status, json) = send(
        app,
        request(
            "POST",
            "/api/products",
            SUPPLIER,
            Some(product_body(quantity, price, city)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json["id"].as_str().unwrap().to_string()
}

async fn place_order(app: &Router, product_id: &str, quantity: u64) -> (StatusCode, Value) {
    send(
        app,
        request(
            "POST",
            "/api/orders",
            BUYER,
            Some(json!({
                "product_id": product_id,
                "quantity": quantity,
                "delivery_address": "Plot 12, MIDC Taloja"
            })),
        ),
    )
    .await
}

// ============================================================================
// Identity
// ============================================================================

#[tokio::test]
async fn test_health_needs_no_identity() {
    let app = create_router(create_test_state());
    let (status, json) = send(&app, request("GET", "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_missing_identity_is_unauthenticated() {
    let app = create_router(create_test_state());

    let (status, json) = send(&app, request("GET", "/api/products", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "unauthenticated");

    let (status, _) = send(
        &app,
        request("GET", "/api/products", Some(("u1", "auditor")), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_create_and_fetch_product() {
    let app = create_router(create_test_state());
    let id = create_product(&app, 100, 400, "Mumbai").await;

    let (status, json) = send(
        &app,
        request("GET", &format!("/api/products/{}", id), BUYER, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["supplier_id"], "supplier-1");
    assert_eq!(json["quantity_available"], 100);
    assert_eq!(json["is_active"], true);
    assert_eq!(decimal(&json["price_per_ton"]), Decimal::from(400));
}

#[tokio::test]
async fn test_buyers_cannot_create_products() {
    let app = create_router(create_test_state());
    let (status, json) = send(
        &app,
        request(
            "POST",
            "/api/products",
            BUYER,
            Some(product_body(10, 100, "Pune")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "forbidden");
}

#[tokio::test]
async fn test_invalid_listing_is_rejected() {
    let app = create_router(create_test_state());
    let (status, json) = send(
        &app,
        request(
            "POST",
            "/api/products",
            SUPPLIER,
            Some(product_body(0, 100, "Pune")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
}

#[tokio::test]
async fn test_undecodable_bodies_are_validation_errors() {
    let app = create_router(create_test_state());

    let mut unknown_type = product_body(10, 100, "Pune");
    unknown_type["ash_type"] = json!("coal");
    let mut negative = product_body(10, 100, "Pune");
    negative["quantity_available"] = json!(-3);
    let mut missing = product_body(10, 100, "Pune");
    missing.as_object_mut().unwrap().remove("location");

    for body in [unknown_type, negative, missing] {
        let (status, json) = send(
            &app,
            request("POST", "/api/products", SUPPLIER, Some(body)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_error");
        assert!(json["message"].as_str().unwrap().contains("Malformed request body"));
    }

    let (status, json) = send(
        &app,
        request(
            "POST",
            "/api/orders",
            BUYER,
            Some(json!({ "product_id": "6f9619ff-8b86-4011-b42d-00c04fc964ff" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/orders/6f9619ff-8b86-4011-b42d-00c04fc964ff/status",
            SUPPLIER,
            Some(json!({ "state": "confirmed" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = send(
        &app,
        request("GET", "/api/products?min_quantity=lots", BUYER, None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
}

#[tokio::test]
async fn test_product_filters() {
    let app = create_router(create_test_state());
    create_product(&app, 100, 400, "Mumbai").await;
    create_product(&app, 50, 450, "Pune").await;

    let (status, json) = send(
        &app,
        request("GET", "/api/products?city=pune", BUYER, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let listed = json.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["location"]["city"], "Pune");

    let (_, json) = send(
        &app,
        request("GET", "/api/products?min_quantity=60", BUYER, None),
    )
    .await;
    assert_eq!(json.as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        request("GET", "/api/products?ash_type=gypsum", BUYER, None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_and_malformed_ids() {
    let app = create_router(create_test_state());

    let (status, json) = send(
        &app,
        request(
            "GET",
            "/api/products/6f9619ff-8b86-4011-b42d-00c04fc964ff",
            BUYER,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");

    let (status, _) = send(
        &app,
        request("GET", "/api/products/not-a-uuid", BUYER, None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Orders
// ============================================================================

#[tokio::test]
async fn test_oversell_is_a_conflict() {
    let app = create_router(create_test_state());
    let id = create_product(&app, 30, 200, "Nagpur").await;

    let (status, json) = place_order(&app, &id, 20).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["status"], "pending");
    assert_eq!(decimal(&json["total_amount"]), Decimal::from(4000));

    let (status, json) = place_order(&app, &id, 20).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "insufficient_quantity");

    let (_, product) = send(
        &app,
        request("GET", &format!("/api/products/{}", id), BUYER, None),
    )
    .await;
    assert_eq!(product["quantity_available"], 10);
}

#[tokio::test]
async fn test_status_updates() {
    let app = create_router(create_test_state());
    let id = create_product(&app, 30, 200, "Nagpur").await;
    let (_, order) = place_order(&app, &id, 5).await;
    let status_uri = format!("/api/orders/{}/status", order["id"].as_str().unwrap());

    // Buyer may not confirm
    let (status, _) = send(
        &app,
        request(
            "POST",
            &status_uri,
            BUYER,
            Some(json!({ "status": "confirmed" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Skipping a step is a conflict
    let (status, json) = send(
        &app,
        request(
            "POST",
            &status_uri,
            SUPPLIER,
            Some(json!({ "status": "in_transit" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "invalid_transition");

    // Outsiders are refused
    let (status, _) = send(
        &app,
        request(
            "POST",
            &status_uri,
            Some(("supplier-2", "supplier")),
            Some(json!({ "status": "confirmed" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, json) = send(
        &app,
        request(
            "POST",
            &status_uri,
            SUPPLIER,
            Some(json!({ "status": "confirmed" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "confirmed");

    let (status, _) = send(
        &app,
        request(
            "POST",
            &status_uri,
            SUPPLIER,
            Some(json!({ "status": "shipped" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_buyer_cancellation_restores_stock() {
    let app = create_router(create_test_state());
    let id = create_product(&app, 30, 200, "Nagpur").await;
    let (_, order) = place_order(&app, &id, 12).await;
    let order_id = order["id"].as_str().unwrap();

    let (status, json) = send(
        &app,
        request(
            "POST",
            &format!("/api/orders/{}/status", order_id),
            BUYER,
            Some(json!({ "status": "cancelled" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "cancelled");

    let (_, product) = send(
        &app,
        request("GET", &format!("/api/products/{}", id), BUYER, None),
    )
    .await;
    assert_eq!(product["quantity_available"], 30);

    let (_, mine) = send(&app, request("GET", "/api/orders/my", BUYER, None)).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);
}

// ============================================================================
// Matching
// ============================================================================

#[tokio::test]
async fn test_buyer_suggestions() {
    let app = create_router(create_test_state());
    let near = create_product(&app, 100, 400, "Mumbai").await;
    let far = create_product(&app, 50, 450, "Pune").await;

    let (status, demand) = send(
        &app,
        request("POST", "/api/demands", BUYER, Some(demand_body(100, 500))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = send(
        &app,
        request("GET", "/api/matching/suggestions", BUYER, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let groups = json["suggestions"].as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["demand"]["id"], demand["id"]);

    assert!(groups[0].get("matching_demands").is_none());
    let matches = groups[0]["matching_products"].as_array().unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0]["product_id"], near.as_str());
    assert_eq!(decimal(&matches[0]["match_percentage"]), Decimal::from(76));
    assert_eq!(matches[1]["product_id"], far.as_str());
    assert_eq!(decimal(&matches[1]["match_percentage"]), Decimal::from(38));

    // Admins get an empty list rather than an error
    let (status, json) = send(
        &app,
        request("GET", "/api/matching/suggestions", ADMIN, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["suggestions"], json!([]));
}

#[tokio::test]
async fn test_supplier_suggestions_skip_unmatched_listings() {
    let app = create_router(create_test_state());
    create_product(&app, 100, 400, "Mumbai").await;
    // Priced above every demand ceiling
    create_product(&app, 100, 900, "Mumbai").await;
    send(
        &app,
        request("POST", "/api/demands", BUYER, Some(demand_body(40, 500))),
    )
    .await;

    let (status, json) = send(
        &app,
        request("GET", "/api/matching/suggestions", SUPPLIER, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let groups = json["suggestions"].as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert!(groups[0]["product"].is_object());
    assert_eq!(groups[0]["matching_demands"].as_array().unwrap().len(), 1);
}

// ============================================================================
// Analytics
// ============================================================================

#[tokio::test]
async fn test_dashboards_are_role_scoped() {
    let app = create_router(create_test_state());
    let id = create_product(&app, 30, 200, "Nagpur").await;
    let (_, order) = place_order(&app, &id, 10).await;
    send(
        &app,
        request(
            "POST",
            &format!("/api/orders/{}/status", order["id"].as_str().unwrap()),
            SUPPLIER,
            Some(json!({ "status": "confirmed" })),
        ),
    )
    .await;

    let (status, json) = send(
        &app,
        request("GET", "/api/analytics/dashboard", SUPPLIER, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["role"], "supplier");
    assert_eq!(json["my_products"], 1);
    assert_eq!(json["my_orders"], 1);
    assert_eq!(decimal(&json["total_revenue"]), Decimal::from(2000));

    let (_, json) = send(
        &app,
        request("GET", "/api/analytics/dashboard", ADMIN, None),
    )
    .await;
    assert_eq!(json["role"], "admin");
    // supplier-1, buyer-1 and admin-1 have all been seen
    assert_eq!(json["total_users"], 3);
    assert_eq!(json["total_products"], 1);
    assert_eq!(json["total_orders"], 1);
    assert_eq!(json["total_demands"], 0);
    assert_eq!(json["recent_orders"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        request(
            "GET",
            "/api/analytics/dashboard",
            Some(("truck-1", "logistics")),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
