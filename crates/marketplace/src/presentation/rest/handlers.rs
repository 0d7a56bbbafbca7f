use ashmart_core::{
    Actor, Demand, DemandId, NewDemand, NewOrder, NewProduct, Order, OrderId, Product, ProductId,
};
use ashmart_matching::MatchCandidate;
use ashmart_ports::{Clock, UserDirectory};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use std::sync::Arc;

use crate::application::Summary;
use crate::presentation::rest::{
    ApiError,
    dto::*,
    extract::{JsonBody, QueryParams},
    identity::extract_actor,
};

use super::AppState;

type Shared<C> = State<Arc<AppState<C>>>;

/// Resolve the caller and note them in the user directory
async fn identify<C: Clock>(headers: &HeaderMap, state: &AppState<C>) -> Result<Actor, ApiError> {
    let actor = extract_actor(headers)?;
    state.users.record(&actor).await;
    Ok(actor)
}

fn product_id(raw: &str) -> Result<ProductId, ApiError> {
    ProductId::parse(raw).map_err(|_| ApiError::invalid_parameter("id", "not a product id"))
}

fn demand_id(raw: &str) -> Result<DemandId, ApiError> {
    DemandId::parse(raw).map_err(|_| ApiError::invalid_parameter("id", "not a demand id"))
}

fn order_id(raw: &str) -> Result<OrderId, ApiError> {
    OrderId::parse(raw).map_err(|_| ApiError::invalid_parameter("id", "not an order id"))
}

/// GET /health
pub async fn health<C: Clock>(State(state): Shared<C>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        name: state.name.clone(),
    })
}

// ============================================================================
// Catalog
// ============================================================================

/// POST /api/products
pub async fn create_product<C: Clock>(
    headers: HeaderMap,
    State(state): Shared<C>,
    JsonBody(req): JsonBody<NewProduct>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let actor = identify(&headers, &state).await?;
    let product = state.catalog().put_product(&actor, req).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /api/products
pub async fn list_products<C: Clock>(
    headers: HeaderMap,
    State(state): Shared<C>,
    QueryParams(query): QueryParams<ProductQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    identify(&headers, &state).await?;
    let listing = state.catalog().list_products(query.into_filter()?).await?;
    Ok(Json(listing.to_vec()))
}

/// GET /api/products/my
pub async fn my_products<C: Clock>(
    headers: HeaderMap,
    State(state): Shared<C>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let actor = identify(&headers, &state).await?;
    let listing = state.catalog().my_products(&actor).await?;
    Ok(Json(listing.to_vec()))
}

/// GET /api/products/{id}
pub async fn get_product<C: Clock>(
    headers: HeaderMap,
    State(state): Shared<C>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    identify(&headers, &state).await?;
    let product = state.catalog().get_product(product_id(&id)?).await?;
    Ok(Json(product))
}

/// POST /api/products/{id}/retire
pub async fn retire_product<C: Clock>(
    headers: HeaderMap,
    State(state): Shared<C>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let actor = identify(&headers, &state).await?;
    let product = state
        .catalog()
        .retire_product(&actor, product_id(&id)?)
        .await?;
    Ok(Json(product))
}

/// PUT /api/products/{id}/price
pub async fn reprice_product<C: Clock>(
    headers: HeaderMap,
    State(state): Shared<C>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<RepriceRequest>,
) -> Result<Json<Product>, ApiError> {
    let actor = identify(&headers, &state).await?;
    let product = state
        .catalog()
        .reprice_product(&actor, product_id(&id)?, req.price_per_ton)
        .await?;
    Ok(Json(product))
}

/// POST /api/demands
pub async fn create_demand<C: Clock>(
    headers: HeaderMap,
    State(state): Shared<C>,
    JsonBody(req): JsonBody<NewDemand>,
) -> Result<(StatusCode, Json<Demand>), ApiError> {
    let actor = identify(&headers, &state).await?;
    let demand = state.catalog().put_demand(&actor, req).await?;
    Ok((StatusCode::CREATED, Json(demand)))
}

/// GET /api/demands
pub async fn list_demands<C: Clock>(
    headers: HeaderMap,
    State(state): Shared<C>,
    QueryParams(query): QueryParams<DemandQuery>,
) -> Result<Json<Vec<Demand>>, ApiError> {
    identify(&headers, &state).await?;
    let listing = state.catalog().list_demands(query.into_filter()?).await?;
    Ok(Json(listing.to_vec()))
}

/// GET /api/demands/my
pub async fn my_demands<C: Clock>(
    headers: HeaderMap,
    State(state): Shared<C>,
) -> Result<Json<Vec<Demand>>, ApiError> {
    let actor = identify(&headers, &state).await?;
    let listing = state.catalog().my_demands(&actor).await?;
    Ok(Json(listing.to_vec()))
}

/// GET /api/demands/{id}
pub async fn get_demand<C: Clock>(
    headers: HeaderMap,
    State(state): Shared<C>,
    Path(id): Path<String>,
) -> Result<Json<Demand>, ApiError> {
    identify(&headers, &state).await?;
    let demand = state.catalog().get_demand(demand_id(&id)?).await?;
    Ok(Json(demand))
}

// ============================================================================
// Order ledger
// ============================================================================

/// POST /api/orders
pub async fn place_order<C: Clock>(
    headers: HeaderMap,
    State(state): Shared<C>,
    JsonBody(req): JsonBody<NewOrder>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let actor = identify(&headers, &state).await?;
    let order = state.ledger().place_order(&actor, req).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /api/orders/my
pub async fn my_orders<C: Clock>(
    headers: HeaderMap,
    State(state): Shared<C>,
) -> Result<Json<Vec<Order>>, ApiError> {
    let actor = identify(&headers, &state).await?;
    Ok(Json(state.ledger().orders_for(&actor).await?))
}

/// GET /api/orders/{id}
pub async fn get_order<C: Clock>(
    headers: HeaderMap,
    State(state): Shared<C>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let actor = identify(&headers, &state).await?;
    Ok(Json(state.ledger().get(&actor, order_id(&id)?).await?))
}

/// POST /api/orders/{id}/status
pub async fn update_order_status<C: Clock>(
    headers: HeaderMap,
    State(state): Shared<C>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateStatusRequest>,
) -> Result<Json<Order>, ApiError> {
    let actor = identify(&headers, &state).await?;
    let order = state
        .ledger()
        .transition(&actor, order_id(&id)?, req.status()?)
        .await?;
    Ok(Json(order))
}

// ============================================================================
// Matching
// ============================================================================

/// GET /api/matching/suggestions
pub async fn suggestions<C: Clock>(
    headers: HeaderMap,
    State(state): Shared<C>,
) -> Result<Json<SuggestionsResponse>, ApiError> {
    let actor = identify(&headers, &state).await?;
    let suggestions = state.matching().suggestions_for(&actor).await?;
    Ok(Json(SuggestionsResponse { suggestions }))
}

/// GET /api/matching/demands/{id}
pub async fn matches_for_demand<C: Clock>(
    headers: HeaderMap,
    State(state): Shared<C>,
    Path(id): Path<String>,
) -> Result<Json<Vec<MatchCandidate>>, ApiError> {
    identify(&headers, &state).await?;
    let matches = state.matching().suggest_for_demand(demand_id(&id)?).await?;
    Ok(Json(matches))
}

/// GET /api/matching/products/{id}
pub async fn matches_for_product<C: Clock>(
    headers: HeaderMap,
    State(state): Shared<C>,
    Path(id): Path<String>,
) -> Result<Json<Vec<MatchCandidate>>, ApiError> {
    identify(&headers, &state).await?;
    let matches = state
        .matching()
        .suggest_for_product(product_id(&id)?)
        .await?;
    Ok(Json(matches))
}

// ============================================================================
// Analytics
// ============================================================================

/// GET /api/analytics/dashboard
pub async fn dashboard<C: Clock>(
    headers: HeaderMap,
    State(state): Shared<C>,
) -> Result<Json<Summary>, ApiError> {
    let actor = identify(&headers, &state).await?;
    Ok(Json(state.analytics().dashboard_for(&actor).await?))
}
