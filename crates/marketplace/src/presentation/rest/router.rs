use ashmart_matching::WeightedScorer;
use ashmart_ports::Clock;
use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::application::{
    AnalyticsAggregator, CatalogService, EngineSettings, MatchingService, OrderLedger,
};
use crate::infrastructure::{
    InMemoryDemandRepository, InMemoryOrderRepository, InMemoryProductRepository,
    InMemoryUserDirectory,
};

pub type Catalog<C> = CatalogService<C, InMemoryProductRepository, InMemoryDemandRepository>;
pub type Matching<C> =
    MatchingService<C, InMemoryProductRepository, InMemoryDemandRepository, WeightedScorer>;
pub type Ledger<C> = OrderLedger<
    C,
    InMemoryProductRepository,
    InMemoryDemandRepository,
    InMemoryOrderRepository,
>;
pub type Analytics<C> = AnalyticsAggregator<
    C,
    InMemoryProductRepository,
    InMemoryDemandRepository,
    InMemoryOrderRepository,
    InMemoryUserDirectory,
>;

/// Application state shared across handlers - uses concrete infrastructure types
pub struct AppState<C: Clock> {
    pub name: String,
    pub clock: Arc<C>,
    pub product_repo: Arc<InMemoryProductRepository>,
    pub demand_repo: Arc<InMemoryDemandRepository>,
    pub order_repo: Arc<InMemoryOrderRepository>,
    pub users: Arc<InMemoryUserDirectory>,
    pub scorer: Arc<WeightedScorer>,
    pub settings: EngineSettings,
}

impl<C: Clock> AppState<C> {
    pub fn new(
        clock: Arc<C>,
        product_repo: Arc<InMemoryProductRepository>,
        demand_repo: Arc<InMemoryDemandRepository>,
        order_repo: Arc<InMemoryOrderRepository>,
        users: Arc<InMemoryUserDirectory>,
        settings: EngineSettings,
    ) -> Self {
        AppState {
            name: "Ashmart Marketplace".to_string(),
            clock,
            product_repo,
            demand_repo,
            order_repo,
            users,
            scorer: Arc::new(WeightedScorer::new(settings.weights)),
            settings,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn catalog(&self) -> Catalog<C> {
        CatalogService::new(
            Arc::clone(&self.clock),
            Arc::clone(&self.product_repo),
            Arc::clone(&self.demand_repo),
            &self.settings,
        )
    }

    pub fn matching(&self) -> Matching<C> {
        MatchingService::new(
            Arc::clone(&self.clock),
            Arc::clone(&self.product_repo),
            Arc::clone(&self.demand_repo),
            Arc::clone(&self.scorer),
            &self.settings,
        )
    }

    pub fn ledger(&self) -> Ledger<C> {
        OrderLedger::new(
            Arc::clone(&self.clock),
            Arc::clone(&self.product_repo),
            Arc::clone(&self.demand_repo),
            Arc::clone(&self.order_repo),
            &self.settings,
        )
    }

    pub fn analytics(&self) -> Analytics<C> {
        AnalyticsAggregator::new(
            Arc::clone(&self.clock),
            Arc::clone(&self.product_repo),
            Arc::clone(&self.demand_repo),
            Arc::clone(&self.order_repo),
            Arc::clone(&self.users),
            &self.settings,
        )
    }
}

/// Create the REST API router
pub fn create_router<C: Clock + 'static>(state: Arc<AppState<C>>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::<C>))
        // Catalog
        .route(
            "/api/products",
            post(handlers::create_product::<C>).get(handlers::list_products::<C>),
        )
        .route("/api/products/my", get(handlers::my_products::<C>))
        .route("/api/products/{id}", get(handlers::get_product::<C>))
        .route(
            "/api/products/{id}/retire",
            post(handlers::retire_product::<C>),
        )
        .route(
            "/api/products/{id}/price",
            put(handlers::reprice_product::<C>),
        )
        .route(
            "/api/demands",
            post(handlers::create_demand::<C>).get(handlers::list_demands::<C>),
        )
        .route("/api/demands/my", get(handlers::my_demands::<C>))
        .route("/api/demands/{id}", get(handlers::get_demand::<C>))
        // Order ledger
        .route("/api/orders", post(handlers::place_order::<C>))
        .route("/api/orders/my", get(handlers::my_orders::<C>))
        .route("/api/orders/{id}", get(handlers::get_order::<C>))
        .route(
            "/api/orders/{id}/status",
            post(handlers::update_order_status::<C>),
        )
        // Matching
        .route(
            "/api/matching/suggestions",
            get(handlers::suggestions::<C>),
        )
        .route(
            "/api/matching/demands/{id}",
            get(handlers::matches_for_demand::<C>),
        )
        .route(
            "/api/matching/products/{id}",
            get(handlers::matches_for_product::<C>),
        )
        // Analytics
        .route("/api/analytics/dashboard", get(handlers::dashboard::<C>))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
