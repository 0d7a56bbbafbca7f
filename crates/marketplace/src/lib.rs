//! Ashmart Marketplace
//!
//! Server-side engine for a coal ash marketplace: suppliers list fly, bottom
//! and pond ash, buyers post demand requests, and the engine matches the two,
//! runs orders through their lifecycle and reports role-scoped figures.
//!
//! # Architecture
//!
//! - **Application**: Catalog store, matching engine, order ledger and
//!   analytics aggregator, generic over the ports in `ashmart-ports`
//! - **Infrastructure**: In-memory repositories, user directory, JSON config
//! - **Presentation**: REST API (axum)
//!
//! The caller's identity arrives as `X-User-Id` / `X-User-Role` headers set
//! by the authentication layer in front of the engine.
//!
//! # Example
//!
//! ```ignore
//! use ashmart::{Marketplace, MarketplaceConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = MarketplaceConfig::default();
//!     let marketplace = Marketplace::from_config(config).await.unwrap();
//!     marketplace.run().await.unwrap();
//! }
//! ```

pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use application::{
    AnalyticsAggregator, CatalogService, DemandFilter, EngineSettings, Listing, MatchingService,
    OrderLedger, ProductFilter, SuggestionGroup, Summary,
};
pub use infrastructure::{
    ConfigError, InMemoryDemandRepository, InMemoryOrderRepository, InMemoryProductRepository,
    InMemoryUserDirectory, MarketplaceConfig,
};
pub use presentation::{ApiError, AppState, create_router};

use ashmart_clock::SystemClock;
use ashmart_core::{Actor, Role, UserId};
use ashmart_ports::{Clock, UserDirectory};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// The marketplace server
pub struct Marketplace<C: Clock + 'static> {
    pub config: MarketplaceConfig,
    pub clock: Arc<C>,
    pub product_repo: Arc<InMemoryProductRepository>,
    pub demand_repo: Arc<InMemoryDemandRepository>,
    pub order_repo: Arc<InMemoryOrderRepository>,
    pub users: Arc<InMemoryUserDirectory>,
}

impl<C: Clock + 'static> Marketplace<C> {
    /// Create an empty marketplace with the given clock
    pub fn with_clock(config: MarketplaceConfig, clock: Arc<C>) -> Self {
        Marketplace {
            config,
            clock,
            product_repo: Arc::new(InMemoryProductRepository::new()),
            demand_repo: Arc::new(InMemoryDemandRepository::new()),
            order_repo: Arc::new(InMemoryOrderRepository::new()),
            users: Arc::new(InMemoryUserDirectory::new()),
        }
    }

    pub fn settings(&self) -> EngineSettings {
        self.config.settings()
    }

    /// Create the application state shared by the REST handlers
    pub fn state(&self) -> Arc<AppState<C>> {
        Arc::new(
            AppState::new(
                Arc::clone(&self.clock),
                Arc::clone(&self.product_repo),
                Arc::clone(&self.demand_repo),
                Arc::clone(&self.order_repo),
                Arc::clone(&self.users),
                self.settings(),
            )
            .with_name(self.config.name.clone()),
        )
    }

    /// Create the REST API router
    pub fn rest_router(&self) -> Router {
        create_router(self.state())
    }

    /// Load the users, listings and demands named in the config.
    ///
    /// Seeds go through the same validation as API calls.
    pub async fn seed(&self) -> Result<(), ConfigError> {
        let state = self.state();

        for user in &self.config.users {
            let user_id = UserId::new(user.user_id.as_str()).map_err(|e| ConfigError::Seed {
                entity: "user",
                message: e.to_string(),
            })?;
            self.users.record(&Actor::new(user_id, user.role)).await;
        }

        let catalog = state.catalog();
        for seed in &self.config.products {
            let supplier = seed_actor(&seed.supplier_id, Role::Supplier)?;
            self.users.record(&supplier).await;
            catalog
                .put_product(&supplier, seed.listing.clone())
                .await
                .map_err(|e| ConfigError::Seed {
                    entity: "product",
                    message: e.to_string(),
                })?;
        }
        for seed in &self.config.demands {
            let buyer = seed_actor(&seed.buyer_id, Role::Buyer)?;
            self.users.record(&buyer).await;
            catalog
                .put_demand(&buyer, seed.request.clone())
                .await
                .map_err(|e| ConfigError::Seed {
                    entity: "demand",
                    message: e.to_string(),
                })?;
        }

        tracing::info!(
            users = self.users.count().await,
            products = self.product_repo.len(),
            demands = self.demand_repo.len(),
            "Seed data loaded"
        );
        Ok(())
    }

    /// Periodically mark demands past their deadline as expired
    pub fn spawn_expiry_sweep(&self) -> Option<tokio::task::JoinHandle<()>> {
        let interval = self.config.engine.expiry_sweep_interval()?;
        let state = self.state();

        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                if let Err(e) = state.catalog().expire_demands().await {
                    tracing::warn!(error = %e, "Demand expiry sweep failed");
                }
            }
        }))
    }

    /// Run the marketplace server
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = format!("{}:{}", self.config.server.host, self.config.server.port);
        let sweeper = self.spawn_expiry_sweep();
        let router = self.rest_router();

        tracing::info!("Marketplace listening on {}", addr);

        let listener = TcpListener::bind(&addr).await?;
        let served = axum::serve(listener, router).await;

        if let Some(sweeper) = sweeper {
            sweeper.abort();
        }
        served?;
        Ok(())
    }
}

impl Marketplace<SystemClock> {
    /// Create an empty marketplace on wall-clock time
    pub fn new(config: MarketplaceConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    /// Create a marketplace and load its seed data
    pub async fn from_config(config: MarketplaceConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let marketplace = Self::new(config);
        marketplace.seed().await?;
        Ok(marketplace)
    }
}

fn seed_actor(raw: &str, role: Role) -> Result<Actor, ConfigError> {
    let user_id = UserId::new(raw).map_err(|e| ConfigError::Seed {
        entity: "user",
        message: e.to_string(),
    })?;
    Ok(Actor::new(user_id, role))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ashmart_clock::ManualClock;

    #[tokio::test]
    async fn test_seed_loads_config_entries() {
        let config = MarketplaceConfig::from_json(
            r#"{
                "users": [{ "user_id": "admin-1", "role": "admin" }],
                "products": [{
                    "supplier_id": "s1",
                    "title": "Bottom ash",
                    "ash_type": "bottom_ash",
                    "quantity_available": 40,
                    "price_per_ton": 75,
                    "location": { "address": "Yard", "city": "Korba", "state": "Chhattisgarh" }
                }],
                "demands": [{
                    "buyer_id": "b1",
                    "title": "Road fill",
                    "ash_type": "bottom_ash",
                    "quantity_required": 20,
                    "max_price_per_ton": 90,
                    "delivery": { "address": "NH-130", "city": "Bilaspur", "state": "Chhattisgarh" },
                    "required_by": "2099-06-30T00:00:00Z"
                }]
            }"#,
        )
        .unwrap();

        let marketplace = Marketplace::with_clock(config, Arc::new(ManualClock::default()));
        marketplace.seed().await.unwrap();

        assert_eq!(marketplace.users.count().await, 3);
        assert_eq!(marketplace.product_repo.len(), 1);
        assert_eq!(marketplace.demand_repo.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_seed_is_rejected() {
        let config = MarketplaceConfig::from_json(
            r#"{
                "products": [{
                    "supplier_id": "s1",
                    "title": "Empty lot",
                    "ash_type": "fly_ash",
                    "quantity_available": 0,
                    "price_per_ton": 75,
                    "location": { "address": "Yard", "city": "Korba", "state": "Chhattisgarh" }
                }]
            }"#,
        )
        .unwrap();

        let marketplace = Marketplace::with_clock(config, Arc::new(ManualClock::default()));
        let err = marketplace.seed().await.unwrap_err();
        assert!(matches!(err, ConfigError::Seed { entity: "product", .. }));
    }
}
