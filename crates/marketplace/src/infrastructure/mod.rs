pub mod config;
pub mod repositories;

pub use config::{
    ConfigError, DemandSeed, EngineConfig, MarketplaceConfig, ProductSeed, ServerConfig, UserSeed,
};
pub use repositories::{
    DEFAULT_LOCK_TIMEOUT, InMemoryDemandRepository, InMemoryOrderRepository,
    InMemoryProductRepository, InMemoryUserDirectory,
};
