//! Ports for the catalog store (products and demands)
//!
//! Follows Interface Segregation Principle with focused traits.

use ashmart_core::{Demand, DemandId, Price, Product, ProductId, Timestamp, Tons};
use async_trait::async_trait;

use crate::error::MarketResult;

/// Read operations for product listings
#[async_trait]
pub trait ProductReader: Send + Sync {
    /// Get a product by ID
    async fn get(&self, id: ProductId) -> Option<Product>;

    /// Snapshot of every product; each record is read under its own lock
    async fn list(&self) -> Vec<Product>;
}

/// Write operations for product listings
///
/// Quantity mutations are atomic check-and-mutate operations on a single
/// record. Implementations must bound how long they wait for the record
/// and fail with `MarketError::Timeout` rather than block.
#[async_trait]
pub trait ProductWriter: Send + Sync {
    /// Insert a new listing
    async fn insert(&self, product: Product);

    /// Subtract `amount` if available; returns the product after the change
    async fn decrement_quantity(
        &self,
        id: ProductId,
        amount: Tons,
        now: Timestamp,
    ) -> MarketResult<Product>;

    /// Give back `amount` taken by a cancelled order
    async fn restore_quantity(
        &self,
        id: ProductId,
        amount: Tons,
        now: Timestamp,
    ) -> MarketResult<Product>;

    /// Zero the stock and mark the listing inactive
    async fn retire(&self, id: ProductId, now: Timestamp) -> MarketResult<Product>;

    /// Change the listing price
    async fn reprice(&self, id: ProductId, price: Price, now: Timestamp) -> MarketResult<Product>;
}

/// Combined product store
pub trait ProductStore: ProductReader + ProductWriter {}

impl<T: ProductReader + ProductWriter> ProductStore for T {}

/// Read operations for demand requests
#[async_trait]
pub trait DemandReader: Send + Sync {
    async fn get(&self, id: DemandId) -> Option<Demand>;

    async fn list(&self) -> Vec<Demand>;
}

/// Write operations for demand requests
#[async_trait]
pub trait DemandWriter: Send + Sync {
    async fn insert(&self, demand: Demand);

    /// Mark every open demand whose deadline passed as expired.
    /// Returns the ids that changed.
    async fn expire_due(&self, now: Timestamp) -> Vec<DemandId>;

    /// Store the confirmed coverage of a demand, flipping it to fulfilled when met
    async fn record_confirmed(&self, id: DemandId, confirmed_quantity: Tons)
    -> MarketResult<Demand>;
}

/// Combined demand store
pub trait DemandStore: DemandReader + DemandWriter {}

impl<T: DemandReader + DemandWriter> DemandStore for T {}
