//! Port for order persistence

use ashmart_core::{Order, OrderId, OrderStatus, Timestamp};
use async_trait::async_trait;

use crate::error::MarketResult;

/// Read operations for orders
#[async_trait]
pub trait OrderReader: Send + Sync {
    async fn get(&self, id: OrderId) -> Option<Order>;

    async fn list(&self) -> Vec<Order>;
}

/// Write operations for orders
#[async_trait]
pub trait OrderWriter: Send + Sync {
    async fn insert(&self, order: Order) -> MarketResult<()>;

    /// Atomically move an order from `expected` to `next`.
    ///
    /// Fails with `InvalidTransition` if the stored status is no longer
    /// `expected` or the graph forbids the move.
    async fn transition(
        &self,
        id: OrderId,
        expected: OrderStatus,
        next: OrderStatus,
        now: Timestamp,
    ) -> MarketResult<Order>;

    /// Undo a cancellation whose compensating restore failed
    async fn reinstate(
        &self,
        id: OrderId,
        previous: OrderStatus,
        now: Timestamp,
    ) -> MarketResult<Order>;

    /// Remove an order that was never acknowledged to the caller
    async fn discard(&self, id: OrderId) -> bool;
}

/// Combined order store
pub trait OrderStore: OrderReader + OrderWriter {}

impl<T: OrderReader + OrderWriter> OrderStore for T {}
