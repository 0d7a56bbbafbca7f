//! In-memory order repository implementation

use ashmart_core::{DomainError, Order, OrderId, OrderStatus, Timestamp};
use ashmart_ports::{MarketError, MarketResult, OrderReader, OrderWriter};
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;

/// In-memory order ledger storage
///
/// Status changes happen under the DashMap entry lock, which makes the
/// expected-status check and the write a single step.
pub struct InMemoryOrderRepository {
    orders: Arc<DashMap<OrderId, Order>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self {
            orders: Arc::new(DashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

impl Default for InMemoryOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InMemoryOrderRepository {
    fn clone(&self) -> Self {
        Self {
            orders: Arc::clone(&self.orders),
        }
    }
}

#[async_trait]
impl OrderReader for InMemoryOrderRepository {
    async fn get(&self, id: OrderId) -> Option<Order> {
        self.orders.get(&id).map(|o| o.value().clone())
    }

    async fn list(&self) -> Vec<Order> {
        self.orders.iter().map(|o| o.value().clone()).collect()
    }
}

#[async_trait]
impl OrderWriter for InMemoryOrderRepository {
    async fn insert(&self, order: Order) -> MarketResult<()> {
        match self.orders.entry(order.id) {
            Entry::Occupied(_) => Err(MarketError::validation(format!(
                "order {} already exists",
                order.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(order);
                Ok(())
            }
        }
    }

    async fn transition(
        &self,
        id: OrderId,
        expected: OrderStatus,
        next: OrderStatus,
        now: Timestamp,
    ) -> MarketResult<Order> {
        let mut order = self
            .orders
            .get_mut(&id)
            .ok_or_else(|| MarketError::not_found("Order", id))?;

        // Lost a race with another transition
        if order.status != expected {
            return Err(DomainError::InvalidTransition {
                from: order.status,
                to: next,
            }
            .into());
        }
        order.transition(next, now)?;
        Ok(order.clone())
    }

    async fn reinstate(
        &self,
        id: OrderId,
        previous: OrderStatus,
        now: Timestamp,
    ) -> MarketResult<Order> {
        let mut order = self
            .orders
            .get_mut(&id)
            .ok_or_else(|| MarketError::not_found("Order", id))?;
        order.status = previous;
        order.updated_at = now;
        Ok(order.clone())
    }

    async fn discard(&self, id: OrderId) -> bool {
        self.orders.remove(&id).is_some()
    }
}
