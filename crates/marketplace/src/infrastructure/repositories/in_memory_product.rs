//! In-memory product repository implementation

use ashmart_core::{Price, Product, ProductId, Timestamp, Tons};
use ashmart_ports::{MarketError, MarketResult, ProductReader, ProductWriter};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// How long a writer waits for a contended product record
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_millis(500);

/// In-memory product arena
///
/// Each listing lives behind its own async mutex so quantity changes on one
/// product serialize without touching the others. The DashMap shard lock
/// is only held long enough to clone the record handle out, and waiting for
/// a record parks the task rather than the worker thread.
pub struct InMemoryProductRepository {
    products: Arc<DashMap<ProductId, Arc<Mutex<Product>>>>,
    lock_timeout: Duration,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::with_lock_timeout(DEFAULT_LOCK_TIMEOUT)
    }

    pub fn with_lock_timeout(lock_timeout: Duration) -> Self {
        Self {
            products: Arc::new(DashMap::new()),
            lock_timeout,
        }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    fn record(&self, id: ProductId) -> MarketResult<Arc<Mutex<Product>>> {
        self.products
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| MarketError::not_found("Product", id))
    }

    /// Run `f` under the record lock, giving up after the lock timeout
    async fn mutate<T>(
        &self,
        id: ProductId,
        operation: &'static str,
        f: impl FnOnce(&mut Product) -> MarketResult<T>,
    ) -> MarketResult<T> {
        let record = self.record(id)?;
        let mut product = tokio::time::timeout(self.lock_timeout, record.lock())
            .await
            .map_err(|_| MarketError::Timeout { operation })?;
        f(&mut product)
    }
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InMemoryProductRepository {
    fn clone(&self) -> Self {
        Self {
            products: Arc::clone(&self.products),
            lock_timeout: self.lock_timeout,
        }
    }
}

#[async_trait]
impl ProductReader for InMemoryProductRepository {
    async fn get(&self, id: ProductId) -> Option<Product> {
        let record = self.products.get(&id).map(|e| Arc::clone(e.value()))?;
        let product = record.lock().await.clone();
        Some(product)
    }

    async fn list(&self) -> Vec<Product> {
        let records: Vec<_> = self
            .products
            .iter()
            .map(|e| Arc::clone(e.value()))
            .collect();
        let mut products = Vec::with_capacity(records.len());
        for record in records {
            products.push(record.lock().await.clone());
        }
        products
    }
}

#[async_trait]
impl ProductWriter for InMemoryProductRepository {
    async fn insert(&self, product: Product) {
        self.products
            .insert(product.id, Arc::new(Mutex::new(product)));
    }

    async fn decrement_quantity(
        &self,
        id: ProductId,
        amount: Tons,
        now: Timestamp,
    ) -> MarketResult<Product> {
        self.mutate(id, "decrement_product_quantity", |product| {
            product
                .take(amount, now)
                .map_err(|e| MarketError::from_domain_for(e, id))?;
            Ok(product.clone())
        })
        .await
    }

    async fn restore_quantity(
        &self,
        id: ProductId,
        amount: Tons,
        now: Timestamp,
    ) -> MarketResult<Product> {
        self.mutate(id, "restore_product_quantity", |product| {
            product.give_back(amount, now);
            Ok(product.clone())
        })
        .await
    }

    async fn retire(&self, id: ProductId, now: Timestamp) -> MarketResult<Product> {
        self.mutate(id, "retire_product", |product| {
            product.retire(now);
            Ok(product.clone())
        })
        .await
    }

    async fn reprice(&self, id: ProductId, price: Price, now: Timestamp) -> MarketResult<Product> {
        self.mutate(id, "reprice_product", |product| {
            product.reprice(price, now)?;
            Ok(product.clone())
        })
        .await
    }
}
