//! In-memory demand repository implementation

use ashmart_core::{Demand, DemandId, Timestamp, Tons};
use ashmart_ports::{DemandReader, DemandWriter, MarketError, MarketResult};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// In-memory demand repository
///
/// Thread-safe storage for demand requests using DashMap.
pub struct InMemoryDemandRepository {
    demands: Arc<DashMap<DemandId, Demand>>,
}

impl InMemoryDemandRepository {
    pub fn new() -> Self {
        Self {
            demands: Arc::new(DashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.demands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.demands.is_empty()
    }
}

impl Default for InMemoryDemandRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InMemoryDemandRepository {
    fn clone(&self) -> Self {
        Self {
            demands: Arc::clone(&self.demands),
        }
    }
}

#[async_trait]
impl DemandReader for InMemoryDemandRepository {
    async fn get(&self, id: DemandId) -> Option<Demand> {
        self.demands.get(&id).map(|d| d.value().clone())
    }

    async fn list(&self) -> Vec<Demand> {
        self.demands.iter().map(|d| d.value().clone()).collect()
    }
}

#[async_trait]
impl DemandWriter for InMemoryDemandRepository {
    async fn insert(&self, demand: Demand) {
        self.demands.insert(demand.id, demand);
    }

    async fn expire_due(&self, now: Timestamp) -> Vec<DemandId> {
        self.demands
            .iter_mut()
            .filter_map(|mut d| d.expire_if_due(now).then(|| *d.key()))
            .collect()
    }

    async fn record_confirmed(
        &self,
        id: DemandId,
        confirmed_quantity: Tons,
    ) -> MarketResult<Demand> {
        let mut demand = self
            .demands
            .get_mut(&id)
            .ok_or_else(|| MarketError::not_found("Demand", id))?;
        demand.record_confirmed(confirmed_quantity);
        Ok(demand.clone())
    }
}
