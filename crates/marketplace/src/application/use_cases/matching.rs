use ashmart_core::{Actor, Demand, DemandId, Product, ProductId, Role, Timestamp};
use ashmart_matching::{MatchCandidate, rank};
use ashmart_ports::{
    Clock, DemandReader, MarketError, MarketResult, MatchScorer, ProductReader,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::application::bounded::bounded;
use crate::application::settings::EngineSettings;

/// Candidates scored between cooperative yields
const SCAN_BATCH: usize = 64;

/// Matches for one of the caller's own records
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SuggestionGroup {
    ForDemand {
        demand: Demand,
        #[serde(rename = "matching_products")]
        matches: Vec<MatchCandidate>,
    },
    ForProduct {
        product: Product,
        #[serde(rename = "matching_demands")]
        matches: Vec<MatchCandidate>,
    },
}

impl SuggestionGroup {
    pub fn matches(&self) -> &[MatchCandidate] {
        match self {
            SuggestionGroup::ForDemand { matches, .. } => matches,
            SuggestionGroup::ForProduct { matches, .. } => matches,
        }
    }
}

/// Matching engine: read-only, recomputed per request
///
/// Scans hand control back to the runtime every [`SCAN_BATCH`] candidates,
/// so dropping the request future abandons the scan promptly.
pub struct MatchingService<C, P, D, S>
where
    C: Clock,
    P: ProductReader,
    D: DemandReader,
    S: MatchScorer,
{
    clock: Arc<C>,
    products: Arc<P>,
    demands: Arc<D>,
    scorer: Arc<S>,
    timeout: Duration,
    per_entity: usize,
}

impl<C, P, D, S> MatchingService<C, P, D, S>
where
    C: Clock,
    P: ProductReader,
    D: DemandReader,
    S: MatchScorer,
{
    pub fn new(
        clock: Arc<C>,
        products: Arc<P>,
        demands: Arc<D>,
        scorer: Arc<S>,
        settings: &EngineSettings,
    ) -> Self {
        Self {
            clock,
            products,
            demands,
            scorer,
            timeout: settings.operation_timeout,
            per_entity: settings.suggestions_per_entity,
        }
    }

    /// Products that could serve `demand_id`, best first
    pub async fn suggest_for_demand(&self, demand_id: DemandId) -> MarketResult<Vec<MatchCandidate>> {
        let demand = bounded(self.timeout, "get_demand", self.demands.get(demand_id))
            .await?
            .ok_or_else(|| MarketError::not_found("Demand", demand_id))?;
        let products = bounded(self.timeout, "list_products", self.products.list()).await?;
        Ok(self
            .products_for(&demand, &products, self.clock.now())
            .await)
    }

    /// Demands that `product_id` could serve, best first
    pub async fn suggest_for_product(
        &self,
        product_id: ProductId,
    ) -> MarketResult<Vec<MatchCandidate>> {
        let product = bounded(self.timeout, "get_product", self.products.get(product_id))
            .await?
            .ok_or_else(|| MarketError::not_found("Product", product_id))?;
        let demands = bounded(self.timeout, "list_demands", self.demands.list()).await?;
        Ok(self
            .demands_for(&product, &demands, self.clock.now())
            .await)
    }

    /// Suggestions grouped by the caller's own records.
    ///
    /// Buyers get one group per open demand, suppliers one per available
    /// listing. Groups without a viable match are left out and each group
    /// is capped at the configured size.
    pub async fn suggestions_for(&self, actor: &Actor) -> MarketResult<Vec<SuggestionGroup>> {
        let now = self.clock.now();
        let mut groups = Vec::new();

        match actor.role {
            Role::Buyer => {
                let demands = bounded(self.timeout, "list_demands", self.demands.list()).await?;
                let products = bounded(self.timeout, "list_products", self.products.list()).await?;
                let mut mine: Vec<_> = demands
                    .into_iter()
                    .filter(|d| d.is_owned_by(&actor.user_id) && d.is_open_at(now))
                    .collect();
                mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));

                for demand in mine {
                    let mut matches = self.products_for(&demand, &products, now).await;
                    if matches.is_empty() {
                        continue;
                    }
                    matches.truncate(self.per_entity);
                    groups.push(SuggestionGroup::ForDemand { demand, matches });
                }
            }
            Role::Supplier => {
                let products = bounded(self.timeout, "list_products", self.products.list()).await?;
                let demands = bounded(self.timeout, "list_demands", self.demands.list()).await?;
                let mut mine: Vec<_> = products
                    .into_iter()
                    .filter(|p| p.is_owned_by(&actor.user_id) && p.is_available())
                    .collect();
                mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));

                for product in mine {
                    let mut matches = self.demands_for(&product, &demands, now).await;
                    if matches.is_empty() {
                        continue;
                    }
                    matches.truncate(self.per_entity);
                    groups.push(SuggestionGroup::ForProduct { product, matches });
                }
            }
            Role::Admin | Role::Logistics => {}
        }

        debug!(
            actor = %actor,
            scorer = self.scorer.name(),
            groups = groups.len(),
            "Suggestions computed"
        );
        Ok(groups)
    }

    async fn products_for(
        &self,
        demand: &Demand,
        products: &[Product],
        now: Timestamp,
    ) -> Vec<MatchCandidate> {
        let mut candidates = Vec::new();
        if !demand.is_open_at(now) {
            return candidates;
        }
        for (i, product) in products.iter().enumerate() {
            if i > 0 && i % SCAN_BATCH == 0 {
                tokio::task::yield_now().await;
            }
            if let Some(fit) = self.scorer.score(demand, product, now) {
                candidates.push(MatchCandidate::product_for(demand, product.clone(), fit));
            }
        }
        rank(&mut candidates);
        candidates
    }

    async fn demands_for(
        &self,
        product: &Product,
        demands: &[Demand],
        now: Timestamp,
    ) -> Vec<MatchCandidate> {
        let mut candidates = Vec::new();
        if !product.is_available() {
            return candidates;
        }
        for (i, demand) in demands.iter().enumerate() {
            if i > 0 && i % SCAN_BATCH == 0 {
                tokio::task::yield_now().await;
            }
            if let Some(fit) = self.scorer.score(demand, product, now) {
                candidates.push(MatchCandidate::demand_for(product, demand.clone(), fit));
            }
        }
        rank(&mut candidates);
        candidates
    }
}
