use ashmart_core::{
    Actor, AshType, Demand, DemandId, NewDemand, NewProduct, Price, Product, ProductId, Role,
    Timestamp, Tons, UserId,
};
use ashmart_ports::{Clock, DemandStore, MarketError, MarketResult, ProductStore};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::application::bounded::{bounded, bounded_try};
use crate::application::listing::Listing;
use crate::application::settings::EngineSettings;

/// Product listing query
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub ash_type: Option<AshType>,
    /// Case-insensitive substring of the listing city
    pub city: Option<String>,
    pub state: Option<String>,
    pub min_quantity: Option<Tons>,
    pub max_price: Option<Price>,
    pub supplier_id: Option<UserId>,
    /// Also return sold-out and retired listings
    pub include_inactive: bool,
}

impl ProductFilter {
    pub fn owned_by(supplier_id: UserId) -> Self {
        ProductFilter {
            supplier_id: Some(supplier_id),
            include_inactive: true,
            ..Default::default()
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        (self.include_inactive || product.is_available())
            && self.ash_type.is_none_or(|t| product.ash_type == t)
            && self
                .city
                .as_deref()
                .is_none_or(|c| product.location.city_contains(c))
            && self
                .state
                .as_deref()
                .is_none_or(|s| product.location.state_contains(s))
            && self
                .min_quantity
                .is_none_or(|q| product.quantity_available >= q)
            && self.max_price.is_none_or(|p| product.price_per_ton <= p)
            && self
                .supplier_id
                .as_ref()
                .is_none_or(|s| product.is_owned_by(s))
    }
}

/// Demand listing query
#[derive(Debug, Clone, Default)]
pub struct DemandFilter {
    pub ash_type: Option<AshType>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub buyer_id: Option<UserId>,
    /// Also return fulfilled and expired demands
    pub include_inactive: bool,
}

impl DemandFilter {
    pub fn owned_by(buyer_id: UserId) -> Self {
        DemandFilter {
            buyer_id: Some(buyer_id),
            include_inactive: true,
            ..Default::default()
        }
    }

    pub fn matches(&self, demand: &Demand, now: Timestamp) -> bool {
        (self.include_inactive || demand.is_open_at(now))
            && self.ash_type.is_none_or(|t| demand.ash_type == t)
            && self
                .city
                .as_deref()
                .is_none_or(|c| demand.delivery.city_contains(c))
            && self
                .state
                .as_deref()
                .is_none_or(|s| demand.delivery.state_contains(s))
            && self
                .buyer_id
                .as_ref()
                .is_none_or(|b| demand.is_owned_by(b))
    }
}

/// Catalog store operations: listings, demand requests and the
/// quantity primitives orders are built on
pub struct CatalogService<C, P, D>
where
    C: Clock,
    P: ProductStore,
    D: DemandStore,
{
    clock: Arc<C>,
    products: Arc<P>,
    demands: Arc<D>,
    timeout: Duration,
}

impl<C, P, D> CatalogService<C, P, D>
where
    C: Clock,
    P: ProductStore,
    D: DemandStore,
{
    pub fn new(clock: Arc<C>, products: Arc<P>, demands: Arc<D>, settings: &EngineSettings) -> Self {
        Self {
            clock,
            products,
            demands,
            timeout: settings.operation_timeout,
        }
    }

    /// Create a listing owned by the calling supplier
    pub async fn put_product(&self, actor: &Actor, draft: NewProduct) -> MarketResult<Product> {
        if !actor.is(Role::Supplier) {
            return Err(MarketError::unauthorized("only suppliers can list products"));
        }
        let product = Product::list(draft, actor.user_id.clone(), self.clock.now())?;

        bounded(self.timeout, "insert_product", self.products.insert(product.clone())).await?;
        info!(
            product_id = %product.id,
            supplier = %actor.user_id,
            ash_type = %product.ash_type,
            quantity = product.quantity_available,
            "Product listed"
        );
        Ok(product)
    }

    /// Create a demand request owned by the calling buyer
    pub async fn put_demand(&self, actor: &Actor, draft: NewDemand) -> MarketResult<Demand> {
        if !actor.is(Role::Buyer) {
            return Err(MarketError::unauthorized("only buyers can post demands"));
        }
        let demand = Demand::post(draft, actor.user_id.clone(), self.clock.now())?;

        bounded(self.timeout, "insert_demand", self.demands.insert(demand.clone())).await?;
        info!(
            demand_id = %demand.id,
            buyer = %actor.user_id,
            ash_type = %demand.ash_type,
            quantity = demand.quantity_required,
            "Demand posted"
        );
        Ok(demand)
    }

    /// Products matching `filter`, newest first
    pub async fn list_products(&self, filter: ProductFilter) -> MarketResult<Listing<Product>> {
        let mut records = bounded(self.timeout, "list_products", self.products.list()).await?;
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(Listing::new(records, move |p| filter.matches(p)))
    }

    /// Demands matching `filter`, newest first
    pub async fn list_demands(&self, filter: DemandFilter) -> MarketResult<Listing<Demand>> {
        let now = self.clock.now();
        let mut records = bounded(self.timeout, "list_demands", self.demands.list()).await?;
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(Listing::new(records, move |d| filter.matches(d, now)))
    }

    /// Every listing of the calling supplier, including sold-out and retired ones
    pub async fn my_products(&self, actor: &Actor) -> MarketResult<Listing<Product>> {
        if !actor.is(Role::Supplier) {
            return Err(MarketError::unauthorized("only suppliers own products"));
        }
        self.list_products(ProductFilter::owned_by(actor.user_id.clone()))
            .await
    }

    /// Every demand of the calling buyer, whatever its status
    pub async fn my_demands(&self, actor: &Actor) -> MarketResult<Listing<Demand>> {
        if !actor.is(Role::Buyer) {
            return Err(MarketError::unauthorized("only buyers own demands"));
        }
        self.list_demands(DemandFilter::owned_by(actor.user_id.clone()))
            .await
    }

    pub async fn get_product(&self, id: ProductId) -> MarketResult<Product> {
        bounded(self.timeout, "get_product", self.products.get(id))
            .await?
            .ok_or_else(|| MarketError::not_found("Product", id))
    }

    pub async fn get_demand(&self, id: DemandId) -> MarketResult<Demand> {
        bounded(self.timeout, "get_demand", self.demands.get(id))
            .await?
            .ok_or_else(|| MarketError::not_found("Demand", id))
    }

    /// Atomic check-and-subtract. Returns the product as it stood right after.
    pub async fn take_stock(&self, id: ProductId, amount: Tons) -> MarketResult<Product> {
        let now = self.clock.now();
        bounded_try(
            self.timeout,
            "decrement_product_quantity",
            self.products.decrement_quantity(id, amount, now),
        )
        .await
    }

    /// Atomic check-and-subtract. Returns the new quantity.
    pub async fn decrement_product_quantity(&self, id: ProductId, amount: Tons) -> MarketResult<Tons> {
        if amount == 0 {
            return Err(MarketError::validation("amount must be greater than zero"));
        }
        self.take_stock(id, amount)
            .await
            .map(|p| p.quantity_available)
    }

    /// Compensating counterpart of [`Self::decrement_product_quantity`]
    pub async fn restore_product_quantity(&self, id: ProductId, amount: Tons) -> MarketResult<Tons> {
        let now = self.clock.now();
        let product = bounded_try(
            self.timeout,
            "restore_product_quantity",
            self.products.restore_quantity(id, amount, now),
        )
        .await?;
        debug!(product_id = %id, amount, remaining = product.quantity_available, "Stock restored");
        Ok(product.quantity_available)
    }

    /// Take a listing off the market. Owner only.
    pub async fn retire_product(&self, actor: &Actor, id: ProductId) -> MarketResult<Product> {
        self.authorize_owner(actor, id).await?;
        let now = self.clock.now();
        let product =
            bounded_try(self.timeout, "retire_product", self.products.retire(id, now)).await?;
        info!(product_id = %id, supplier = %actor.user_id, "Product retired");
        Ok(product)
    }

    /// Change the asking price. Owner only; existing orders keep their amount.
    pub async fn reprice_product(
        &self,
        actor: &Actor,
        id: ProductId,
        price_per_ton: Price,
    ) -> MarketResult<Product> {
        if price_per_ton < Decimal::ZERO {
            return Err(MarketError::validation("price_per_ton cannot be negative"));
        }
        self.authorize_owner(actor, id).await?;
        let now = self.clock.now();
        let product = bounded_try(
            self.timeout,
            "reprice_product",
            self.products.reprice(id, price_per_ton, now),
        )
        .await?;
        info!(product_id = %id, price_per_ton = %price_per_ton, "Product repriced");
        Ok(product)
    }

    /// Mark open demands past their deadline as expired. Returns how many changed.
    pub async fn expire_demands(&self) -> MarketResult<usize> {
        let now = self.clock.now();
        let expired = bounded(self.timeout, "expire_demands", self.demands.expire_due(now)).await?;
        if !expired.is_empty() {
            info!(count = expired.len(), "Expired demands past their deadline");
        }
        Ok(expired.len())
    }

    async fn authorize_owner(&self, actor: &Actor, id: ProductId) -> MarketResult<()> {
        let product = self.get_product(id).await?;
        if !actor.is(Role::Supplier) || !product.is_owned_by(&actor.user_id) {
            return Err(MarketError::unauthorized(format!(
                "{} does not own product {}",
                actor, id
            )));
        }
        Ok(())
    }
}
