use ashmart_core::{
    Actor, DemandId, NewOrder, Order, OrderId, OrderStatus, Product, ProductId, Role, Tons,
    TransitionPolicy,
};
use ashmart_ports::{Clock, DemandStore, MarketError, MarketResult, OrderStore, ProductStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use super::CatalogService;
use crate::application::bounded::{bounded, bounded_try};
use crate::application::settings::EngineSettings;

/// Order ledger: placement against catalog stock and the status state machine
///
/// Stock moves and order writes form one unit. An order is only kept if
/// its stock was taken, and a cancellation only sticks if its stock went
/// back.
pub struct OrderLedger<C, P, D, O>
where
    C: Clock,
    P: ProductStore,
    D: DemandStore,
    O: OrderStore,
{
    clock: Arc<C>,
    catalog: CatalogService<C, P, D>,
    demands: Arc<D>,
    orders: Arc<O>,
    policy: TransitionPolicy,
    timeout: Duration,
}

impl<C, P, D, O> OrderLedger<C, P, D, O>
where
    C: Clock,
    P: ProductStore,
    D: DemandStore,
    O: OrderStore,
{
    pub fn new(
        clock: Arc<C>,
        products: Arc<P>,
        demands: Arc<D>,
        orders: Arc<O>,
        settings: &EngineSettings,
    ) -> Self {
        Self {
            catalog: CatalogService::new(
                Arc::clone(&clock),
                products,
                Arc::clone(&demands),
                settings,
            ),
            clock,
            demands,
            orders,
            policy: settings.transition_policy,
            timeout: settings.operation_timeout,
        }
    }

    /// Place an order for the calling buyer.
    ///
    /// All-or-nothing: either the stock is taken and the order recorded, or
    /// neither happens.
    pub async fn place_order(&self, actor: &Actor, draft: NewOrder) -> MarketResult<Order> {
        if !actor.is(Role::Buyer) {
            return Err(MarketError::unauthorized("only buyers can place orders"));
        }
        draft.validate()?;
        if let Some(demand_id) = draft.demand_id {
            self.check_linked_demand(actor, demand_id).await?;
        }

        let taken = self.take_with_retry(draft.product_id, draft.quantity).await?;

        let quantity = draft.quantity;
        let order = match Order::place(draft, &taken, actor.user_id.clone(), self.clock.now()) {
            Ok(order) => order,
            Err(e) => return Err(self.give_back(taken.id, quantity, e.into()).await),
        };

        let inserted =
            bounded_try(self.timeout, "insert_order", self.orders.insert(order.clone())).await;
        if let Err(e) = inserted {
            // A timed-out insert may still land; drop it before giving the stock back
            bounded(self.timeout, "discard_order", self.orders.discard(order.id))
                .await
                .ok();
            return Err(self.give_back(order.product_id, order.quantity, e).await);
        }

        info!(
            order_id = %order.id,
            product_id = %order.product_id,
            buyer = %order.buyer_id,
            quantity = order.quantity,
            total_amount = %order.total_amount,
            remaining = taken.quantity_available,
            "Order placed"
        );
        Ok(order)
    }

    /// Move an order to `next` on behalf of one of its parties.
    ///
    /// Cancelling returns the order's tons to the product before the
    /// cancellation is acknowledged.
    pub async fn transition(
        &self,
        actor: &Actor,
        order_id: OrderId,
        next: OrderStatus,
    ) -> MarketResult<Order> {
        let order = self.load(order_id).await?;
        self.policy.authorize(&order, actor, next)?;
        if !order.status.can_transition_to(next) {
            return Err(MarketError::InvalidTransition {
                from: order.status,
                to: next,
            });
        }

        let now = self.clock.now();
        let updated = bounded_try(
            self.timeout,
            "transition_order",
            self.orders.transition(order_id, order.status, next, now),
        )
        .await?;

        if next == OrderStatus::Cancelled {
            if let Err(e) = self
                .catalog
                .restore_product_quantity(updated.product_id, updated.quantity)
                .await
            {
                return Err(self.undo_cancellation(&order, e).await);
            }
        }

        if let Some(demand_id) = updated.demand_id {
            if next == OrderStatus::Confirmed || order.status == OrderStatus::Confirmed {
                self.refresh_demand(demand_id).await;
            }
        }

        info!(
            order_id = %order_id,
            actor = %actor,
            from = %order.status,
            to = %next,
            quantity = updated.quantity,
            "Order status changed"
        );
        Ok(updated)
    }

    /// Shorthand for a transition to `cancelled`
    pub async fn cancel(&self, actor: &Actor, order_id: OrderId) -> MarketResult<Order> {
        self.transition(actor, order_id, OrderStatus::Cancelled).await
    }

    /// Orders in the caller's scope, newest first
    pub async fn orders_for(&self, actor: &Actor) -> MarketResult<Vec<Order>> {
        let all = bounded(self.timeout, "list_orders", self.orders.list()).await?;
        let mut mine: Vec<Order> = match actor.role {
            Role::Buyer => all
                .into_iter()
                .filter(|o| o.buyer_id == actor.user_id)
                .collect(),
            Role::Supplier => all
                .into_iter()
                .filter(|o| o.supplier_id == actor.user_id)
                .collect(),
            Role::Admin | Role::Logistics => {
                return Err(MarketError::unauthorized(format!(
                    "{} has no orders of their own",
                    actor.role
                )));
            }
        };
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(mine)
    }

    /// A single order, visible to its parties and to admins
    pub async fn get(&self, actor: &Actor, order_id: OrderId) -> MarketResult<Order> {
        let order = self.load(order_id).await?;
        if actor.is(Role::Admin) || order.involves(&actor.user_id) {
            Ok(order)
        } else {
            Err(MarketError::unauthorized(format!(
                "{} is not a party to order {}",
                actor, order_id
            )))
        }
    }

    async fn load(&self, order_id: OrderId) -> MarketResult<Order> {
        bounded(self.timeout, "get_order", self.orders.get(order_id))
            .await?
            .ok_or_else(|| MarketError::not_found("Order", order_id))
    }

    /// Validate, then take stock. A decrement that loses a race after the
    /// pre-check passed is re-validated and retried once.
    async fn take_with_retry(
        &self,
        product_id: ProductId,
        quantity: Tons,
    ) -> MarketResult<Product> {
        let mut retried = false;
        loop {
            let observed = self.catalog.get_product(product_id).await?;
            let available = if observed.is_active {
                observed.quantity_available
            } else {
                0
            };
            if quantity > available {
                return Err(MarketError::InsufficientQuantity {
                    product_id: product_id.to_string(),
                    requested: quantity,
                    available,
                });
            }

            match self.catalog.take_stock(product_id, quantity).await {
                Err(MarketError::InsufficientQuantity { .. }) if !retried => {
                    warn!(%product_id, quantity, "Stock changed under us, re-validating");
                    retried = true;
                }
                other => return other,
            }
        }
    }

    async fn check_linked_demand(&self, actor: &Actor, demand_id: DemandId) -> MarketResult<()> {
        let demand = self.catalog.get_demand(demand_id).await?;
        if !demand.is_owned_by(&actor.user_id) {
            return Err(MarketError::unauthorized(format!(
                "demand {} belongs to another buyer",
                demand_id
            )));
        }
        Ok(())
    }

    /// Return stock after a failed placement; yields the error to surface
    async fn give_back(
        &self,
        product_id: ProductId,
        quantity: Tons,
        cause: MarketError,
    ) -> MarketError {
        if let Err(restore) = self
            .catalog
            .restore_product_quantity(product_id, quantity)
            .await
        {
            error!(
                %product_id,
                quantity,
                cause = %cause,
                error = %restore,
                "Failed to return stock after aborted order"
            );
        }
        cause
    }

    async fn undo_cancellation(&self, order: &Order, cause: MarketError) -> MarketError {
        let now = self.clock.now();
        let reinstated = bounded_try(
            self.timeout,
            "reinstate_order",
            self.orders.reinstate(order.id, order.status, now),
        )
        .await;
        match reinstated {
            Ok(_) => warn!(
                order_id = %order.id,
                error = %cause,
                "Cancellation rolled back, stock could not be restored"
            ),
            Err(e) => error!(
                order_id = %order.id,
                cause = %cause,
                error = %e,
                "Cancellation rollback failed"
            ),
        }
        cause
    }

    /// Recompute the confirmed coverage of a demand from the ledger
    async fn refresh_demand(&self, demand_id: DemandId) {
        let orders = match bounded(self.timeout, "list_orders", self.orders.list()).await {
            Ok(orders) => orders,
            Err(e) => {
                warn!(%demand_id, error = %e, "Demand coverage not refreshed");
                return;
            }
        };
        let confirmed: Tons = orders
            .iter()
            .filter(|o| o.demand_id == Some(demand_id) && o.status.is_committed())
            .map(|o| o.quantity)
            .sum();

        match bounded_try(
            self.timeout,
            "record_confirmed",
            self.demands.record_confirmed(demand_id, confirmed),
        )
        .await
        {
            Ok(demand) => info!(
                %demand_id,
                confirmed,
                status = %demand.status,
                "Demand coverage updated"
            ),
            Err(e) => warn!(%demand_id, error = %e, "Demand coverage not refreshed"),
        }
    }
}
