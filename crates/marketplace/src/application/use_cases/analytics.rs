use ashmart_core::{Actor, Amount, Order, Role};
use ashmart_ports::{
    Clock, DemandReader, MarketError, MarketResult, OrderReader, ProductReader, UserDirectory,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::application::bounded::bounded;
use crate::application::settings::EngineSettings;

/// How many of the newest orders a summary carries
pub const RECENT_ORDERS: usize = 5;

/// Role-scoped dashboard figures
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Summary {
    Admin {
        total_users: usize,
        #[serde(rename = "total_products")]
        active_products: usize,
        total_orders: usize,
        #[serde(rename = "total_demands")]
        active_demands: usize,
        recent_orders: Vec<Order>,
    },
    Supplier {
        my_products: usize,
        my_orders: usize,
        total_revenue: Amount,
        recent_orders: Vec<Order>,
    },
    Buyer {
        my_demands: usize,
        my_orders: usize,
        total_spent: Amount,
        recent_orders: Vec<Order>,
    },
}

/// Read-only aggregator over the catalog, the ledger and the user directory.
/// Recomputed on every call.
pub struct AnalyticsAggregator<C, P, D, O, U>
where
    C: Clock,
    P: ProductReader,
    D: DemandReader,
    O: OrderReader,
    U: UserDirectory,
{
    clock: Arc<C>,
    products: Arc<P>,
    demands: Arc<D>,
    orders: Arc<O>,
    users: Arc<U>,
    timeout: Duration,
}

impl<C, P, D, O, U> AnalyticsAggregator<C, P, D, O, U>
where
    C: Clock,
    P: ProductReader,
    D: DemandReader,
    O: OrderReader,
    U: UserDirectory,
{
    pub fn new(
        clock: Arc<C>,
        products: Arc<P>,
        demands: Arc<D>,
        orders: Arc<O>,
        users: Arc<U>,
        settings: &EngineSettings,
    ) -> Self {
        Self {
            clock,
            products,
            demands,
            orders,
            users,
            timeout: settings.operation_timeout,
        }
    }

    /// Summary for the caller's role. Each figure comes from one read of
    /// the records it counts.
    pub async fn dashboard_for(&self, actor: &Actor) -> MarketResult<Summary> {
        match actor.role {
            Role::Admin => {
                let now = self.clock.now();
                let total_users = bounded(self.timeout, "count_users", self.users.count()).await?;
                let products = bounded(self.timeout, "list_products", self.products.list()).await?;
                let demands = bounded(self.timeout, "list_demands", self.demands.list()).await?;
                let orders = bounded(self.timeout, "list_orders", self.orders.list()).await?;

                Ok(Summary::Admin {
                    total_users,
                    active_products: products.iter().filter(|p| p.is_available()).count(),
                    total_orders: orders.len(),
                    active_demands: demands.iter().filter(|d| d.is_open_at(now)).count(),
                    recent_orders: recent(orders),
                })
            }
            Role::Supplier => {
                let products = bounded(self.timeout, "list_products", self.products.list()).await?;
                let owned: HashSet<_> = products
                    .iter()
                    .filter(|p| p.is_owned_by(&actor.user_id))
                    .map(|p| p.id)
                    .collect();
                let orders: Vec<Order> =
                    bounded(self.timeout, "list_orders", self.orders.list())
                        .await?
                        .into_iter()
                        .filter(|o| owned.contains(&o.product_id))
                        .collect();

                Ok(Summary::Supplier {
                    my_products: owned.len(),
                    my_orders: orders.len(),
                    total_revenue: committed_total(&orders),
                    recent_orders: recent(orders),
                })
            }
            Role::Buyer => {
                let demands = bounded(self.timeout, "list_demands", self.demands.list()).await?;
                let orders: Vec<Order> =
                    bounded(self.timeout, "list_orders", self.orders.list())
                        .await?
                        .into_iter()
                        .filter(|o| o.buyer_id == actor.user_id)
                        .collect();

                Ok(Summary::Buyer {
                    my_demands: demands
                        .iter()
                        .filter(|d| d.is_owned_by(&actor.user_id))
                        .count(),
                    my_orders: orders.len(),
                    total_spent: committed_total(&orders),
                    recent_orders: recent(orders),
                })
            }
            Role::Logistics => Err(MarketError::unauthorized(
                "no dashboard is defined for logistics",
            )),
        }
    }
}

/// Sum of amounts over confirmed, in-transit and delivered orders
fn committed_total(orders: &[Order]) -> Amount {
    orders
        .iter()
        .filter(|o| o.status.is_committed())
        .map(|o| o.total_amount)
        .sum::<Decimal>()
}

fn recent(mut orders: Vec<Order>) -> Vec<Order> {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    orders.truncate(RECENT_ORDERS);
    orders
}
