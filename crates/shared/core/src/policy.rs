//! Who may drive an order through its lifecycle

use serde::{Deserialize, Serialize};

use crate::entities::{Actor, Order, OrderStatus, Role};
use crate::error::{DomainError, DomainResult};

/// Who may cancel an order that the supplier already confirmed.
///
/// Business rules are silent on this, so it is a deployment decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancellationPolicy {
    #[default]
    SupplierOnly,
    BuyerOnly,
    Either,
    Nobody,
}

impl CancellationPolicy {
    fn permits(&self, party: Party) -> bool {
        match self {
            CancellationPolicy::SupplierOnly => party == Party::Supplier,
            CancellationPolicy::BuyerOnly => party == Party::Buyer,
            CancellationPolicy::Either => true,
            CancellationPolicy::Nobody => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Party {
    Buyer,
    Supplier,
}

/// Authorization rules for order status changes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransitionPolicy {
    pub confirmed_cancellation: CancellationPolicy,
}

impl TransitionPolicy {
    pub fn new(confirmed_cancellation: CancellationPolicy) -> Self {
        Self {
            confirmed_cancellation,
        }
    }

    /// Check that `actor` may move `order` to `next`.
    ///
    /// Graph validity is checked separately by [`Order::transition`]; this
    /// only answers whether the caller has the right to ask.
    pub fn authorize(&self, order: &Order, actor: &Actor, next: OrderStatus) -> DomainResult<()> {
        let party = if actor.role == Role::Supplier && order.supplier_id == actor.user_id {
            Party::Supplier
        } else if actor.role == Role::Buyer && order.buyer_id == actor.user_id {
            Party::Buyer
        } else {
            return Err(DomainError::forbidden(format!(
                "{} is not a party to order {}",
                actor, order.id
            )));
        };

        // Impossible moves are reported by the state machine, not here
        if !order.status.can_transition_to(next) {
            return Ok(());
        }

        let allowed = match next {
            OrderStatus::Confirmed | OrderStatus::InTransit | OrderStatus::Delivered => {
                party == Party::Supplier
            }
            OrderStatus::Cancelled => match order.status {
                OrderStatus::Pending => party == Party::Buyer,
                _ => self.confirmed_cancellation.permits(party),
            },
            OrderStatus::Pending => false,
        };

        if allowed {
            Ok(())
        } else {
            Err(DomainError::forbidden(format!(
                "{} may not move order {} from {} to {}",
                actor, order.id, order.status, next
            )))
        }
    }
}
