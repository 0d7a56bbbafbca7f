use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{OrderStatus, Product};
use crate::error::{DomainError, DomainResult};
use crate::values::{Amount, DemandId, OrderId, Price, ProductId, Timestamp, Tons, UserId};

/// Fields a buyer provides when placing an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub product_id: ProductId,
    pub quantity: Tons,
    pub delivery_address: String,
    #[serde(default)]
    pub contract_terms: Option<String>,
    #[serde(default)]
    pub demand_id: Option<DemandId>,
}

impl NewOrder {
    pub fn validate(&self) -> DomainResult<()> {
        if self.quantity == 0 {
            return Err(DomainError::invalid("quantity must be greater than zero"));
        }
        if self.delivery_address.trim().is_empty() {
            return Err(DomainError::invalid("delivery_address is required"));
        }
        Ok(())
    }
}

/// A binding transaction against one product by one buyer
///
/// Price and amount are snapshotted at placement; the product is only
/// referenced by id afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub product_id: ProductId,
    pub buyer_id: UserId,
    pub supplier_id: UserId,
    pub demand_id: Option<DemandId>,
    pub quantity: Tons,
    pub agreed_price_per_ton: Price,
    pub total_amount: Amount,
    pub delivery_address: String,
    pub contract_terms: Option<String>,
    pub status: OrderStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Order {
    /// Build a pending order from the product state observed when stock was taken
    pub fn place(
        draft: NewOrder,
        product: &Product,
        buyer_id: UserId,
        now: Timestamp,
    ) -> DomainResult<Self> {
        draft.validate()?;
        if draft.product_id != product.id {
            return Err(DomainError::invalid("order does not reference this product"));
        }

        Ok(Order {
            id: OrderId::new(),
            product_id: product.id,
            buyer_id,
            supplier_id: product.supplier_id.clone(),
            demand_id: draft.demand_id,
            quantity: draft.quantity,
            agreed_price_per_ton: product.price_per_ton,
            total_amount: product.price_per_ton * Decimal::from(draft.quantity),
            delivery_address: draft.delivery_address.trim().to_string(),
            contract_terms: draft.contract_terms.filter(|t| !t.trim().is_empty()),
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    /// Move along the transition graph. Returns the previous status.
    pub fn transition(&mut self, next: OrderStatus, now: Timestamp) -> DomainResult<OrderStatus> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        let previous = self.status;
        self.status = next;
        self.updated_at = now;
        Ok(previous)
    }

    pub fn involves(&self, user_id: &UserId) -> bool {
        &self.buyer_id == user_id || &self.supplier_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::NewProduct;
    use crate::values::{AshType, Location, QualityMap};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn product() -> Product {
        Product::list(
            NewProduct {
                title: "Pond ash".to_string(),
                ash_type: AshType::PondAsh,
                quantity_available: 500,
                price_per_ton: dec!(120.25),
                location: Location::new("Lagoon 2", "Nagpur", "Maharashtra"),
                quality_specs: QualityMap::new(),
                test_report_url: None,
                description: String::new(),
            },
            UserId::new("supplier-9").unwrap(),
            Utc::now(),
        )
        .unwrap()
    }

    fn draft(product: &Product, quantity: Tons) -> NewOrder {
        NewOrder {
            product_id: product.id,
            quantity,
            delivery_address: "Plant 7, Wardha".to_string(),
            contract_terms: None,
            demand_id: None,
        }
    }

    #[test]
    fn test_place_freezes_price() {
        let mut product = product();
        let order = Order::place(
            draft(&product, 40),
            &product,
            UserId::new("buyer-1").unwrap(),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(order.total_amount, dec!(4810.00));
        assert_eq!(order.supplier_id, product.supplier_id);
        assert_eq!(order.status, OrderStatus::Pending);

        product.reprice(dec!(999), Utc::now()).unwrap();
        assert_eq!(order.agreed_price_per_ton, dec!(120.25));
    }

    #[test]
    fn test_place_rejects_zero_quantity_and_blank_address() {
        let product = product();
        let buyer = UserId::new("buyer-1").unwrap();
        assert!(Order::place(draft(&product, 0), &product, buyer.clone(), Utc::now()).is_err());

        let mut blank = draft(&product, 1);
        blank.delivery_address = " ".to_string();
        assert!(Order::place(blank, &product, buyer, Utc::now()).is_err());
    }

    #[test]
    fn test_transition_follows_graph() {
        let product = product();
        let now = Utc::now();
        let mut order =
            Order::place(draft(&product, 1), &product, UserId::new("b").unwrap(), now).unwrap();

        assert_eq!(
            order.transition(OrderStatus::InTransit, now).unwrap_err(),
            DomainError::InvalidTransition {
                from: OrderStatus::Pending,
                to: OrderStatus::InTransit
            }
        );
        assert_eq!(
            order.transition(OrderStatus::Confirmed, now).unwrap(),
            OrderStatus::Pending
        );
        order.transition(OrderStatus::InTransit, now).unwrap();
        order.transition(OrderStatus::Delivered, now).unwrap();
        assert!(order.transition(OrderStatus::Cancelled, now).is_err());
    }
}
