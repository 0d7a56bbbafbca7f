use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::values::{AshType, Location, Price, ProductId, QualityMap, Timestamp, Tons, UserId};

/// Fields a supplier provides when listing material
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub title: String,
    pub ash_type: AshType,
    pub quantity_available: Tons,
    pub price_per_ton: Price,
    pub location: Location,
    #[serde(default)]
    pub quality_specs: QualityMap,
    #[serde(default)]
    pub test_report_url: Option<String>,
    #[serde(default)]
    pub description: String,
}

/// A supplier's standing offer to sell a quantity of one ash type
///
/// `quantity_available` only moves between 0 and `initial_quantity`:
/// orders take from it, cancellations give back, retirement zeroes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub supplier_id: UserId,
    pub title: String,
    pub ash_type: AshType,
    pub quantity_available: Tons,
    pub initial_quantity: Tons,
    pub price_per_ton: Price,
    pub location: Location,
    pub quality_specs: QualityMap,
    pub test_report_url: Option<String>,
    pub description: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Product {
    pub fn list(draft: NewProduct, supplier_id: UserId, now: Timestamp) -> DomainResult<Self> {
        if draft.title.trim().is_empty() {
            return Err(DomainError::invalid("title is required"));
        }
        if let Some(field) = draft.location.missing_field() {
            return Err(DomainError::invalid(format!("location {} is required", field)));
        }
        if draft.quantity_available == 0 {
            return Err(DomainError::invalid(
                "quantity_available must be greater than zero",
            ));
        }
        if draft.price_per_ton < Decimal::ZERO {
            return Err(DomainError::invalid("price_per_ton cannot be negative"));
        }
        draft.quality_specs.validate().map_err(DomainError::Invalid)?;

        Ok(Product {
            id: ProductId::new(),
            supplier_id,
            title: draft.title.trim().to_string(),
            ash_type: draft.ash_type,
            quantity_available: draft.quantity_available,
            initial_quantity: draft.quantity_available,
            price_per_ton: draft.price_per_ton,
            location: draft.location,
            quality_specs: draft.quality_specs,
            test_report_url: draft.test_report_url.filter(|u| !u.trim().is_empty()),
            description: draft.description,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Listed and has stock
    pub fn is_available(&self) -> bool {
        self.is_active && self.quantity_available > 0
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.supplier_id == user_id
    }

    /// Check-and-subtract. Returns the remaining quantity.
    pub fn take(&mut self, amount: Tons, now: Timestamp) -> DomainResult<Tons> {
        if amount == 0 {
            return Err(DomainError::invalid("quantity must be greater than zero"));
        }
        if !self.is_active || amount > self.quantity_available {
            return Err(DomainError::InsufficientQuantity {
                requested: amount,
                available: if self.is_active {
                    self.quantity_available
                } else {
                    0
                },
            });
        }
        self.quantity_available -= amount;
        self.updated_at = now;
        Ok(self.quantity_available)
    }

    /// Give back tons taken by a cancelled order.
    ///
    /// Capped at `initial_quantity`; a retired listing is not re-stocked.
    pub fn give_back(&mut self, amount: Tons, now: Timestamp) -> Tons {
        if self.is_active {
            self.quantity_available = self
                .quantity_available
                .saturating_add(amount)
                .min(self.initial_quantity);
            self.updated_at = now;
        }
        self.quantity_available
    }

    pub fn retire(&mut self, now: Timestamp) {
        self.quantity_available = 0;
        self.is_active = false;
        self.updated_at = now;
    }

    pub fn reprice(&mut self, price_per_ton: Price, now: Timestamp) -> DomainResult<()> {
        if price_per_ton < Decimal::ZERO {
            return Err(DomainError::invalid("price_per_ton cannot be negative"));
        }
        if !self.is_active {
            return Err(DomainError::invalid("retired listings cannot be repriced"));
        }
        self.price_per_ton = price_per_ton;
        self.updated_at = now;
        Ok(())
    }
}
