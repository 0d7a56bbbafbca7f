use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{DomainError, DomainResult};
use crate::values::{AshType, DemandId, Location, Price, QualityMap, Timestamp, Tons, UserId};

/// Fields a buyer provides when posting a demand request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDemand {
    pub title: String,
    pub ash_type: AshType,
    pub quantity_required: Tons,
    pub max_price_per_ton: Price,
    pub delivery: Location,
    pub required_by: Timestamp,
    #[serde(default)]
    pub quality_requirements: QualityMap,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandStatus {
    #[default]
    Open,
    Fulfilled,
    Expired,
}

impl fmt::Display for DemandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemandStatus::Open => write!(f, "open"),
            DemandStatus::Fulfilled => write!(f, "fulfilled"),
            DemandStatus::Expired => write!(f, "expired"),
        }
    }
}

/// A buyer's standing request to acquire material within constraints
///
/// Immutable apart from `status` and `confirmed_quantity`, which the engine
/// maintains as `required_by` passes or confirmed orders accumulate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demand {
    pub id: DemandId,
    pub buyer_id: UserId,
    pub title: String,
    pub ash_type: AshType,
    pub quantity_required: Tons,
    /// Ceiling, not a target
    pub max_price_per_ton: Price,
    pub delivery: Location,
    pub required_by: Timestamp,
    pub quality_requirements: QualityMap,
    pub description: String,
    pub status: DemandStatus,
    /// Tons covered by linked orders that reached `confirmed`
    pub confirmed_quantity: Tons,
    pub created_at: Timestamp,
}

impl Demand {
    pub fn post(draft: NewDemand, buyer_id: UserId, now: Timestamp) -> DomainResult<Self> {
        if draft.title.trim().is_empty() {
            return Err(DomainError::invalid("title is required"));
        }
        if let Some(field) = draft.delivery.missing_field() {
            return Err(DomainError::invalid(format!("delivery {} is required", field)));
        }
        if draft.quantity_required == 0 {
            return Err(DomainError::invalid(
                "quantity_required must be greater than zero",
            ));
        }
        if draft.max_price_per_ton <= Decimal::ZERO {
            return Err(DomainError::invalid(
                "max_price_per_ton must be greater than zero",
            ));
        }
        if draft.required_by < now {
            return Err(DomainError::invalid("required_by cannot be in the past"));
        }
        draft
            .quality_requirements
            .validate()
            .map_err(DomainError::Invalid)?;

        Ok(Demand {
            id: DemandId::new(),
            buyer_id,
            title: draft.title.trim().to_string(),
            ash_type: draft.ash_type,
            quantity_required: draft.quantity_required,
            max_price_per_ton: draft.max_price_per_ton,
            delivery: draft.delivery,
            required_by: draft.required_by,
            quality_requirements: draft.quality_requirements,
            description: draft.description,
            status: DemandStatus::Open,
            confirmed_quantity: 0,
            created_at: now,
        })
    }

    /// Open and not past its deadline
    pub fn is_open_at(&self, now: Timestamp) -> bool {
        self.status == DemandStatus::Open && self.required_by > now
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.buyer_id == user_id
    }

    /// Marks an open demand expired once `required_by` has passed
    pub fn expire_if_due(&mut self, now: Timestamp) -> bool {
        if self.status == DemandStatus::Open && self.required_by <= now {
            self.status = DemandStatus::Expired;
            return true;
        }
        false
    }

    /// Records the confirmed coverage; flips to fulfilled once it meets the requirement
    pub fn record_confirmed(&mut self, confirmed_quantity: Tons) -> bool {
        self.confirmed_quantity = confirmed_quantity;
        if self.status == DemandStatus::Open && confirmed_quantity >= self.quantity_required {
            self.status = DemandStatus::Fulfilled;
            return true;
        }
        false
    }
}
