use ashmart_core::{Demand, Product, Timestamp};
use ashmart_ports::{MatchScore, MatchScorer};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WeightError {
    #[error("Weight '{0}' cannot be negative")]
    Negative(&'static str),

    #[error("Weights must sum to 1, got {0}")]
    BadSum(Decimal),
}

/// Relative importance of the three fit components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchWeights {
    pub quantity: Decimal,
    pub price: Decimal,
    pub location: Decimal,
}

impl MatchWeights {
    pub fn new(quantity: Decimal, price: Decimal, location: Decimal) -> Result<Self, WeightError> {
        let weights = MatchWeights {
            quantity,
            price,
            location,
        };
        weights.validate()?;
        Ok(weights)
    }

    pub fn validate(&self) -> Result<(), WeightError> {
        for (name, value) in [
            ("quantity", self.quantity),
            ("price", self.price),
            ("location", self.location),
        ] {
            if value < Decimal::ZERO {
                return Err(WeightError::Negative(name));
            }
        }
        let sum = self.quantity + self.price + self.location;
        if sum != Decimal::ONE {
            return Err(WeightError::BadSum(sum));
        }
        Ok(())
    }
}

impl Default for MatchWeights {
    /// Favours fulfilment completeness over price, then proximity
    fn default() -> Self {
        MatchWeights {
            quantity: dec!(0.5),
            price: dec!(0.3),
            location: dec!(0.2),
        }
    }
}

/// Weighted composite scorer
#[derive(Debug, Clone, Default)]
pub struct WeightedScorer {
    weights: MatchWeights,
}

impl WeightedScorer {
    pub fn new(weights: MatchWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &MatchWeights {
        &self.weights
    }

    fn location_fit(demand: &Demand, product: &Product) -> Decimal {
        if product.location.same_city_and_state(&demand.delivery) {
            Decimal::ONE
        } else if product.location.same_state(&demand.delivery) {
            dec!(0.5)
        } else {
            Decimal::ZERO
        }
    }
}

impl MatchScorer for WeightedScorer {
    fn name(&self) -> &str {
        "Weighted Fit"
    }

    fn score(&self, demand: &Demand, product: &Product, now: Timestamp) -> Option<MatchScore> {
        if product.ash_type != demand.ash_type
            || !product.is_available()
            || !demand.is_open_at(now)
            || demand.quantity_required == 0
            || demand.max_price_per_ton <= Decimal::ZERO
        {
            return None;
        }

        // Price ceiling is absolute
        if product.price_per_ton > demand.max_price_per_ton {
            return None;
        }

        let required = Decimal::from(demand.quantity_required);
        let covered = Decimal::from(product.quantity_available.min(demand.quantity_required));
        let quantity_fit = (covered / required).min(Decimal::ONE);
        let price_fit = Decimal::ONE - product.price_per_ton / demand.max_price_per_ton;
        let location_fit = Self::location_fit(demand, product);

        let score = self.weights.quantity * quantity_fit
            + self.weights.price * price_fit
            + self.weights.location * location_fit;

        Some(MatchScore {
            quantity_fit,
            price_fit,
            location_fit,
            score: score.normalize(),
        })
    }
}
