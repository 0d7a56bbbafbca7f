use ashmart_core::{Demand, Product, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Component fits and composite score for one demand/product pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchScore {
    pub quantity_fit: Decimal,
    pub price_fit: Decimal,
    pub location_fit: Decimal,
    /// Composite in [0, 1]
    #[serde(rename = "match_score")]
    pub score: Decimal,
}

impl MatchScore {
    /// Score surfaced to callers as a percentage, 2 decimal places
    pub fn percentage(&self) -> Decimal {
        (self.score * Decimal::ONE_HUNDRED).round_dp(2)
    }
}

/// Port for demand/product compatibility scoring
///
/// Returns `None` when the pair is disqualified outright (hard filters);
/// a disqualified pair is excluded, never scored as zero.
pub trait MatchScorer: Send + Sync {
    fn score(&self, demand: &Demand, product: &Product, now: Timestamp) -> Option<MatchScore>;

    /// Get the name of the algorithm
    fn name(&self) -> &str;
}
