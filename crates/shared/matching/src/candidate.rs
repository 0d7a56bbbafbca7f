use ashmart_core::{Demand, DemandId, Product, ProductId, Timestamp};
use ashmart_ports::MatchScore;
use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Ordering;

/// The record on the other side of a match
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Counterpart {
    Product(Product),
    Demand(Demand),
}

impl Counterpart {
    pub fn created_at(&self) -> Timestamp {
        match self {
            Counterpart::Product(p) => p.created_at,
            Counterpart::Demand(d) => d.created_at,
        }
    }

    fn sort_key(&self) -> String {
        match self {
            Counterpart::Product(p) => p.id.to_string(),
            Counterpart::Demand(d) => d.id.to_string(),
        }
    }
}

/// A scored demand/product pairing. Derived per request, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct MatchCandidate {
    pub demand_id: DemandId,
    pub product_id: ProductId,
    #[serde(flatten)]
    pub fit: MatchScore,
    pub match_percentage: Decimal,
    pub counterpart: Counterpart,
}

impl MatchCandidate {
    /// Candidate listing offered to a demand
    pub fn product_for(demand: &Demand, product: Product, fit: MatchScore) -> Self {
        MatchCandidate {
            demand_id: demand.id,
            product_id: product.id,
            match_percentage: fit.percentage(),
            fit,
            counterpart: Counterpart::Product(product),
        }
    }

    /// Candidate demand offered to a listing
    pub fn demand_for(product: &Product, demand: Demand, fit: MatchScore) -> Self {
        MatchCandidate {
            demand_id: demand.id,
            product_id: product.id,
            match_percentage: fit.percentage(),
            fit,
            counterpart: Counterpart::Demand(demand),
        }
    }

    pub fn score(&self) -> Decimal {
        self.fit.score
    }
}

/// Order candidates by descending score, ties broken by the most recently
/// created counterpart first
pub fn rank(candidates: &mut [MatchCandidate]) {
    candidates.sort_by(|a, b| {
        b.score()
            .cmp(&a.score())
            .then_with(|| b.counterpart.created_at().cmp(&a.counterpart.created_at()))
            .then_with(|| tie_break(a, b))
    });
}

fn tie_break(a: &MatchCandidate, b: &MatchCandidate) -> Ordering {
    a.counterpart.sort_key().cmp(&b.counterpart.sort_key())
}
