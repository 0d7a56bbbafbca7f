//! Ashmart Matching
//!
//! Scores how well a supplier listing serves a buyer demand and ranks the
//! resulting candidates.
//!
//! ## Algorithm
//!
//! 1. Hard filters: same ash type, product in stock, demand still open,
//!    product price within the demand's ceiling. Failing pairs are excluded.
//! 2. `quantity_fit = min(available, required) / required`
//! 3. `price_fit = 1 - price / max_price`
//! 4. `location_fit = 1.0` same city and state, `0.5` same state, else `0.0`
//! 5. `score = 0.5 * quantity_fit + 0.3 * price_fit + 0.2 * location_fit`
//!
//! Weights are configurable through [`MatchWeights`].

mod candidate;
mod weighted;

pub use candidate::{Counterpart, MatchCandidate, rank};
pub use weighted::{MatchWeights, WeightError, WeightedScorer};

// Re-export the port for convenience
pub use ashmart_ports::{MatchScore, MatchScorer};
