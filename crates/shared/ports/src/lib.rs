//! Ashmart Ports
//!
//! Port definitions (traits) for the ashmart marketplace engine.
//! These define the boundaries between domain logic and infrastructure.

mod catalog;
mod clock;
mod directory;
mod error;
mod ledger;
mod matching;

pub use catalog::{
    DemandReader, DemandStore, DemandWriter, ProductReader, ProductStore, ProductWriter,
};
pub use clock::Clock;
pub use directory::UserDirectory;
pub use error::{MarketError, MarketResult};
pub use ledger::{OrderReader, OrderStore, OrderWriter};
pub use matching::{MatchScore, MatchScorer};
