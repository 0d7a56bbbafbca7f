mod analytics;
mod catalog;
mod matching;
mod order_ledger;

pub use analytics::{AnalyticsAggregator, RECENT_ORDERS, Summary};
pub use catalog::{CatalogService, DemandFilter, ProductFilter};
pub use matching::{MatchingService, SuggestionGroup};
pub use order_ledger::OrderLedger;
