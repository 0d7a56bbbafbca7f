pub mod bounded;
mod listing;
mod settings;
pub mod use_cases;

pub use listing::Listing;
pub use settings::EngineSettings;
pub use use_cases::{
    // Catalog store
    CatalogService,
    DemandFilter,
    ProductFilter,
    // Matching engine
    MatchingService,
    SuggestionGroup,
    // Order ledger
    OrderLedger,
    // Analytics
    AnalyticsAggregator,
    RECENT_ORDERS,
    Summary,
};
