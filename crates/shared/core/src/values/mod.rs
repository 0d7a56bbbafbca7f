mod ash_type;
mod ids;
mod location;
mod quality;

pub use ash_type::AshType;
pub use ids::{DemandId, OrderId, ProductId, UserId};
pub use location::Location;
pub use quality::QualityMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Price per ton - uses Decimal for precision
pub type Price = Decimal;

/// Monetary amount (price × tons)
pub type Amount = Decimal;

/// Whole tons of material
pub type Tons = u64;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;
