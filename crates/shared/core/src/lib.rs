//! Ashmart Core Domain
//!
//! Pure domain types for the ashmart coal ash marketplace.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod error;
pub mod policy;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    Actor, Demand, DemandStatus, NewDemand, NewOrder, NewProduct, Order, OrderStatus, Product,
    Role,
};
pub use error::{DomainError, DomainResult};
pub use policy::{CancellationPolicy, TransitionPolicy};
pub use values::{
    Amount, AshType, DemandId, Location, OrderId, Price, ProductId, QualityMap, Timestamp, Tons,
    UserId,
};
