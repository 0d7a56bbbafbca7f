mod in_memory_demand;
mod in_memory_order;
mod in_memory_product;
mod in_memory_user;

pub use in_memory_demand::InMemoryDemandRepository;
pub use in_memory_order::InMemoryOrderRepository;
pub use in_memory_product::{DEFAULT_LOCK_TIMEOUT, InMemoryProductRepository};
pub use in_memory_user::InMemoryUserDirectory;
