mod actor;
mod demand;
mod order;
mod order_status;
mod product;

pub use actor::{Actor, Role};
pub use demand::{Demand, DemandStatus, NewDemand};
pub use order::{NewOrder, Order};
pub use order_status::OrderStatus;
pub use product::{NewProduct, Product};
