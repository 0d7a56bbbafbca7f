pub mod dto;
mod error;
pub mod extract;
pub mod handlers;
pub mod identity;
mod router;

pub use error::ApiError;
pub use router::{AppState, create_router};
