use ashmart_core::{DomainError, OrderStatus, Tons};
use thiserror::Error;

/// Engine-wide error taxonomy.
///
/// Every variant is a recoverable outcome reported to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error(
        "Insufficient quantity for product {product_id}: requested {requested} t, available {available} t"
    )]
    InsufficientQuantity {
        product_id: String,
        requested: Tons,
        available: Tons,
    },

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Not authorized: {0}")]
    Authorization(String),

    #[error("Timed out: {operation}")]
    Timeout { operation: &'static str },
}

impl MarketError {
    pub fn validation(message: impl Into<String>) -> Self {
        MarketError::Validation(message.into())
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        MarketError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        MarketError::Authorization(message.into())
    }

    /// Attach a product id to a domain-level quantity failure
    pub fn from_domain_for(err: DomainError, product_id: impl ToString) -> Self {
        match err {
            DomainError::InsufficientQuantity {
                requested,
                available,
            } => MarketError::InsufficientQuantity {
                product_id: product_id.to_string(),
                requested,
                available,
            },
            other => other.into(),
        }
    }
}

impl From<DomainError> for MarketError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Invalid(msg) => MarketError::Validation(msg),
            DomainError::InsufficientQuantity {
                requested,
                available,
            } => MarketError::InsufficientQuantity {
                product_id: String::new(),
                requested,
                available,
            },
            DomainError::InvalidTransition { from, to } => {
                MarketError::InvalidTransition { from, to }
            }
            DomainError::Forbidden(msg) => MarketError::Authorization(msg),
        }
    }
}

pub type MarketResult<T> = std::result::Result<T, MarketError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_map_to_taxonomy() {
        let err: MarketError = DomainError::InvalidTransition {
            from: OrderStatus::Delivered,
            to: OrderStatus::Cancelled,
        }
        .into();
        assert_eq!(err.to_string(), "Invalid status transition: delivered -> cancelled");

        let err = MarketError::from_domain_for(
            DomainError::InsufficientQuantity {
                requested: 5,
                available: 2,
            },
            "p-1",
        );
        assert!(matches!(
            err,
            MarketError::InsufficientQuantity { ref product_id, requested: 5, available: 2 }
                if product_id == "p-1"
        ));
    }
}
