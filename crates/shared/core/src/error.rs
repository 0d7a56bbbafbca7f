use thiserror::Error;

use crate::entities::OrderStatus;
use crate::values::Tons;

/// Rule violations detected by the pure domain model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    Invalid(String),

    #[error("Insufficient quantity: requested {requested} t, available {available} t")]
    InsufficientQuantity { requested: Tons, available: Tons },

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Not permitted: {0}")]
    Forbidden(String),
}

impl DomainError {
    pub fn invalid(message: impl Into<String>) -> Self {
        DomainError::Invalid(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        DomainError::Forbidden(message.into())
    }
}

pub type DomainResult<T> = std::result::Result<T, DomainError>;
