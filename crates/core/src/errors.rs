use thiserror::Error;

use crate::domain::product::ProductId;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid replenishment policy: {0}")]
    InvalidPolicy(String),
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

/// Failure reported by a history accessor. The engine passes it through untouched.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("history accessor failure: {0}")]
pub struct AccessorError(pub String);

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SuggestionError {
    #[error("no sales history for product {product_id}")]
    NoSalesHistory { product_id: ProductId },
    #[error(transparent)]
    Accessor(#[from] AccessorError),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("not found: {message}")]
    NotFound { message: String, correlation_id: String },
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The request could not be processed. Check inputs and try again."
            }
            Self::NotFound { .. } => "No sales history exists for this product yet.",
            Self::ServiceUnavailable { .. } => {
                "The service is temporarily unavailable. Please retry shortly."
            }
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. }
            | Self::NotFound { correlation_id, .. }
            | Self::ServiceUnavailable { correlation_id, .. } => correlation_id,
        }
    }
}

impl SuggestionError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let message = self.to_string();
        match self {
            Self::NoSalesHistory { .. } => InterfaceError::NotFound { message, correlation_id },
            Self::Accessor(_) => InterfaceError::ServiceUnavailable { message, correlation_id },
        }
    }
}

impl DomainError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        InterfaceError::BadRequest { message: self.to_string(), correlation_id: correlation_id.into() }
    }
}
