use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl ProductId {
    /// Builds an id from untrusted input, rejecting zero and negative values.
    pub fn parse(raw: i64) -> Result<Self, DomainError> {
        if raw <= 0 {
            return Err(DomainError::InvariantViolation(format!(
                "product id must be a positive integer, got {raw}"
            )));
        }
        Ok(Self(raw))
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
