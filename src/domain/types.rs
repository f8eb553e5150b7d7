//! Strongly-typed value objects used by domain entities.
//!
//! Domain structs carry these wrappers instead of raw primitives so that
//! identifiers and money amounts are validated at the boundary.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// An identifier was zero or negative.
    #[error("{0} must be greater than zero")]
    NonPositiveId(&'static str),
    /// A money amount was below one cent.
    #[error("{0} must be at least 1")]
    NonPositiveAmount(&'static str),
    /// Catch-all for custom validation failures.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId($field))
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(ProductId, "Identifier of a product.", "product id");
id_newtype!(OrderId, "Identifier of an order.", "order id");
id_newtype!(UserId, "Identifier of a user.", "user id");

/// A price expressed in the smallest currency unit, at least one cent.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct PriceCents(i32);

impl PriceCents {
    /// Creates a price, rejecting amounts below one cent.
    pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
        if value >= 1 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NonPositiveAmount("price in cents"))
        }
    }

    /// Returns the raw amount in cents.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl Display for PriceCents {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for PriceCents {
    type Error = TypeConstraintError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PriceCents> for i32 {
    fn from(value: PriceCents) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_id_rejects_non_positive_values() {
        assert!(ProductId::new(0).is_err());
        assert!(ProductId::new(-3).is_err());
        assert_eq!(ProductId::new(7).unwrap().get(), 7);
    }

    #[test]
    fn price_requires_at_least_one_cent() {
        assert!(PriceCents::new(0).is_err());
        assert!(PriceCents::new(-500).is_err());
        assert_eq!(PriceCents::new(1).unwrap().get(), 1);
    }
}
