use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::error::{StoreError, StoreResult};

/// What the store does with a negative quantity coming from a direct edit.
///
/// `addToCart`/`removeItem` never produce negatives; only direct edits
/// (the -/+ buttons, the numeric field) can.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuantityPolicy {
    /// Store the value as given. A negative quantity yields a negative line
    /// total.
    #[default]
    PassThrough,
    /// Negative values become 0.
    ClampToZero,
    /// Negative values are refused with [`StoreError::NegativeQuantity`].
    Reject,
}

impl QuantityPolicy {
    pub fn apply(self, value: i64) -> StoreResult<i64> {
        match self {
            _ if value >= 0 => Ok(value),
            QuantityPolicy::PassThrough => Ok(value),
            QuantityPolicy::ClampToZero => Ok(0),
            QuantityPolicy::Reject => Err(StoreError::NegativeQuantity { value }),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown quantity policy `{0}` (expected pass_through, clamp_to_zero or reject)")]
pub struct ParsePolicyError(String);

impl FromStr for QuantityPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pass_through" | "passthrough" => Ok(QuantityPolicy::PassThrough),
            "clamp_to_zero" | "clamp" => Ok(QuantityPolicy::ClampToZero),
            "reject" => Ok(QuantityPolicy::Reject),
            _ => Err(ParsePolicyError(s.to_string())),
        }
    }
}

/// Parse user-typed quantity text.
///
/// Non-numeric text cannot be stored in an integer cell and is rejected.
pub fn parse_quantity(input: &str) -> StoreResult<i64> {
    input
        .trim()
        .parse::<i64>()
        .map_err(|_| StoreError::InvalidQuantity {
            input: input.to_string(),
        })
}
