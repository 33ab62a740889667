use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

use crate::error::ApiError;

/// Canonical branch reference.
///
/// Callers may supply a branch as a JSON number or as a numeric string; both
/// normalize to the same integer so that `"7"` and `7` never diff as a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BranchId(pub i64);

impl BranchId {
    pub fn get(&self) -> i64 {
        self.0
    }

    /// Parses a caller-supplied branch reference, reporting the offending field on failure
    pub fn parse_field(field: &str, value: &str) -> Result<Self, ApiError> {
        value.parse().map_err(|_| {
            ApiError::validation(field, format!("branch id must be an integer, got '{value}'"))
        })
    }
}

impl From<i64> for BranchId {
    fn from(value: i64) -> Self {
        BranchId(value)
    }
}

impl std::fmt::Display for BranchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BranchId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(BranchId)
    }
}

impl<'de> Deserialize<'de> for BranchId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawBranchId {
            Number(i64),
            Text(String),
        }

        match RawBranchId::deserialize(deserializer)? {
            RawBranchId::Number(n) => Ok(BranchId(n)),
            RawBranchId::Text(s) => s
                .parse()
                .map_err(|_| serde::de::Error::custom(format!("Invalid branch id: {s}"))),
        }
    }
}
