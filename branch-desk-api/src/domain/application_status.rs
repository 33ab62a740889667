use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

use crate::error::ApiError;

/// Lifecycle status of a client application.
///
/// Ordering follows declaration order, matching the database enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "application_status", rename_all = "kebab-case"))]
pub enum ApplicationStatus {
    #[default]
    InProgress,
    Closed,
    Transferred,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 3] = [
        ApplicationStatus::InProgress,
        ApplicationStatus::Closed,
        ApplicationStatus::Transferred,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::InProgress => "in-progress",
            ApplicationStatus::Closed => "closed",
            ApplicationStatus::Transferred => "transferred",
        }
    }

    /// Parses a caller-supplied status, reporting the offending field on failure
    pub fn parse_field(field: &str, value: &str) -> Result<Self, ApiError> {
        value
            .parse()
            .map_err(|_| ApiError::validation(field, format!("unknown status '{value}'")))
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in-progress" => Ok(ApplicationStatus::InProgress),
            "closed" => Ok(ApplicationStatus::Closed),
            "transferred" => Ok(ApplicationStatus::Transferred),
            _ => Err(()),
        }
    }
}

impl Serialize for ApplicationStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ApplicationStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value_str = String::deserialize(deserializer)?;
        value_str
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("Invalid ApplicationStatus: {value_str}")))
    }
}
