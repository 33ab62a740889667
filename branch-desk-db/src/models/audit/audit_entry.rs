use branch_desk_api::FieldValues;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::field_diff::FieldDiff;
use crate::models::identifiable::Identifiable;

/// # Documentation
/// - Immutable record of one committed field-level change set of an application.
/// - Written in the same transaction as the application it describes.
/// - Only created when at least one tracked field changed; never updated or deleted.
/// - The key sets of `previous_values` and `new_values` equal `updated_fields`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntryModel {
    pub id: Uuid,
    pub application_id: i64,
    pub updated_fields: Vec<String>,
    pub previous_values: FieldValues,
    pub new_values: FieldValues,
    pub changed_at: DateTime<Utc>,
    /// Username of the acting admin or manager
    pub updated_by: String,
}

impl AuditEntryModel {
    pub fn from_diff(application_id: i64, diff: FieldDiff, updated_by: &str, changed_at: DateTime<Utc>) -> Self {
        let (updated_fields, previous_values, new_values) = diff.into_parts();
        Self {
            id: Uuid::new_v4(),
            application_id,
            updated_fields,
            previous_values,
            new_values,
            changed_at,
            updated_by: updated_by.to_string(),
        }
    }
}

impl Identifiable for AuditEntryModel {
    type Id = Uuid;

    fn get_id(&self) -> Uuid {
        self.id
    }
}
