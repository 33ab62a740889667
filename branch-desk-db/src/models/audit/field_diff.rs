use branch_desk_api::{FieldValue, FieldValues};
use serde::{Deserialize, Serialize};

/// Changed fields between a snapshot and a proposed update.
///
/// Only constructed by [`compute_diff`], which guarantees at least one changed
/// field and identical key sets for previous and new values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDiff {
    updated_fields: Vec<String>,
    previous_values: FieldValues,
    new_values: FieldValues,
}

impl FieldDiff {
    /// Changed field names in declaration order
    pub fn updated_fields(&self) -> &[String] {
        &self.updated_fields
    }

    pub fn previous_values(&self) -> &FieldValues {
        &self.previous_values
    }

    pub fn new_values(&self) -> &FieldValues {
        &self.new_values
    }

    pub fn into_parts(self) -> (Vec<String>, FieldValues, FieldValues) {
        (self.updated_fields, self.previous_values, self.new_values)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffResult {
    NoChanges,
    Changed(FieldDiff),
}

impl DiffResult {
    pub fn is_empty(&self) -> bool {
        matches!(self, DiffResult::NoChanges)
    }
}

/// Compares proposed values against a snapshot, field by field in the order of `field_names`.
///
/// A field is changed when `proposed` carries a value for it that differs
/// from `before`. Fields missing from `proposed` are untouched, which is not
/// the same as an explicit `FieldValue::Null`.
pub fn compute_diff(field_names: &[&str], before: &FieldValues, proposed: &FieldValues) -> DiffResult {
    let mut updated_fields = Vec::new();
    let mut previous_values = FieldValues::new();
    let mut new_values = FieldValues::new();

    for name in field_names {
        let Some(new_value) = proposed.get(*name) else {
            continue;
        };
        let old_value = before.get(*name).cloned().unwrap_or(FieldValue::Null);
        if &old_value == new_value {
            continue;
        }
        updated_fields.push(name.to_string());
        previous_values.insert(name.to_string(), old_value);
        new_values.insert(name.to_string(), new_value.clone());
    }

    if updated_fields.is_empty() {
        DiffResult::NoChanges
    } else {
        DiffResult::Changed(FieldDiff {
            updated_fields,
            previous_values,
            new_values,
        })
    }
}
