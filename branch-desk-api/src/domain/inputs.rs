use serde::{Deserialize, Serialize};
use validator::Validate;

use super::application_status::ApplicationStatus;
use super::branch_id::BranchId;

/// Partial update of an application.
///
/// `None` means "leave untouched"; it is never treated as "set to empty".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ApplicationUpdate {
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub client_name: Option<String>,
    #[validate(length(min = 1, max = 20, message = "must be between 1 and 20 characters"))]
    pub phone_number: Option<String>,
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub product: Option<String>,
    pub status: Option<ApplicationStatus>,
    pub branch_id: Option<BranchId>,
}

impl ApplicationUpdate {
    pub fn is_empty(&self) -> bool {
        self.client_name.is_none()
            && self.phone_number.is_none()
            && self.product.is_none()
            && self.status.is_none()
            && self.branch_id.is_none()
    }
}

/// Intake of a new client application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewApplication {
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub client_name: String,
    #[validate(length(min = 1, max = 20, message = "must be between 1 and 20 characters"))]
    pub phone_number: String,
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub product: String,
    pub branch_id: BranchId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewManager {
    #[validate(length(min = 1, max = 100, message = "Manager name is required (max 100 characters)"))]
    pub name: String,
    #[validate(length(min = 1, message = "Manager password is required"))]
    pub password: String,
    pub branch_id: BranchId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ManagerUpdate {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub name: Option<String>,
    pub branch_id: Option<BranchId>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationFilter {
    pub branch_id: Option<BranchId>,
    pub status: Option<ApplicationStatus>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(alias = "asc", alias = "ASC")]
    Asc,
    #[serde(alias = "desc", alias = "DESC")]
    Desc,
}

/// A caller-supplied sort key; the field name is resolved by the query layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortInput {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortInput {
    pub fn asc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: SortDirection::Desc,
        }
    }
}

fn default_first() -> usize {
    10
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListApplicationsRequest {
    #[serde(default)]
    pub filter: Option<ApplicationFilter>,
    #[serde(default)]
    pub sort: Vec<SortInput>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default = "default_first")]
    pub first: usize,
    #[serde(default)]
    pub offset: usize,
}

impl Default for ListApplicationsRequest {
    fn default() -> Self {
        Self {
            filter: None,
            sort: Vec::new(),
            search: None,
            first: default_first(),
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_update_leaves_absent_fields_none() {
        let update: ApplicationUpdate =
            serde_json::from_str(r#"{"status": "closed", "branch_id": "4"}"#).unwrap();
        assert_eq!(update.status, Some(ApplicationStatus::Closed));
        assert_eq!(update.branch_id, Some(BranchId(4)));
        assert!(update.client_name.is_none());
        assert!(update.phone_number.is_none());
        assert!(!update.is_empty());
        assert!(ApplicationUpdate::default().is_empty());
    }

    #[test]
    fn test_update_validation_rejects_long_phone() {
        let update = ApplicationUpdate {
            phone_number: Some("1".repeat(21)),
            ..Default::default()
        };
        let err: crate::ApiError = update.validate().unwrap_err().into();
        assert!(
            matches!(err, crate::ApiError::ValidationError { ref field, .. } if field == "phone_number")
        );
    }

    #[test]
    fn test_new_manager_requires_name() {
        let input = NewManager {
            name: String::new(),
            password: "secret".to_string(),
            branch_id: BranchId(1),
        };
        let err: crate::ApiError = input.validate().unwrap_err().into();
        assert_eq!(
            err,
            crate::ApiError::validation("name", "Manager name is required (max 100 characters)")
        );
    }

    #[test]
    fn test_list_request_defaults() {
        let request: ListApplicationsRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request, ListApplicationsRequest::default());
        assert_eq!(request.first, 10);

        let sort: SortInput = serde_json::from_str(r#"{"field": "id", "direction": "DESC"}"#).unwrap();
        assert_eq!(sort, SortInput::desc("id"));
    }
}
