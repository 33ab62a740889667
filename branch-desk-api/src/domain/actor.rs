use serde::{Deserialize, Serialize};

use super::role::Role;

/// The authenticated caller of an operation.
///
/// Resolved from a session token by the session registry and passed explicitly
/// to every guarded operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorIdentity {
    /// Admin or manager row id
    pub id: i64,
    /// Stable login name, recorded as the acting user in notes and audit entries
    pub username: String,
    pub display_name: String,
    pub role: Role,
    /// Branch affiliation, managers only
    pub branch_id: Option<i64>,
}

impl ActorIdentity {
    pub fn admin(id: i64) -> Self {
        Self {
            id,
            username: "admin".to_string(),
            display_name: "admin".to_string(),
            role: Role::Admin,
            branch_id: None,
        }
    }

    pub fn manager(id: i64, username: &str, display_name: &str, branch_id: i64) -> Self {
        Self {
            id,
            username: username.to_string(),
            display_name: display_name.to_string(),
            role: Role::Manager,
            branch_id: Some(branch_id),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
