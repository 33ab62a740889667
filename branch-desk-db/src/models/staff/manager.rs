use branch_desk_api::{ActorIdentity, Role};
use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};

use crate::models::identifiable::Identifiable;
use crate::utils::utf8_capacity;

pub const USERNAME_LEN: usize = 8;
pub const MANAGER_NAME_MAX_CHARS: usize = 100;

/// Database model for a branch manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerModel {
    pub id: i64,
    /// Generated login name, 8 lowercase hex characters, unique
    pub username: HeaplessString<USERNAME_LEN>,
    /// Display name
    pub name: HeaplessString<{ utf8_capacity(MANAGER_NAME_MAX_CHARS) }>,
    /// Hex-encoded sealed password, never the plaintext
    pub password: String,
    /// References BranchModel.id
    pub branch_id: i64,
    pub created_at: DateTime<Utc>,
}

impl ManagerModel {
    pub fn role(&self) -> Role {
        Role::Manager
    }

    pub fn to_actor(&self) -> ActorIdentity {
        ActorIdentity::manager(self.id, &self.username, &self.name, self.branch_id)
    }
}

impl Identifiable for ManagerModel {
    type Id = i64;

    fn get_id(&self) -> i64 {
        self.id
    }
}
