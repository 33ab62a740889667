use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};

use crate::models::identifiable::Identifiable;
use crate::utils::utf8_capacity;

pub const BRANCH_NAME_MAX_CHARS: usize = 100;

/// Database model for a branch office
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchModel {
    pub id: i64,
    /// Unique branch name
    pub name: HeaplessString<{ utf8_capacity(BRANCH_NAME_MAX_CHARS) }>,
    pub created_at: DateTime<Utc>,
}

impl Identifiable for BranchModel {
    type Id = i64;

    fn get_id(&self) -> i64 {
        self.id
    }
}
