use branch_desk_api::ActorIdentity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::identifiable::Identifiable;

/// Database model for the admin account.
///
/// Only the first row is used for login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminModel {
    pub id: i64,
    /// Hex-encoded sealed password
    pub password: String,
    pub created_at: DateTime<Utc>,
}

impl AdminModel {
    pub fn to_actor(&self) -> ActorIdentity {
        ActorIdentity::admin(self.id)
    }
}

impl Identifiable for AdminModel {
    type Id = i64;

    fn get_id(&self) -> i64 {
        self.id
    }
}
