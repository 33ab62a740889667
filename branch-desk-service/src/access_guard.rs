use branch_desk_api::{ActorIdentity, ApiError, ApiResult, Role};
use std::sync::Arc;

use crate::session::SessionStore;

/// Checks that `actor` holds one of `required` roles.
///
/// An empty role set admits any authenticated actor.
pub fn authorize(actor: Option<&ActorIdentity>, required: &[Role]) -> ApiResult<ActorIdentity> {
    let actor = actor.ok_or(ApiError::Unauthenticated)?;
    if required.is_empty() || required.contains(&actor.role) {
        return Ok(actor.clone());
    }

    let required = required.iter().map(Role::as_str).collect::<Vec<_>>().join(", ");
    tracing::warn!(role = %actor.role, username = %actor.username, %required, "Access denied");
    Err(ApiError::Forbidden { required })
}

/// Token-based entry point: resolves the session first, then checks roles
#[derive(Clone)]
pub struct AccessGuard {
    sessions: Arc<dyn SessionStore>,
}

impl AccessGuard {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self { sessions }
    }

    pub async fn resolve(&self, token: Option<&str>) -> Option<ActorIdentity> {
        match token {
            Some(token) => self.sessions.resolve(token).await,
            None => None,
        }
    }

    pub async fn authorize(&self, token: Option<&str>, required: &[Role]) -> ApiResult<ActorIdentity> {
        let actor = self.resolve(token).await;
        authorize(actor.as_ref(), required)
    }
}
