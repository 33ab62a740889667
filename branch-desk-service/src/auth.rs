use branch_desk_api::{ActorIdentity, ApiError, ApiResult, LogoutOutcome};
use branch_desk_db::models::AdminModel;
use branch_desk_db::repository::CreateBatch;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::context::{storage_error, ServiceContext};

/// Token handed out on login together with the resolved actor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionGrant {
    pub token: String,
    pub actor: ActorIdentity,
}

#[derive(Clone)]
pub struct AuthService {
    ctx: ServiceContext,
}

impl AuthService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn login_admin(&self, password: &str) -> ApiResult<SessionGrant> {
        let session = self.ctx.begin().await?;
        let admin = session.admins().find_first().await.map_err(storage_error("load admin"));
        self.ctx.release(session).await;

        let Some(admin) = admin? else {
            tracing::warn!("Admin login attempted before an admin was seeded");
            return Err(ApiError::InvalidCredentials);
        };
        if !self.ctx.passwords.verify(&admin.password, password) {
            tracing::warn!("Admin login rejected");
            return Err(ApiError::InvalidCredentials);
        }

        let grant = self.grant(admin.to_actor()).await;
        tracing::info!(admin_id = admin.id, "Admin logged in");
        Ok(grant)
    }

    pub async fn login_manager(&self, username: &str, password: &str) -> ApiResult<SessionGrant> {
        let session = self.ctx.begin().await?;
        let manager = session
            .managers()
            .find_by_username(username)
            .await
            .map_err(storage_error("load manager"));
        self.ctx.release(session).await;

        let Some(manager) = manager? else {
            tracing::warn!(username, "Manager not found");
            return Err(ApiError::not_found("Manager", username));
        };
        if !self.ctx.passwords.verify(&manager.password, password) {
            tracing::warn!(username, "Manager login rejected");
            return Err(ApiError::InvalidCredentials);
        }

        let grant = self.grant(manager.to_actor()).await;
        tracing::info!(manager_id = manager.id, username, "Manager logged in");
        Ok(grant)
    }

    /// Never fails; a second logout reports that no session was active
    pub async fn logout(&self, token: Option<&str>) -> LogoutOutcome {
        let revoked = match token {
            Some(token) => self.ctx.sessions.revoke(token).await,
            None => false,
        };
        if revoked {
            tracing::info!("Session closed");
            LogoutOutcome::LoggedOut
        } else {
            LogoutOutcome::NoActiveSession
        }
    }

    pub async fn current_actor(&self, token: &str) -> Option<ActorIdentity> {
        self.ctx.sessions.resolve(token).await
    }

    /// Stores the admin account used by `login_admin`
    pub async fn seed_admin(&self, password: &str) -> ApiResult<AdminModel> {
        if password.trim().is_empty() {
            return Err(ApiError::validation("password", "Admin password is required"));
        }
        let admin = AdminModel {
            id: 0,
            password: self.ctx.passwords.encrypt(password)?,
            created_at: Utc::now(),
        };

        let session = self.ctx.begin().await?;
        let result = session
            .admins()
            .create_batch(vec![admin])
            .await
            .map_err(storage_error("create admin"))
            .and_then(|mut created| {
                created
                    .pop()
                    .ok_or_else(|| ApiError::InternalError("Failed to create admin".to_string()))
            });
        let admin = self.ctx.commit_or_discard(session, result).await?;
        tracing::info!(admin_id = admin.id, "Admin account created");
        Ok(admin)
    }

    async fn grant(&self, actor: ActorIdentity) -> SessionGrant {
        let token = self.ctx.sessions.create(actor.clone()).await;
        SessionGrant { token, actor }
    }
}
