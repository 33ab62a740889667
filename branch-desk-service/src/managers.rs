use branch_desk_api::{ActorIdentity, ApiError, ApiResult, DeleteOutcome, ManagerUpdate, NewManager, ADMIN_ONLY};
use branch_desk_db::models::{ManagerModel, MANAGER_NAME_MAX_CHARS, USERNAME_LEN};
use branch_desk_db::repository::{CreateBatch, DeleteBatch, FindById, Page, PageRequest, UnitOfWorkSession, UpdateBatch};
use branch_desk_db::utils::bounded;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::access_guard::authorize;
use crate::context::{storage_error, ServiceContext};
use crate::pipeline::ensure_branch_exists;

/// Manager as returned to callers; the password never leaves the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerProfile {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub branch_id: i64,
    pub created_at: DateTime<Utc>,
}

impl From<&ManagerModel> for ManagerProfile {
    fn from(model: &ManagerModel) -> Self {
        Self {
            id: model.id,
            username: model.username.to_string(),
            name: model.name.to_string(),
            branch_id: model.branch_id,
            created_at: model.created_at,
        }
    }
}

/// First eight hex characters of a random UUID
fn generate_username() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Admin-only manager administration
#[derive(Clone)]
pub struct ManagerService {
    ctx: ServiceContext,
}

impl ManagerService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn register_manager(&self, actor: Option<&ActorIdentity>, input: NewManager) -> ApiResult<ManagerProfile> {
        authorize(actor, ADMIN_ONLY)?;
        input.validate()?;
        if input.name.trim().is_empty() {
            return Err(ApiError::validation("name", "Manager name is required (max 100 characters)"));
        }

        let manager = ManagerModel {
            id: 0,
            username: bounded("username", &generate_username(), USERNAME_LEN)?,
            name: bounded("name", input.name.trim(), MANAGER_NAME_MAX_CHARS)?,
            password: self.ctx.passwords.encrypt(&input.password)?,
            branch_id: input.branch_id.get(),
            created_at: Utc::now(),
        };

        let session = self.ctx.begin().await?;
        let result = Self::register_in(&*session, manager).await;
        let created = self.ctx.commit_or_discard(session, result).await?;
        tracing::info!(manager_id = created.id, username = %created.username, "Manager registered");
        Ok(ManagerProfile::from(&created))
    }

    async fn register_in(session: &dyn UnitOfWorkSession, manager: ManagerModel) -> ApiResult<ManagerModel> {
        ensure_branch_exists(session, "branch_id", manager.branch_id).await?;
        let mut created = session
            .managers()
            .create_batch(vec![manager])
            .await
            .map_err(storage_error("create manager"))?;
        created
            .pop()
            .ok_or_else(|| ApiError::InternalError("Failed to create manager".to_string()))
    }

    pub async fn update_manager(
        &self,
        actor: Option<&ActorIdentity>,
        id: i64,
        update: ManagerUpdate,
    ) -> ApiResult<ManagerProfile> {
        authorize(actor, ADMIN_ONLY)?;
        update.validate()?;
        let password = match &update.password {
            Some(password) => Some(self.ctx.passwords.encrypt(password)?),
            None => None,
        };

        let session = self.ctx.begin().await?;
        let result = Self::update_in(&*session, id, &update, password).await;
        let updated = self.ctx.commit_or_discard(session, result).await?;
        tracing::info!(manager_id = id, "Manager updated");
        Ok(ManagerProfile::from(&updated))
    }

    async fn update_in(
        session: &dyn UnitOfWorkSession,
        id: i64,
        update: &ManagerUpdate,
        password: Option<String>,
    ) -> ApiResult<ManagerModel> {
        let mut manager = Self::find_in(session, id).await?;
        if let Some(name) = &update.name {
            manager.name = bounded("name", name.trim(), MANAGER_NAME_MAX_CHARS)?;
        }
        if let Some(branch_id) = update.branch_id {
            ensure_branch_exists(session, "branch_id", branch_id.get()).await?;
            manager.branch_id = branch_id.get();
        }
        if let Some(password) = password {
            manager.password = password;
        }

        let mut updated = session
            .managers()
            .update_batch(vec![manager])
            .await
            .map_err(storage_error("update manager"))?;
        updated
            .pop()
            .ok_or_else(|| ApiError::InternalError("Failed to update manager".to_string()))
    }

    pub async fn delete_manager(&self, actor: Option<&ActorIdentity>, id: i64) -> ApiResult<DeleteOutcome> {
        authorize(actor, ADMIN_ONLY)?;

        let session = self.ctx.begin().await?;
        let result = Self::delete_in(&*session, id).await;
        self.ctx.commit_or_discard(session, result).await?;
        tracing::info!(manager_id = id, "Manager deleted");
        Ok(DeleteOutcome::deleted(format!("Manager {id} deleted")))
    }

    async fn delete_in(session: &dyn UnitOfWorkSession, id: i64) -> ApiResult<()> {
        let deleted = session
            .managers()
            .delete_batch(&[id])
            .await
            .map_err(storage_error("delete manager"))?;
        if deleted == 0 {
            tracing::warn!(manager_id = id, "Manager not found");
            return Err(ApiError::not_found("Manager", id));
        }
        Ok(())
    }

    pub async fn fetch_manager(&self, actor: Option<&ActorIdentity>, id: i64) -> ApiResult<ManagerProfile> {
        authorize(actor, ADMIN_ONLY)?;
        let session = self.ctx.begin().await?;
        let result = Self::find_in(&*session, id).await;
        self.ctx.release(session).await;
        result.map(|m| ManagerProfile::from(&m))
    }

    pub async fn list_managers(&self, actor: Option<&ActorIdentity>, page: PageRequest) -> ApiResult<Page<ManagerProfile>> {
        authorize(actor, ADMIN_ONLY)?;
        let session = self.ctx.begin().await?;
        let result = session
            .managers()
            .find_page(page)
            .await
            .map_err(storage_error("list managers"));
        self.ctx.release(session).await;

        Ok(result?.map(|m| ManagerProfile::from(&m)))
    }

    async fn find_in(session: &dyn UnitOfWorkSession, id: i64) -> ApiResult<ManagerModel> {
        let manager = session
            .managers()
            .find_by_id(id)
            .await
            .map_err(storage_error("load manager"))?;
        manager.ok_or_else(|| {
            tracing::warn!(manager_id = id, "Manager not found");
            ApiError::not_found("Manager", id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helper::{manager_actor, TestEnv};
    use branch_desk_api::BranchId;

    fn new_manager(name: &str, branch_id: i64) -> NewManager {
        NewManager {
            name: name.to_string(),
            password: "pw".to_string(),
            branch_id: BranchId(branch_id),
        }
    }

    #[test]
    fn test_generated_username_is_eight_hex_chars() {
        let username = generate_username();
        assert_eq!(username.len(), 8);
        assert!(username.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn test_register_manager_encrypts_password() {
        let env = TestEnv::new();
        let profile = env.managers().register_manager(Some(&env.admin()), new_manager("Olga", 1)).await.unwrap();
        assert_eq!(profile.username.len(), 8);
        assert_eq!(profile.name, "Olga");

        let stored = env.manager(profile.id).await.unwrap();
        assert_ne!(stored.password, "pw");
        assert_eq!(env.ctx().passwords.decrypt(&stored.password).unwrap(), "pw");
    }

    #[tokio::test]
    async fn test_manager_cannot_register_managers() {
        let env = TestEnv::new();
        let err = env
            .managers()
            .register_manager(Some(&manager_actor(1)), new_manager("Olga", 1))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::Forbidden {
                required: "admin".to_string()
            }
        );
        assert_eq!(env.manager_count().await, 0);
    }

    #[tokio::test]
    async fn test_register_manager_validation() {
        let env = TestEnv::new();
        let err = env.managers().register_manager(Some(&env.admin()), new_manager("", 1)).await.unwrap_err();
        assert_eq!(err, ApiError::validation("name", "Manager name is required (max 100 characters)"));

        let err = env.managers().register_manager(Some(&env.admin()), new_manager("Olga", 9)).await.unwrap_err();
        assert!(matches!(err, ApiError::ValidationError { ref field, .. } if field == "branch_id"));
        assert_eq!(env.manager_count().await, 0);
    }

    #[tokio::test]
    async fn test_register_manager_accepts_non_ascii_name_up_to_limit() {
        let env = TestEnv::new();
        let name = "Ж".repeat(100);
        let profile = env.managers().register_manager(Some(&env.admin()), new_manager(&name, 1)).await.unwrap();
        assert_eq!(profile.name, name);

        let err = env
            .managers()
            .register_manager(Some(&env.admin()), new_manager(&"Ж".repeat(101), 1))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ValidationError { ref field, .. } if field == "name"));
        assert_eq!(env.manager_count().await, 1);
    }

    #[tokio::test]
    async fn test_update_fetch_list_delete() {
        let env = TestEnv::new();
        let admin = env.admin();
        let north = env.seed_branch("North").await;
        let olga = env.managers().register_manager(Some(&admin), new_manager("Olga", 1)).await.unwrap();
        env.managers().register_manager(Some(&admin), new_manager("Pavel", 1)).await.unwrap();

        let update = ManagerUpdate {
            name: Some("Olga S.".to_string()),
            branch_id: Some(BranchId(north.id)),
            password: Some("new-pw".to_string()),
        };
        let updated = env.managers().update_manager(Some(&admin), olga.id, update).await.unwrap();
        assert_eq!(updated.name, "Olga S.");
        assert_eq!(updated.branch_id, north.id);
        assert_eq!(updated.username, olga.username);
        assert!(env.auth().login_manager(&olga.username, "new-pw").await.is_ok());

        assert_eq!(env.managers().fetch_manager(Some(&admin), olga.id).await.unwrap(), updated);
        let page = env.managers().list_managers(Some(&admin), PageRequest::new(1, 0)).await.unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.items, vec![updated.clone()]);

        let outcome = env.managers().delete_manager(Some(&admin), olga.id).await.unwrap();
        assert!(outcome.success);
        assert_eq!(
            env.managers().fetch_manager(Some(&admin), olga.id).await,
            Err(ApiError::not_found("Manager", olga.id))
        );
        assert_eq!(
            env.managers().delete_manager(Some(&admin), olga.id).await,
            Err(ApiError::not_found("Manager", olga.id))
        );
    }
}
