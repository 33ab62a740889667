use branch_desk_api::{ActorIdentity, ApiError, ApiResult, ADMIN_ONLY};
use branch_desk_db::models::{BranchModel, BRANCH_NAME_MAX_CHARS};
use branch_desk_db::repository::{CreateBatch, UniqueViolation, UnitOfWorkSession};
use branch_desk_db::utils::bounded;
use chrono::Utc;

use crate::access_guard::authorize;
use crate::context::{storage_error, ServiceContext};

fn duplicate_name(name: &str) -> ApiError {
    ApiError::validation("name", format!("Branch '{name}' already exists"))
}

#[derive(Clone)]
pub struct BranchService {
    ctx: ServiceContext,
}

impl BranchService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn register_branch(&self, actor: Option<&ActorIdentity>, name: &str) -> ApiResult<BranchModel> {
        authorize(actor, ADMIN_ONLY)?;
        self.create_branch(name).await
    }

    /// Unguarded creation for operator tooling
    pub async fn create_branch(&self, name: &str) -> ApiResult<BranchModel> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::validation("name", "Branch name is required"));
        }
        let branch = BranchModel {
            id: 0,
            name: bounded("name", name, BRANCH_NAME_MAX_CHARS)?,
            created_at: Utc::now(),
        };

        let session = self.ctx.begin().await?;
        let result = Self::create_in(&*session, branch).await;
        let created = self.ctx.commit_or_discard(session, result).await?;
        tracing::info!(branch_id = created.id, name = %created.name, "Branch registered");
        Ok(created)
    }

    async fn create_in(session: &dyn UnitOfWorkSession, branch: BranchModel) -> ApiResult<BranchModel> {
        let existing = session
            .branches()
            .find_by_name(&branch.name)
            .await
            .map_err(storage_error("check branch name"))?;
        if existing.is_some() {
            return Err(duplicate_name(&branch.name));
        }

        let name = branch.name.clone();
        let mut created = session.branches().create_batch(vec![branch]).await.map_err(|e| {
            if UniqueViolation::is(&*e) {
                duplicate_name(&name)
            } else {
                storage_error("create branch")(e)
            }
        })?;
        created
            .pop()
            .ok_or_else(|| ApiError::InternalError("Failed to create branch".to_string()))
    }

    /// Open to any authenticated actor
    pub async fn list_branches(&self, actor: Option<&ActorIdentity>) -> ApiResult<Vec<BranchModel>> {
        authorize(actor, &[])?;
        let session = self.ctx.begin().await?;
        let result = session.branches().find_all().await.map_err(storage_error("list branches"));
        self.ctx.release(session).await;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helper::{manager_actor, TestEnv};

    #[tokio::test]
    async fn test_register_and_list() {
        let env = TestEnv::new();
        let north = env.branches().register_branch(Some(&env.admin()), "  North ").await.unwrap();
        assert_eq!(north.name.as_str(), "North");

        let names: Vec<String> = env
            .branches()
            .list_branches(Some(&manager_actor(1)))
            .await
            .unwrap()
            .iter()
            .map(|b| b.name.to_string())
            .collect();
        assert_eq!(names, vec!["Central".to_string(), "North".to_string()]);

        assert_eq!(env.branches().list_branches(None).await, Err(ApiError::Unauthenticated));
    }

    #[tokio::test]
    async fn test_duplicate_and_blank_names_are_rejected() {
        let env = TestEnv::new();
        let err = env.branches().register_branch(Some(&env.admin()), "Central").await.unwrap_err();
        assert!(matches!(err, ApiError::ValidationError { ref field, .. } if field == "name"));

        let err = env.branches().register_branch(Some(&env.admin()), " ").await.unwrap_err();
        assert!(matches!(err, ApiError::ValidationError { ref field, .. } if field == "name"));

        let err = env.branches().register_branch(Some(&manager_actor(1)), "South").await.unwrap_err();
        assert!(matches!(err, ApiError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_concurrent_registration_of_same_name_is_a_validation_error() {
        let env = TestEnv::new();
        let south = || BranchModel {
            id: 0,
            name: bounded("name", "South", BRANCH_NAME_MAX_CHARS).unwrap(),
            created_at: Utc::now(),
        };
        let first = env.ctx().begin().await.unwrap();
        let second = env.ctx().begin().await.unwrap();

        BranchService::create_in(&*first, south()).await.unwrap();
        first.commit().await.unwrap();

        let err = BranchService::create_in(&*second, south()).await.unwrap_err();
        assert_eq!(err, ApiError::validation("name", "Branch 'South' already exists"));
        second.rollback().await.unwrap();
    }

    #[tokio::test]
    async fn test_register_branch_accepts_non_ascii_name() {
        let env = TestEnv::new();
        let name = "Филиал Центральный Новосибирск ".repeat(3);
        let branch = env.branches().register_branch(Some(&env.admin()), &name).await.unwrap();
        assert_eq!(branch.name.as_str(), name.trim());
    }
}

