//! # Mutation pipeline
//!
//! Every application write follows the same path inside one unit of work:
//! guard, fetch, snapshot, apply, diff, persist. The entity and its audit
//! entry are committed together or not at all; after a successful commit the
//! cached copy of the application is dropped.

use branch_desk_api::{
    ActorIdentity, ApiError, ApiResult, ApplicationStatus, ApplicationUpdate, DeleteOutcome, NewApplication, STAFF,
};
use branch_desk_db::models::{compute_diff, ApplicationModel, AuditEntryModel, DiffResult, NoteSequence, Tracked, PHONE_NUMBER_MAX_CHARS};
use branch_desk_db::repository::{CreateBatch, ExistByIds, FindById, UnitOfWorkSession, UpdateBatch};
use branch_desk_db::utils::bounded;
use chrono::Utc;
use validator::Validate;

use crate::access_guard::authorize;
use crate::context::{storage_error, ServiceContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Start,
    Authorized,
    Fetched,
    Snapshotted,
    Applied,
    Diffed,
    Committed,
    Failed,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PipelineStage::Start => "start",
            PipelineStage::Authorized => "authorized",
            PipelineStage::Fetched => "fetched",
            PipelineStage::Snapshotted => "snapshotted",
            PipelineStage::Applied => "applied",
            PipelineStage::Diffed => "diffed",
            PipelineStage::Committed => "committed",
            PipelineStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

fn stage(stage: PipelineStage, application_id: i64) {
    tracing::debug!(%stage, application_id, "Mutation pipeline");
}

/// Loads an application the actor may see, `NotFound` otherwise
pub(crate) async fn fetch_visible(
    session: &dyn UnitOfWorkSession,
    actor: &ActorIdentity,
    id: i64,
) -> ApiResult<ApplicationModel> {
    let application = session
        .applications()
        .find_by_id(id)
        .await
        .map_err(storage_error("load application"))?;
    match application {
        Some(application) if application.is_visible_to(actor) => Ok(application),
        _ => {
            tracing::warn!(application_id = id, username = %actor.username, "Application not found");
            Err(ApiError::not_found("Application", id))
        }
    }
}

pub(crate) async fn ensure_branch_exists(
    session: &dyn UnitOfWorkSession,
    field: &str,
    branch_id: i64,
) -> ApiResult<()> {
    let found = session
        .branches()
        .exist_by_ids(&[branch_id])
        .await
        .map_err(storage_error("check branch"))?;
    if found.iter().all(|(_, exists)| *exists) && !found.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation(field, format!("Branch {branch_id} does not exist")))
    }
}

/// Application writes: intake, tracked-field updates and soft deletion
#[derive(Clone)]
pub struct MutationPipeline {
    ctx: ServiceContext,
}

impl MutationPipeline {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn submit_application(
        &self,
        actor: Option<&ActorIdentity>,
        input: NewApplication,
    ) -> ApiResult<ApplicationModel> {
        let actor = authorize(actor, STAFF)?;
        input.validate()?;

        let session = self.ctx.begin().await?;
        let result = Self::submit_in(&*session, input).await;
        let created = self.ctx.commit_or_discard(session, result).await?;
        tracing::info!(application_id = created.id, username = %actor.username, "Application submitted");
        Ok(created)
    }

    async fn submit_in(session: &dyn UnitOfWorkSession, input: NewApplication) -> ApiResult<ApplicationModel> {
        ensure_branch_exists(session, "branch_id", input.branch_id.get()).await?;
        let application = ApplicationModel {
            id: 0,
            client_name: input.client_name,
            phone_number: bounded("phone_number", &input.phone_number, PHONE_NUMBER_MAX_CHARS)?,
            product: input.product,
            status: ApplicationStatus::InProgress,
            branch_id: input.branch_id.get(),
            notes: NoteSequence::new(),
            is_deleted: false,
            deleted_at: None,
            deleted_by: None,
            created_at: Utc::now(),
        };
        let mut created = session
            .applications()
            .create_batch(vec![application])
            .await
            .map_err(storage_error("create application"))?;
        created
            .pop()
            .ok_or_else(|| ApiError::InternalError("Failed to create application".to_string()))
    }

    /// Applies the present fields of `update` and records one audit entry for
    /// whatever actually changed. Unchanged values write nothing.
    pub async fn update_application(
        &self,
        actor: Option<&ActorIdentity>,
        id: i64,
        update: ApplicationUpdate,
    ) -> ApiResult<ApplicationModel> {
        stage(PipelineStage::Start, id);
        let actor = authorize(actor, STAFF)?;
        update.validate()?;
        stage(PipelineStage::Authorized, id);

        let session = self.ctx.begin().await?;
        let result = Self::update_in(&*session, &actor, id, &update).await;
        let result = self.ctx.commit_or_discard(session, result).await;
        self.conclude(id, result).await
    }

    async fn update_in(
        session: &dyn UnitOfWorkSession,
        actor: &ActorIdentity,
        id: i64,
        update: &ApplicationUpdate,
    ) -> ApiResult<ApplicationModel> {
        let mut application = fetch_visible(session, actor, id).await?;
        stage(PipelineStage::Fetched, id);

        if let Some(branch_id) = update.branch_id {
            ensure_branch_exists(session, "branch_id", branch_id.get()).await?;
        }

        let before = application.snapshot();
        stage(PipelineStage::Snapshotted, id);

        let proposed = ApplicationModel::proposed(update);
        application.apply_patch(update)?;
        stage(PipelineStage::Applied, id);

        let diff = compute_diff(&ApplicationModel::tracked_field_names(), &before, &proposed);
        stage(PipelineStage::Diffed, id);

        let DiffResult::Changed(diff) = diff else {
            return Ok(application);
        };
        let entry = AuditEntryModel::from_diff(id, diff, &actor.username, Utc::now());

        let mut updated = session
            .applications()
            .update_batch(vec![application])
            .await
            .map_err(storage_error("update application"))?;
        session
            .audit_entries()
            .create_batch(vec![entry])
            .await
            .map_err(storage_error("record audit entry"))?;

        updated
            .pop()
            .ok_or_else(|| ApiError::InternalError("Failed to update application".to_string()))
    }

    /// Soft delete. Deleting an already deleted application succeeds without
    /// touching the original deletion stamp.
    pub async fn delete_application(&self, actor: Option<&ActorIdentity>, id: i64) -> ApiResult<DeleteOutcome> {
        stage(PipelineStage::Start, id);
        let actor = authorize(actor, STAFF)?;
        stage(PipelineStage::Authorized, id);

        let session = self.ctx.begin().await?;
        let result = Self::delete_in(&*session, &actor, id).await;
        let result = self.ctx.commit_or_discard(session, result).await;
        self.conclude(id, result).await?;

        tracing::info!(application_id = id, username = %actor.username, "Application soft-deleted");
        Ok(DeleteOutcome::deleted(format!("Application {id} soft-deleted")))
    }

    async fn delete_in(session: &dyn UnitOfWorkSession, actor: &ActorIdentity, id: i64) -> ApiResult<()> {
        let mut application = fetch_visible(session, actor, id).await?;
        stage(PipelineStage::Fetched, id);

        if !application.soft_delete(&actor.username, Utc::now()) {
            return Ok(());
        }
        session
            .applications()
            .update_batch(vec![application])
            .await
            .map_err(storage_error("delete application"))?;
        Ok(())
    }

    async fn conclude<T>(&self, id: i64, result: ApiResult<T>) -> ApiResult<T> {
        match &result {
            Ok(_) => {
                stage(PipelineStage::Committed, id);
                self.ctx.invalidate_application(id).await;
            }
            Err(e) => tracing::debug!(stage = %PipelineStage::Failed, application_id = id, error = %e, "Mutation pipeline"),
        }
        result
    }
}
