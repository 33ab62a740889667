//! # Queries
//!
//! Read-only access to applications: filtered listings with aggregate counts,
//! single-application lookup through the read cache, and change history.
//! Reads run in their own unit of work, which is always rolled back.

use branch_desk_api::{ActorIdentity, ApiError, ApiResult, ListApplicationsRequest, ADMIN_ONLY, STAFF};
use branch_desk_db::models::{
    ApplicationCriteria, ApplicationModel, ApplicationSortField, AuditEntryModel, BranchCount, SortKey,
};
use branch_desk_db::repository::{FindById, LoadAudits, Page, PageRequest, UnitOfWorkSession};
use serde::{Deserialize, Serialize};

use crate::access_guard::authorize;
use crate::cache;
use crate::context::{storage_error, ServiceContext};
use crate::pipeline::fetch_visible;

/// One page of applications together with counts over the whole filtered set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationListing {
    pub items: Vec<ApplicationModel>,
    pub total_count: i64,
    pub total_in_progress_count: i64,
    pub total_closed_count: i64,
    pub total_transferred_count: i64,
    pub branch_counts: Vec<BranchCount>,
}

/// Resolves a listing request; unknown sort fields are skipped
pub fn build_criteria(deleted: bool, request: &ListApplicationsRequest) -> ApplicationCriteria {
    let base = if deleted {
        ApplicationCriteria::deleted()
    } else {
        ApplicationCriteria::live()
    };
    let filter = request.filter.unwrap_or_default();
    let mut criteria = base
        .with_branch(filter.branch_id.map(|b| b.get()))
        .with_status(filter.status)
        .with_search(request.search.as_deref());

    for sort in &request.sort {
        match ApplicationSortField::from_name(&sort.field) {
            Some(field) => criteria = criteria.with_sort_key(SortKey::new(field, sort.direction)),
            None => tracing::warn!(field = %sort.field, "Ignoring unknown sort field"),
        }
    }
    criteria
}

#[derive(Clone)]
pub struct QueryService {
    ctx: ServiceContext,
}

impl QueryService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn list_applications(
        &self,
        actor: Option<&ActorIdentity>,
        request: &ListApplicationsRequest,
    ) -> ApiResult<ApplicationListing> {
        authorize(actor, STAFF)?;
        self.list(build_criteria(false, request), request).await
    }

    /// Soft-deleted applications, admins only
    pub async fn list_deleted_applications(
        &self,
        actor: Option<&ActorIdentity>,
        request: &ListApplicationsRequest,
    ) -> ApiResult<ApplicationListing> {
        authorize(actor, ADMIN_ONLY)?;
        self.list(build_criteria(true, request), request).await
    }

    async fn list(&self, criteria: ApplicationCriteria, request: &ListApplicationsRequest) -> ApiResult<ApplicationListing> {
        let session = self.ctx.begin().await?;
        let result = Self::list_in(&*session, &criteria, PageRequest::new(request.first, request.offset)).await;
        self.ctx.release(session).await;
        result
    }

    async fn list_in(
        session: &dyn UnitOfWorkSession,
        criteria: &ApplicationCriteria,
        page: PageRequest,
    ) -> ApiResult<ApplicationListing> {
        let applications = session.applications();
        let items = applications
            .find_page(criteria, page)
            .await
            .map_err(storage_error("list applications"))?
            .items;
        let counts = applications
            .count_by_status(criteria)
            .await
            .map_err(storage_error("count applications"))?;
        let branch_counts = applications
            .count_by_branch(criteria)
            .await
            .map_err(storage_error("count applications per branch"))?;

        Ok(ApplicationListing {
            items,
            total_count: counts.total,
            total_in_progress_count: counts.in_progress,
            total_closed_count: counts.closed,
            total_transferred_count: counts.transferred,
            branch_counts,
        })
    }

    /// Cache-aside lookup; visibility is checked on cached copies too
    pub async fn fetch_application(&self, actor: Option<&ActorIdentity>, id: i64) -> ApiResult<ApplicationModel> {
        let actor = authorize(actor, STAFF)?;
        let key = cache::application_key(id);

        if let Some(bytes) = self.ctx.cache.get(&key).await {
            match cache::decode::<ApplicationModel>(&bytes) {
                Ok(application) if application.is_visible_to(&actor) => return Ok(application),
                Ok(_) => {
                    tracing::warn!(application_id = id, username = %actor.username, "Application not found");
                    return Err(ApiError::not_found("Application", id));
                }
                Err(e) => {
                    tracing::warn!(application_id = id, error = %e, "Dropping unreadable cache entry");
                    self.ctx.cache.invalidate(&key).await;
                }
            }
        }

        let session = self.ctx.begin().await?;
        let loaded = session
            .applications()
            .find_by_id(id)
            .await
            .map_err(storage_error("load application"));
        self.ctx.release(session).await;

        let Some(application) = loaded? else {
            tracing::warn!(application_id = id, "Application not found");
            return Err(ApiError::not_found("Application", id));
        };
        match cache::encode(&application) {
            Ok(bytes) => self.ctx.cache.set(&key, bytes, self.ctx.cache_ttl).await,
            Err(e) => tracing::warn!(application_id = id, error = %e, "Skipping cache fill"),
        }

        if application.is_visible_to(&actor) {
            Ok(application)
        } else {
            tracing::warn!(application_id = id, username = %actor.username, "Application not found");
            Err(ApiError::not_found("Application", id))
        }
    }

    /// Audit entries of one application, newest first
    pub async fn list_history(
        &self,
        actor: Option<&ActorIdentity>,
        application_id: i64,
        page: PageRequest,
    ) -> ApiResult<Page<AuditEntryModel>> {
        let actor = authorize(actor, STAFF)?;
        let session = self.ctx.begin().await?;
        let result = Self::history_in(&*session, &actor, application_id, page).await;
        self.ctx.release(session).await;
        result
    }

    async fn history_in(
        session: &dyn UnitOfWorkSession,
        actor: &ActorIdentity,
        application_id: i64,
        page: PageRequest,
    ) -> ApiResult<Page<AuditEntryModel>> {
        fetch_visible(session, actor, application_id).await?;
        session
            .audit_entries()
            .load_audits(application_id, page)
            .await
            .map_err(storage_error("load history"))
    }
}
