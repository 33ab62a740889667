use async_trait::async_trait;

use crate::models::application::{ApplicationCriteria, ApplicationModel, BranchCount, StatusCounts};
use crate::repository::create_batch::CreateBatch;
use crate::repository::exist_by_ids::ExistByIds;
use crate::repository::find_by_id::FindById;
use crate::repository::load_batch::LoadBatch;
use crate::repository::pagination::{Page, PageRequest};
use crate::repository::update_batch::UpdateBatch;

/// Store access for applications and their notes.
///
/// Notes are persisted with their application: `update_batch` writes the
/// complete note sequence of every item.
#[async_trait]
pub trait ApplicationRepository:
    FindById<ApplicationModel>
    + LoadBatch<ApplicationModel>
    + CreateBatch<ApplicationModel>
    + UpdateBatch<ApplicationModel>
    + ExistByIds<ApplicationModel>
{
    /// Applications matching `criteria`, ordered by its effective sort
    async fn find_page(
        &self,
        criteria: &ApplicationCriteria,
        page: PageRequest,
    ) -> Result<Page<ApplicationModel>, Box<dyn std::error::Error + Send + Sync>>;

    /// Per-status totals over every application matching `criteria`
    async fn count_by_status(
        &self,
        criteria: &ApplicationCriteria,
    ) -> Result<StatusCounts, Box<dyn std::error::Error + Send + Sync>>;

    /// Per-branch totals over every application matching `criteria`, by branch id ascending
    async fn count_by_branch(
        &self,
        criteria: &ApplicationCriteria,
    ) -> Result<Vec<BranchCount>, Box<dyn std::error::Error + Send + Sync>>;
}
