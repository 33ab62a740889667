use async_trait::async_trait;

use crate::models::staff::ManagerModel;
use crate::repository::create_batch::CreateBatch;
use crate::repository::delete_batch::DeleteBatch;
use crate::repository::exist_by_ids::ExistByIds;
use crate::repository::find_by_id::FindById;
use crate::repository::pagination::{Page, PageRequest};
use crate::repository::update_batch::UpdateBatch;

#[async_trait]
pub trait ManagerRepository:
    FindById<ManagerModel>
    + CreateBatch<ManagerModel>
    + UpdateBatch<ManagerModel>
    + DeleteBatch<ManagerModel>
    + ExistByIds<ManagerModel>
{
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<ManagerModel>, Box<dyn std::error::Error + Send + Sync>>;

    /// Managers ordered by id
    async fn find_page(&self, page: PageRequest) -> Result<Page<ManagerModel>, Box<dyn std::error::Error + Send + Sync>>;
}
