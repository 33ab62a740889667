use async_trait::async_trait;

use crate::models::staff::BranchModel;
use crate::repository::create_batch::CreateBatch;
use crate::repository::exist_by_ids::ExistByIds;
use crate::repository::find_by_id::FindById;

#[async_trait]
pub trait BranchRepository: FindById<BranchModel> + CreateBatch<BranchModel> + ExistByIds<BranchModel> {
    async fn find_by_name(&self, name: &str) -> Result<Option<BranchModel>, Box<dyn std::error::Error + Send + Sync>>;

    /// Every branch ordered by id
    async fn find_all(&self) -> Result<Vec<BranchModel>, Box<dyn std::error::Error + Send + Sync>>;
}
