use async_trait::async_trait;

use crate::models::staff::AdminModel;
use crate::repository::create_batch::CreateBatch;

#[async_trait]
pub trait AdminRepository: CreateBatch<AdminModel> {
    /// The admin used for login: the row with the lowest id
    async fn find_first(&self) -> Result<Option<AdminModel>, Box<dyn std::error::Error + Send + Sync>>;
}
