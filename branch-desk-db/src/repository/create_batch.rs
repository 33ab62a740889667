use async_trait::async_trait;

use crate::models::identifiable::Identifiable;

/// Generic repository trait for creating multiple entities in a batch
///
/// All creates run inside the caller's unit of work.
/// Returns saved items with store-generated fields (ids, timestamps) populated.
///
/// # Example
/// ```ignore
/// impl CreateBatch<BranchModel> for BranchRepositoryImpl {
///     async fn create_batch(&self, items: Vec<BranchModel>) -> Result<Vec<BranchModel>, Box<dyn Error + Send + Sync>> {
///         // Implementation
///     }
/// }
/// ```
#[async_trait]
pub trait CreateBatch<T: Identifiable>: Send + Sync {
    /// Save multiple items
    ///
    /// # Returns
    /// * `Ok(Vec<T>)` - The created entities with generated fields populated, in input order
    /// * `Err` - An error if the statement could not be executed
    async fn create_batch(&self, items: Vec<T>) -> Result<Vec<T>, Box<dyn std::error::Error + Send + Sync>>;
}
