use async_trait::async_trait;

use crate::models::identifiable::Identifiable;

/// Generic repository trait for updating multiple entities in a batch
///
/// Updates run inside the caller's unit of work and become visible on commit.
///
/// # Example
/// ```ignore
/// impl UpdateBatch<ApplicationModel> for ApplicationRepositoryImpl {
///     async fn update_batch(&self, items: Vec<ApplicationModel>) -> Result<Vec<ApplicationModel>, Box<dyn Error + Send + Sync>> {
///         // Implementation
///     }
/// }
/// ```
#[async_trait]
pub trait UpdateBatch<T: Identifiable>: Send + Sync {
    /// Update multiple items
    ///
    /// # Returns
    /// * `Ok(Vec<T>)` - The updated entities
    /// * `Err` - An error if an item does not exist or the statement failed
    async fn update_batch(&self, items: Vec<T>) -> Result<Vec<T>, Box<dyn std::error::Error + Send + Sync>>;
}
