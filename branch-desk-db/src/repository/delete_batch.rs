use async_trait::async_trait;

use crate::models::identifiable::Identifiable;

/// Generic repository trait for physically deleting multiple entities in a batch
///
/// Applications are never deleted through this trait; they are soft deleted
/// with an update instead.
#[async_trait]
pub trait DeleteBatch<T: Identifiable>: Send + Sync {
    /// Delete multiple items by their ids
    ///
    /// # Returns
    /// * `Ok(usize)` - The number of items actually deleted
    /// * `Err` - An error if the statement could not be executed
    async fn delete_batch(&self, ids: &[T::Id]) -> Result<usize, Box<dyn std::error::Error + Send + Sync>>;
}
