use async_trait::async_trait;

use crate::models::identifiable::Identifiable;

/// Generic repository trait for loading multiple entities by their ids
///
/// Returns items in the same order as the provided ids.
/// Missing items are represented as None in the result.
#[async_trait]
pub trait LoadBatch<T: Identifiable>: Send + Sync {
    /// Load multiple entities by their unique identifiers
    ///
    /// # Returns
    /// * `Ok(Vec<Option<T>>)` - A vector of optional entities in the same order as the provided ids
    ///   - `Some(T)` for entities that exist
    ///   - `None` for entities that do not exist
    /// * `Err` - An error if the query could not be executed
    async fn load_batch(&self, ids: &[T::Id]) -> Result<Vec<Option<T>>, Box<dyn std::error::Error + Send + Sync>>;
}
