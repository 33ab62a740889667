use async_trait::async_trait;

use crate::models::identifiable::Identifiable;

/// Generic repository trait for checking existence of multiple entities by their ids
///
/// # Example
/// ```ignore
/// let exists = branches.exist_by_ids(&[branch_id]).await?;
/// if !exists.iter().all(|(_, found)| *found) {
///     // reject the reference
/// }
/// ```
#[async_trait]
pub trait ExistByIds<T: Identifiable>: Send + Sync {
    /// Check existence of multiple entities
    ///
    /// # Returns
    /// * `Ok(Vec<(T::Id, bool)>)` - Each requested id paired with its existence status, in input order
    /// * `Err` - An error if the query could not be executed
    async fn exist_by_ids(&self, ids: &[T::Id]) -> Result<Vec<(T::Id, bool)>, Box<dyn std::error::Error + Send + Sync>>;
}
