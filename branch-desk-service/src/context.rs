use branch_desk_api::{ApiError, ApiResult};
use branch_desk_db::repository::{UnitOfWork, UnitOfWorkSession};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{self, CacheStore};
use crate::password::PasswordCipher;
use crate::session::SessionStore;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Collaborators shared by every service
#[derive(Clone)]
pub struct ServiceContext {
    pub unit_of_work: Arc<dyn UnitOfWork>,
    pub sessions: Arc<dyn SessionStore>,
    pub passwords: Arc<dyn PasswordCipher>,
    pub cache: Arc<dyn CacheStore>,
    pub cache_ttl: Duration,
}

/// Logs a storage failure and hides its details from the caller
pub(crate) fn storage_error(operation: &'static str) -> impl FnOnce(BoxError) -> ApiError {
    move |e| {
        tracing::error!(operation, error = %e, "Storage operation failed");
        ApiError::InternalError(format!("Failed to {operation}"))
    }
}

impl ServiceContext {
    pub async fn begin(&self) -> ApiResult<Box<dyn UnitOfWorkSession>> {
        self.unit_of_work
            .begin()
            .await
            .map_err(storage_error("open a unit of work"))
    }

    /// Commits on success and rolls back on failure.
    ///
    /// A failed commit is reported as `InternalError`; the cause is only logged.
    pub async fn commit_or_discard<T>(
        &self,
        session: Box<dyn UnitOfWorkSession>,
        result: ApiResult<T>,
    ) -> ApiResult<T> {
        match result {
            Ok(value) => {
                if let Err(e) = session.commit().await {
                    tracing::error!(error = %e, "Commit failed, changes discarded");
                    if let Err(e) = session.rollback().await {
                        tracing::debug!(error = %e, "Rollback after failed commit");
                    }
                    return Err(ApiError::InternalError("Failed to save changes".to_string()));
                }
                Ok(value)
            }
            Err(err) => {
                self.release(session).await;
                Err(err)
            }
        }
    }

    /// Ends a unit of work without writing anything
    pub async fn release(&self, session: Box<dyn UnitOfWorkSession>) {
        if let Err(e) = session.rollback().await {
            tracing::warn!(error = %e, "Rollback failed");
        }
    }

    pub async fn invalidate_application(&self, id: i64) {
        self.cache.invalidate(&cache::application_key(id)).await;
    }
}
