use async_trait::async_trait;

use crate::models::audit::AuditEntryModel;
use crate::repository::pagination::{Page, PageRequest};

/// Repository trait for loading the audit trail of an application with pagination
///
/// # Example
/// ```ignore
/// use branch_desk_db::repository::pagination::PageRequest;
///
/// let page = repo.load_audits(application_id, PageRequest::new(20, 0)).await?;
/// println!("{} of {} entries, {} pages", page.items.len(), page.total, page.total_pages());
/// ```
#[async_trait]
pub trait LoadAudits: Send + Sync {
    /// Load audit entries of one application, newest first
    ///
    /// # Arguments
    /// * `application_id` - The application whose history should be loaded
    /// * `page` - The pagination parameters (limit and offset)
    ///
    /// # Returns
    /// * `Ok(Page<AuditEntryModel>)` - A page of entries ordered by `changed_at` descending
    /// * `Err` - An error if the audit entries could not be loaded
    async fn load_audits(
        &self,
        application_id: i64,
        page: PageRequest,
    ) -> Result<Page<AuditEntryModel>, Box<dyn std::error::Error + Send + Sync>>;
}
