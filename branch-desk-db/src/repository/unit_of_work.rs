use std::sync::Arc;

use async_trait::async_trait;

use crate::repository::admin_repository::AdminRepository;
use crate::repository::application_repository::ApplicationRepository;
use crate::repository::audit_entry_repository::AuditEntryRepository;
use crate::repository::branch_repository::BranchRepository;
use crate::repository::manager_repository::ManagerRepository;

/// Source of units of work, one per service call
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Opens a new unit of work; nothing written through it is visible to
    /// other sessions before `commit`.
    async fn begin(&self) -> Result<Box<dyn UnitOfWorkSession>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Repositories sharing one transaction.
///
/// `commit` and `rollback` consume the transaction; any repository call made
/// afterwards fails.
#[async_trait]
pub trait UnitOfWorkSession: Send + Sync {
    fn applications(&self) -> Arc<dyn ApplicationRepository>;
    fn audit_entries(&self) -> Arc<dyn AuditEntryRepository>;
    fn managers(&self) -> Arc<dyn ManagerRepository>;
    fn admins(&self) -> Arc<dyn AdminRepository>;
    fn branches(&self) -> Arc<dyn BranchRepository>;

    async fn commit(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    async fn rollback(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
