use std::sync::Arc;

use super::{
    application_repository::ApplicationRepositoryImpl,
    audit_entry_repository::AuditEntryRepositoryImpl,
};
use postgres_unit_of_work::Executor;

/// Factory for creating application module repositories
///
/// Builds repositories bound to the executor of one unit of work.
/// This should be used as a singleton throughout the application.
#[derive(Default)]
pub struct ApplicationRepoFactory {}

impl ApplicationRepoFactory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {})
    }

    pub fn build_application_repo(&self, executor: &Executor) -> Arc<ApplicationRepositoryImpl> {
        Arc::new(ApplicationRepositoryImpl::new(executor.clone()))
    }

    pub fn build_audit_entry_repo(&self, executor: &Executor) -> Arc<AuditEntryRepositoryImpl> {
        Arc::new(AuditEntryRepositoryImpl::new(executor.clone()))
    }

    /// Build all application repositories with the given executor
    pub fn build_all_repos(&self, executor: &Executor) -> ApplicationRepositories {
        ApplicationRepositories {
            application_repository: self.build_application_repo(executor),
            audit_entry_repository: self.build_audit_entry_repo(executor),
        }
    }
}

/// Container for all application module repositories
#[derive(Clone)]
pub struct ApplicationRepositories {
    pub application_repository: Arc<ApplicationRepositoryImpl>,
    pub audit_entry_repository: Arc<AuditEntryRepositoryImpl>,
}
