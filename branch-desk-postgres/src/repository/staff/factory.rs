use std::sync::Arc;

use super::{
    admin_repository::AdminRepositoryImpl,
    branch_repository::BranchRepositoryImpl,
    manager_repository::ManagerRepositoryImpl,
};
use postgres_unit_of_work::Executor;

/// Factory for creating staff module repositories: managers, admins and branches
#[derive(Default)]
pub struct StaffRepoFactory {}

impl StaffRepoFactory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {})
    }

    pub fn build_manager_repo(&self, executor: &Executor) -> Arc<ManagerRepositoryImpl> {
        Arc::new(ManagerRepositoryImpl::new(executor.clone()))
    }

    pub fn build_admin_repo(&self, executor: &Executor) -> Arc<AdminRepositoryImpl> {
        Arc::new(AdminRepositoryImpl::new(executor.clone()))
    }

    pub fn build_branch_repo(&self, executor: &Executor) -> Arc<BranchRepositoryImpl> {
        Arc::new(BranchRepositoryImpl::new(executor.clone()))
    }

    pub fn build_all_repos(&self, executor: &Executor) -> StaffRepositories {
        StaffRepositories {
            manager_repository: self.build_manager_repo(executor),
            admin_repository: self.build_admin_repo(executor),
            branch_repository: self.build_branch_repo(executor),
        }
    }
}

/// Container for all staff module repositories
#[derive(Clone)]
pub struct StaffRepositories {
    pub manager_repository: Arc<ManagerRepositoryImpl>,
    pub admin_repository: Arc<AdminRepositoryImpl>,
    pub branch_repository: Arc<BranchRepositoryImpl>,
}
