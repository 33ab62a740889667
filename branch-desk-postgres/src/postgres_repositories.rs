use async_trait::async_trait;
use branch_desk_db::repository::{
    AdminRepository, ApplicationRepository, AuditEntryRepository, BranchRepository, ManagerRepository,
    UnitOfWork, UnitOfWorkSession,
};
use sqlx::{PgPool, Postgres, Transaction};
use std::error::Error;
use std::sync::Arc;

use postgres_unit_of_work::Executor;
use crate::repository::application::{ApplicationRepoFactory, ApplicationRepositories};
use crate::repository::staff::{StaffRepoFactory, StaffRepositories};

/// PostgreSQL unit of work: every `begin` opens one transaction shared by all repositories
pub struct PostgresRepositories {
    pool: Arc<PgPool>,
    application_factory: Arc<ApplicationRepoFactory>,
    staff_factory: Arc<StaffRepoFactory>,
}

impl PostgresRepositories {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self {
            pool,
            application_factory: ApplicationRepoFactory::new(),
            staff_factory: StaffRepoFactory::new(),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create all repositories sharing a single transaction
    pub async fn create_session(&self) -> Result<PostgresSession, Box<dyn Error + Send + Sync>> {
        let tx = self.pool.begin().await?;
        let executor = Executor::new(tx);
        Ok(PostgresSession {
            application_repos: self.application_factory.build_all_repos(&executor),
            staff_repos: self.staff_factory.build_all_repos(&executor),
            executor,
        })
    }
}

#[async_trait]
impl UnitOfWork for PostgresRepositories {
    async fn begin(&self) -> Result<Box<dyn UnitOfWorkSession>, Box<dyn Error + Send + Sync>> {
        Ok(Box::new(self.create_session().await?))
    }
}

pub struct PostgresSession {
    executor: Executor,
    application_repos: ApplicationRepositories,
    staff_repos: StaffRepositories,
}

impl PostgresSession {
    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub fn application_repos(&self) -> &ApplicationRepositories {
        &self.application_repos
    }

    pub fn staff_repos(&self) -> &StaffRepositories {
        &self.staff_repos
    }

    /// Empties the shared slot; every repository of this session fails afterwards
    async fn take_transaction(&self) -> Result<Transaction<'static, Postgres>, Box<dyn Error + Send + Sync>> {
        let mut tx = self.executor.tx.lock().await;
        Ok(tx.take().ok_or("Transaction has been consumed")?)
    }
}

#[async_trait]
impl UnitOfWorkSession for PostgresSession {
    fn applications(&self) -> Arc<dyn ApplicationRepository> {
        self.application_repos.application_repository.clone()
    }

    fn audit_entries(&self) -> Arc<dyn AuditEntryRepository> {
        self.application_repos.audit_entry_repository.clone()
    }

    fn managers(&self) -> Arc<dyn ManagerRepository> {
        self.staff_repos.manager_repository.clone()
    }

    fn admins(&self) -> Arc<dyn AdminRepository> {
        self.staff_repos.admin_repository.clone()
    }

    fn branches(&self) -> Arc<dyn BranchRepository> {
        self.staff_repos.branch_repository.clone()
    }

    async fn commit(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.take_transaction().await?.commit().await?;
        Ok(())
    }

    async fn rollback(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.take_transaction().await?.rollback().await?;
        Ok(())
    }
}
