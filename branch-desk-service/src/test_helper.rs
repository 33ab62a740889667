//! In-memory unit of work for service tests.
//!
//! `begin` copies the committed state into a staging area shared by all
//! repositories of the session; `commit` swaps it back in and `rollback`
//! drops it. A commit can be made to fail once to exercise the discard path.

use async_trait::async_trait;
use branch_desk_api::{ActorIdentity, ApplicationStatus};
use branch_desk_db::models::{
    AdminModel, ApplicationCriteria, ApplicationModel, AuditEntryModel, BranchCount, BranchModel, ManagerModel,
    NoteSequence, StatusCounts,
};
use branch_desk_db::repository::{
    AdminRepository, ApplicationRepository, AuditEntryRepository, BranchRepository, CreateBatch, DeleteBatch,
    ExistByIds, FindById, LoadAudits, LoadBatch, ManagerRepository, Page, PageRequest, UniqueViolation,
    UnitOfWork, UnitOfWorkSession, UpdateBatch,
};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::auth::AuthService;
use crate::branches::BranchService;
use crate::cache::MokaCacheStore;
use crate::context::{BoxError, ServiceContext};
use crate::facade::BranchDesk;
use crate::managers::ManagerService;
use crate::notes::NoteLedger;
use crate::password::{SecretKey, XChaChaPasswordCipher};
use crate::pipeline::MutationPipeline;
use crate::query::QueryService;
use crate::session::MokaSessionStore;

#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    applications: BTreeMap<i64, ApplicationModel>,
    audit_entries: Vec<AuditEntryModel>,
    managers: BTreeMap<i64, ManagerModel>,
    admins: BTreeMap<i64, AdminModel>,
    branches: BTreeMap<i64, BranchModel>,
}

/// Serial-like id: one past the highest key
fn next_id<V>(table: &BTreeMap<i64, V>) -> i64 {
    table.keys().next_back().copied().unwrap_or(0) + 1
}

pub struct MemoryUnitOfWork {
    committed: Arc<Mutex<MemoryState>>,
    fail_next_commit: Arc<AtomicBool>,
}

impl MemoryUnitOfWork {
    pub fn new(state: MemoryState) -> Self {
        Self {
            committed: Arc::new(Mutex::new(state)),
            fail_next_commit: Arc::new(AtomicBool::new(false)),
        }
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn begin(&self) -> Result<Box<dyn UnitOfWorkSession>, BoxError> {
        let snapshot = self.committed.lock().await.clone();
        let repo = Arc::new(MemoryRepo {
            staged: Arc::new(Mutex::new(Some(snapshot))),
            committed: self.committed.clone(),
        });
        Ok(Box::new(MemorySession {
            committed: self.committed.clone(),
            fail_next_commit: self.fail_next_commit.clone(),
            repo,
        }))
    }
}

struct MemorySession {
    committed: Arc<Mutex<MemoryState>>,
    fail_next_commit: Arc<AtomicBool>,
    repo: Arc<MemoryRepo>,
}

#[async_trait]
impl UnitOfWorkSession for MemorySession {
    fn applications(&self) -> Arc<dyn ApplicationRepository> {
        self.repo.clone()
    }

    fn audit_entries(&self) -> Arc<dyn AuditEntryRepository> {
        self.repo.clone()
    }

    fn managers(&self) -> Arc<dyn ManagerRepository> {
        self.repo.clone()
    }

    fn admins(&self) -> Arc<dyn AdminRepository> {
        self.repo.clone()
    }

    fn branches(&self) -> Arc<dyn BranchRepository> {
        self.repo.clone()
    }

    async fn commit(&self) -> Result<(), BoxError> {
        let staged = self.repo.staged.lock().await.take().ok_or("unit of work already finished")?;
        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err("simulated commit failure".into());
        }
        *self.committed.lock().await = staged;
        Ok(())
    }

    async fn rollback(&self) -> Result<(), BoxError> {
        self.repo.staged.lock().await.take().ok_or("unit of work already finished")?;
        Ok(())
    }
}

/// Every repository of one session, over the session's staged state.
///
/// Unique names are also checked against the committed state, the way a
/// database constraint sees rows committed by concurrent transactions.
pub struct MemoryRepo {
    staged: Arc<Mutex<Option<MemoryState>>>,
    committed: Arc<Mutex<MemoryState>>,
}

impl MemoryRepo {
    async fn with_state<R>(&self, f: impl FnOnce(&mut MemoryState) -> Result<R, BoxError> + Send) -> Result<R, BoxError> {
        let mut staged = self.staged.lock().await;
        let state = staged.as_mut().ok_or("unit of work already finished")?;
        f(state)
    }
}

#[async_trait]
impl FindById<ApplicationModel> for MemoryRepo {
    async fn find_by_id(&self, id: i64) -> Result<Option<ApplicationModel>, BoxError> {
        self.with_state(|s| Ok(s.applications.get(&id).cloned())).await
    }
}

#[async_trait]
impl LoadBatch<ApplicationModel> for MemoryRepo {
    async fn load_batch(&self, ids: &[i64]) -> Result<Vec<Option<ApplicationModel>>, BoxError> {
        self.with_state(|s| Ok(ids.iter().map(|id| s.applications.get(id).cloned()).collect()))
            .await
    }
}

#[async_trait]
impl CreateBatch<ApplicationModel> for MemoryRepo {
    async fn create_batch(&self, items: Vec<ApplicationModel>) -> Result<Vec<ApplicationModel>, BoxError> {
        self.with_state(|s| {
            Ok(items
                .into_iter()
                .map(|mut item| {
                    item.id = next_id(&s.applications);
                    s.applications.insert(item.id, item.clone());
                    item
                })
                .collect())
        })
        .await
    }
}

#[async_trait]
impl UpdateBatch<ApplicationModel> for MemoryRepo {
    async fn update_batch(&self, items: Vec<ApplicationModel>) -> Result<Vec<ApplicationModel>, BoxError> {
        self.with_state(|s| {
            for item in &items {
                if !s.applications.contains_key(&item.id) {
                    return Err(format!("Application {} does not exist", item.id).into());
                }
                s.applications.insert(item.id, item.clone());
            }
            Ok(items)
        })
        .await
    }
}

#[async_trait]
impl ExistByIds<ApplicationModel> for MemoryRepo {
    async fn exist_by_ids(&self, ids: &[i64]) -> Result<Vec<(i64, bool)>, BoxError> {
        self.with_state(|s| Ok(ids.iter().map(|id| (*id, s.applications.contains_key(id))).collect()))
            .await
    }
}

#[async_trait]
impl ApplicationRepository for MemoryRepo {
    async fn find_page(
        &self,
        criteria: &ApplicationCriteria,
        page: PageRequest,
    ) -> Result<Page<ApplicationModel>, BoxError> {
        self.with_state(|s| {
            let mut matching: Vec<ApplicationModel> =
                s.applications.values().filter(|a| criteria.matches(a)).cloned().collect();
            matching.sort_by(|a, b| criteria.compare(a, b));
            Ok(page.slice(matching))
        })
        .await
    }

    async fn count_by_status(&self, criteria: &ApplicationCriteria) -> Result<StatusCounts, BoxError> {
        self.with_state(|s| {
            let mut counts = StatusCounts::default();
            for application in s.applications.values().filter(|a| criteria.matches(a)) {
                counts.record(application.status, 1);
            }
            Ok(counts)
        })
        .await
    }

    async fn count_by_branch(&self, criteria: &ApplicationCriteria) -> Result<Vec<BranchCount>, BoxError> {
        self.with_state(|s| {
            let mut per_branch: BTreeMap<i64, i64> = BTreeMap::new();
            for application in s.applications.values().filter(|a| criteria.matches(a)) {
                *per_branch.entry(application.branch_id).or_default() += 1;
            }
            Ok(per_branch
                .into_iter()
                .map(|(branch_id, count)| BranchCount { branch_id, count })
                .collect())
        })
        .await
    }
}

#[async_trait]
impl CreateBatch<AuditEntryModel> for MemoryRepo {
    async fn create_batch(&self, items: Vec<AuditEntryModel>) -> Result<Vec<AuditEntryModel>, BoxError> {
        self.with_state(|s| {
            s.audit_entries.extend(items.iter().cloned());
            Ok(items)
        })
        .await
    }
}

#[async_trait]
impl FindById<AuditEntryModel> for MemoryRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AuditEntryModel>, BoxError> {
        self.with_state(|s| Ok(s.audit_entries.iter().find(|e| e.id == id).cloned()))
            .await
    }
}

#[async_trait]
impl LoadAudits for MemoryRepo {
    async fn load_audits(&self, application_id: i64, page: PageRequest) -> Result<Page<AuditEntryModel>, BoxError> {
        self.with_state(|s| {
            let mut entries: Vec<AuditEntryModel> = s
                .audit_entries
                .iter()
                .rev()
                .filter(|e| e.application_id == application_id)
                .cloned()
                .collect();
            entries.sort_by(|a, b| b.changed_at.cmp(&a.changed_at));
            Ok(page.slice(entries))
        })
        .await
    }
}

#[async_trait]
impl FindById<ManagerModel> for MemoryRepo {
    async fn find_by_id(&self, id: i64) -> Result<Option<ManagerModel>, BoxError> {
        self.with_state(|s| Ok(s.managers.get(&id).cloned())).await
    }
}

#[async_trait]
impl CreateBatch<ManagerModel> for MemoryRepo {
    async fn create_batch(&self, items: Vec<ManagerModel>) -> Result<Vec<ManagerModel>, BoxError> {
        self.with_state(|s| {
            let mut created = Vec::with_capacity(items.len());
            for mut item in items {
                if s.managers.values().any(|m| m.username == item.username) {
                    return Err(UniqueViolation::new("manager_username_key").into());
                }
                item.id = next_id(&s.managers);
                s.managers.insert(item.id, item.clone());
                created.push(item);
            }
            Ok(created)
        })
        .await
    }
}

#[async_trait]
impl UpdateBatch<ManagerModel> for MemoryRepo {
    async fn update_batch(&self, items: Vec<ManagerModel>) -> Result<Vec<ManagerModel>, BoxError> {
        self.with_state(|s| {
            for item in &items {
                if !s.managers.contains_key(&item.id) {
                    return Err(format!("Manager {} does not exist", item.id).into());
                }
                s.managers.insert(item.id, item.clone());
            }
            Ok(items)
        })
        .await
    }
}

#[async_trait]
impl DeleteBatch<ManagerModel> for MemoryRepo {
    async fn delete_batch(&self, ids: &[i64]) -> Result<usize, BoxError> {
        self.with_state(|s| Ok(ids.iter().filter(|id| s.managers.remove(*id).is_some()).count()))
            .await
    }
}

#[async_trait]
impl ExistByIds<ManagerModel> for MemoryRepo {
    async fn exist_by_ids(&self, ids: &[i64]) -> Result<Vec<(i64, bool)>, BoxError> {
        self.with_state(|s| Ok(ids.iter().map(|id| (*id, s.managers.contains_key(id))).collect()))
            .await
    }
}

#[async_trait]
impl ManagerRepository for MemoryRepo {
    async fn find_by_username(&self, username: &str) -> Result<Option<ManagerModel>, BoxError> {
        self.with_state(|s| Ok(s.managers.values().find(|m| m.username.as_str() == username).cloned()))
            .await
    }

    async fn find_page(&self, page: PageRequest) -> Result<Page<ManagerModel>, BoxError> {
        self.with_state(|s| Ok(page.slice(s.managers.values().cloned().collect())))
            .await
    }
}

#[async_trait]
impl CreateBatch<AdminModel> for MemoryRepo {
    async fn create_batch(&self, items: Vec<AdminModel>) -> Result<Vec<AdminModel>, BoxError> {
        self.with_state(|s| {
            Ok(items
                .into_iter()
                .map(|mut item| {
                    item.id = next_id(&s.admins);
                    s.admins.insert(item.id, item.clone());
                    item
                })
                .collect())
        })
        .await
    }
}

#[async_trait]
impl AdminRepository for MemoryRepo {
    async fn find_first(&self) -> Result<Option<AdminModel>, BoxError> {
        self.with_state(|s| Ok(s.admins.values().next().cloned())).await
    }
}

#[async_trait]
impl FindById<BranchModel> for MemoryRepo {
    async fn find_by_id(&self, id: i64) -> Result<Option<BranchModel>, BoxError> {
        self.with_state(|s| Ok(s.branches.get(&id).cloned())).await
    }
}

#[async_trait]
impl CreateBatch<BranchModel> for MemoryRepo {
    async fn create_batch(&self, items: Vec<BranchModel>) -> Result<Vec<BranchModel>, BoxError> {
        let committed_names: Vec<_> = self.committed.lock().await.branches.values().map(|b| b.name.clone()).collect();
        self.with_state(|s| {
            let mut created = Vec::with_capacity(items.len());
            for mut item in items {
                if s.branches.values().any(|b| b.name == item.name) || committed_names.contains(&item.name) {
                    return Err(UniqueViolation::new("branch_name_key").into());
                }
                item.id = next_id(&s.branches);
                s.branches.insert(item.id, item.clone());
                created.push(item);
            }
            Ok(created)
        })
        .await
    }
}

#[async_trait]
impl ExistByIds<BranchModel> for MemoryRepo {
    async fn exist_by_ids(&self, ids: &[i64]) -> Result<Vec<(i64, bool)>, BoxError> {
        self.with_state(|s| Ok(ids.iter().map(|id| (*id, s.branches.contains_key(id))).collect()))
            .await
    }
}

#[async_trait]
impl BranchRepository for MemoryRepo {
    async fn find_by_name(&self, name: &str) -> Result<Option<BranchModel>, BoxError> {
        self.with_state(|s| Ok(s.branches.values().find(|b| b.name.as_str() == name).cloned()))
            .await
    }

    async fn find_all(&self) -> Result<Vec<BranchModel>, BoxError> {
        self.with_state(|s| Ok(s.branches.values().cloned().collect())).await
    }
}

/// A manager of `branch_id` that exists only as a session actor
pub fn manager_actor(branch_id: i64) -> ActorIdentity {
    ActorIdentity::manager(900, "a1b2c3d4", "Test Manager", branch_id)
}

/// Services over an in-memory store holding branch 1 ("Central")
pub struct TestEnv {
    uow: Arc<MemoryUnitOfWork>,
    ctx: ServiceContext,
}

impl TestEnv {
    pub fn new() -> Self {
        let mut state = MemoryState::default();
        state.branches.insert(
            1,
            BranchModel {
                id: 1,
                name: heapless::String::try_from("Central").expect("branch name fits"),
                created_at: Utc::now(),
            },
        );

        let uow = Arc::new(MemoryUnitOfWork::new(state));
        let ctx = ServiceContext {
            unit_of_work: uow.clone(),
            sessions: Arc::new(MokaSessionStore::new(Duration::from_secs(60))),
            passwords: Arc::new(XChaChaPasswordCipher::new(SecretKey::from_bytes([7u8; 32]))),
            cache: Arc::new(MokaCacheStore::default()),
            cache_ttl: Duration::from_secs(60),
        };
        Self { uow, ctx }
    }

    pub fn ctx(&self) -> ServiceContext {
        self.ctx.clone()
    }

    pub fn uow(&self) -> Arc<MemoryUnitOfWork> {
        self.uow.clone()
    }

    pub fn admin(&self) -> ActorIdentity {
        ActorIdentity::admin(1)
    }

    pub fn desk(&self) -> BranchDesk {
        BranchDesk::new(self.ctx())
    }

    pub fn pipeline(&self) -> MutationPipeline {
        MutationPipeline::new(self.ctx())
    }

    pub fn notes(&self) -> NoteLedger {
        NoteLedger::new(self.ctx())
    }

    pub fn queries(&self) -> QueryService {
        QueryService::new(self.ctx())
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.ctx())
    }

    pub fn managers(&self) -> ManagerService {
        ManagerService::new(self.ctx())
    }

    pub fn branches(&self) -> BranchService {
        BranchService::new(self.ctx())
    }

    pub fn fail_next_commit(&self) {
        self.uow.fail_next_commit.store(true, Ordering::SeqCst);
    }

    /// Inserts an in-progress application directly into the committed state,
    /// creating its branch when missing.
    pub async fn seed_application(&self, client_name: &str, branch_id: i64) -> ApplicationModel {
        let mut state = self.uow.committed.lock().await;
        state.branches.entry(branch_id).or_insert_with(|| BranchModel {
            id: branch_id,
            name: heapless::String::try_from(format!("Branch {branch_id}").as_str()).expect("branch name fits"),
            created_at: Utc::now(),
        });
        let id = next_id(&state.applications);
        let application = ApplicationModel {
            id,
            client_name: client_name.to_string(),
            phone_number: heapless::String::try_from(format!("+7900{id:04}").as_str()).expect("phone fits"),
            product: "Consumer loan".to_string(),
            status: ApplicationStatus::InProgress,
            branch_id,
            notes: NoteSequence::new(),
            is_deleted: false,
            deleted_at: None,
            deleted_by: None,
            created_at: Utc::now(),
        };
        state.applications.insert(id, application.clone());
        application
    }

    pub async fn seed_branch(&self, name: &str) -> BranchModel {
        let mut state = self.uow.committed.lock().await;
        let id = next_id(&state.branches);
        let branch = BranchModel {
            id,
            name: heapless::String::try_from(name).expect("branch name fits"),
            created_at: Utc::now(),
        };
        state.branches.insert(id, branch.clone());
        branch
    }

    pub async fn application(&self, id: i64) -> Option<ApplicationModel> {
        self.uow.committed.lock().await.applications.get(&id).cloned()
    }

    /// Committed audit entries of one application, oldest first
    pub async fn audits(&self, application_id: i64) -> Vec<AuditEntryModel> {
        self.uow
            .committed
            .lock()
            .await
            .audit_entries
            .iter()
            .filter(|e| e.application_id == application_id)
            .cloned()
            .collect()
    }

    pub async fn manager(&self, id: i64) -> Option<ManagerModel> {
        self.uow.committed.lock().await.managers.get(&id).cloned()
    }

    pub async fn manager_count(&self) -> usize {
        self.uow.committed.lock().await.managers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rollback_discards_staged_writes() {
        let env = TestEnv::new();
        let session = env.uow().begin().await.unwrap();
        let created = session
            .branches()
            .create_batch(vec![BranchModel {
                id: 0,
                name: heapless::String::try_from("Temp").unwrap(),
                created_at: Utc::now(),
            }])
            .await
            .unwrap();
        assert!(session.branches().find_by_id(created[0].id).await.unwrap().is_some());
        session.rollback().await.unwrap();

        let other = env.uow().begin().await.unwrap();
        assert!(other.branches().find_by_name("Temp").await.unwrap().is_none());
        assert!(session.commit().await.is_err());
    }

    #[tokio::test]
    async fn test_failed_commit_keeps_previous_state() {
        let env = TestEnv::new();
        env.fail_next_commit();
        let session = env.uow().begin().await.unwrap();
        session
            .admins()
            .create_batch(vec![AdminModel {
                id: 0,
                password: "x".to_string(),
                created_at: Utc::now(),
            }])
            .await
            .unwrap();
        assert!(session.commit().await.is_err());

        let next = env.uow().begin().await.unwrap();
        assert!(next.admins().find_first().await.unwrap().is_none());
    }
}
