use branch_desk_postgres::PostgresRepositories;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

use crate::access_guard::AccessGuard;
use crate::auth::AuthService;
use crate::branches::BranchService;
use crate::cache::MokaCacheStore;
use crate::config::BranchDeskConfig;
use crate::context::{BoxError, ServiceContext};
use crate::managers::ManagerService;
use crate::notes::NoteLedger;
use crate::password::{SecretKey, XChaChaPasswordCipher};
use crate::pipeline::MutationPipeline;
use crate::query::QueryService;
use crate::session::MokaSessionStore;

/// All services over one shared set of collaborators
#[derive(Clone)]
pub struct BranchDesk {
    pub guard: AccessGuard,
    pub auth: AuthService,
    pub applications: MutationPipeline,
    pub notes: NoteLedger,
    pub queries: QueryService,
    pub managers: ManagerService,
    pub branches: BranchService,
}

impl BranchDesk {
    pub fn new(ctx: ServiceContext) -> Self {
        Self {
            guard: AccessGuard::new(ctx.sessions.clone()),
            auth: AuthService::new(ctx.clone()),
            applications: MutationPipeline::new(ctx.clone()),
            notes: NoteLedger::new(ctx.clone()),
            queries: QueryService::new(ctx.clone()),
            managers: ManagerService::new(ctx.clone()),
            branches: BranchService::new(ctx),
        }
    }

    /// Wires PostgreSQL storage, the password cipher and the in-process
    /// session and read caches from `config`.
    pub async fn connect(config: &BranchDeskConfig) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await?;
        let key = SecretKey::from_hex(&config.password_key)?;

        let ctx = ServiceContext {
            unit_of_work: Arc::new(PostgresRepositories::new(Arc::new(pool))),
            sessions: Arc::new(MokaSessionStore::new(config.session_ttl())),
            passwords: Arc::new(XChaChaPasswordCipher::new(key)),
            cache: Arc::new(MokaCacheStore::default()),
            cache_ttl: config.cache_ttl(),
        };
        tracing::info!(max_connections = config.max_connections, "Branch desk services ready");
        Ok(Self::new(ctx))
    }
}
