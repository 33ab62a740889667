pub mod access_guard;
pub mod auth;
pub mod branches;
pub mod cache;
pub mod config;
pub mod context;
pub mod facade;
pub mod managers;
pub mod notes;
pub mod password;
pub mod pipeline;
pub mod query;
pub mod session;
pub mod telemetry;

pub use access_guard::{authorize, AccessGuard};
pub use auth::{AuthService, SessionGrant};
pub use branches::BranchService;
pub use config::{BranchDeskConfig, ConfigError};
pub use context::ServiceContext;
pub use facade::BranchDesk;
pub use managers::{ManagerProfile, ManagerService};
pub use notes::NoteLedger;
pub use pipeline::{MutationPipeline, PipelineStage};
pub use query::{ApplicationListing, QueryService};

#[cfg(test)]
pub mod test_helper;
