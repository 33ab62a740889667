pub mod create_batch;
pub mod find_by_username;
pub mod repo_impl;
pub mod update_batch;

pub use repo_impl::ManagerRepositoryImpl;
