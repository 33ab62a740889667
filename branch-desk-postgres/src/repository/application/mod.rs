pub mod application_repository;
pub mod audit_entry_repository;
pub mod factory;
pub mod query_builder;

pub use factory::{ApplicationRepoFactory, ApplicationRepositories};
