pub mod admin_repository;
pub mod branch_repository;
pub mod factory;
pub mod manager_repository;

pub use factory::{StaffRepoFactory, StaffRepositories};
