pub mod pagination;

pub mod create_batch;
pub mod delete_batch;
pub mod exist_by_ids;
pub mod find_by_id;
pub mod load_audits;
pub mod load_batch;
pub mod update_batch;

pub mod admin_repository;
pub mod application_repository;
pub mod audit_entry_repository;
pub mod branch_repository;
pub mod manager_repository;
pub mod unique_violation;
pub mod unit_of_work;

// Re-exports
pub use create_batch::*;
pub use delete_batch::*;
pub use exist_by_ids::*;
pub use find_by_id::*;
pub use load_audits::*;
pub use load_batch::*;
pub use pagination::*;
pub use update_batch::*;

pub use admin_repository::*;
pub use application_repository::*;
pub use audit_entry_repository::*;
pub use branch_repository::*;
pub use manager_repository::*;
pub use unique_violation::*;
pub use unit_of_work::*;
