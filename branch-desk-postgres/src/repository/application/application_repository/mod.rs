pub mod create_batch;
pub mod find_page;
pub mod load_batch;
pub mod notes;
pub mod repo_impl;
pub mod test_utils;
pub mod update_batch;

pub use repo_impl::ApplicationRepositoryImpl;
