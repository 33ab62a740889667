pub mod admin;
pub mod branch;
pub mod manager;

pub use admin::*;
pub use branch::*;
pub use manager::*;
