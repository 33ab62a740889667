pub mod audit_entry;
pub mod field_diff;

pub use audit_entry::*;
pub use field_diff::*;
