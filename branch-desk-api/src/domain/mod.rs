pub mod actor;
pub mod application_status;
pub mod branch_id;
pub mod field_value;
pub mod inputs;
pub mod outcome;
pub mod role;

// Re-exports
pub use actor::*;
pub use application_status::*;
pub use branch_id::*;
pub use field_value::*;
pub use inputs::*;
pub use outcome::*;
pub use role::*;
