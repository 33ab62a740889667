pub mod application;
pub mod audit;
pub mod identifiable;
pub mod staff;
pub mod tracked;

// Re-exports
pub use application::*;
pub use audit::*;
pub use identifiable::*;
pub use staff::*;
pub use tracked::*;
