pub mod application;
pub mod criteria;
pub mod note;

pub use application::*;
pub use criteria::*;
pub use note::*;
