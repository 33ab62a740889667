use std::fmt::Display;
use std::hash::Hash;

/// Trait for entities that can be uniquely identified
pub trait Identifiable: Send + Sync + 'static {
    /// The identifier type, integer for store-assigned ids and `Uuid` for generated ones
    type Id: Copy + Eq + Hash + Display + Send + Sync + 'static;

    /// Returns the unique identifier of the entity
    fn get_id(&self) -> Self::Id;
}
