use thiserror::Error;

/// Insert rejected because a unique column already holds the value.
///
/// Stores return it boxed so callers can tell a lost race on a unique name
/// apart from other storage failures with `downcast_ref`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unique constraint '{constraint}' violated")]
pub struct UniqueViolation {
    pub constraint: String,
}

impl UniqueViolation {
    pub fn new(constraint: impl Into<String>) -> Self {
        Self {
            constraint: constraint.into(),
        }
    }

    /// True when `err` is a `UniqueViolation`
    pub fn is(err: &(dyn std::error::Error + Send + Sync + 'static)) -> bool {
        err.downcast_ref::<UniqueViolation>().is_some()
    }
}
