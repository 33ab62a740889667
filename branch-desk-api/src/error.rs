use thiserror::Error;
use validator::ValidationErrors;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Access requires role: {required}")]
    Forbidden { required: String },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{entity_type} with ID {id} not found")]
    NotFound { entity_type: &'static str, id: String },

    #[error("Validation error on '{field}': {reason}")]
    ValidationError { field: String, reason: String },

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Crypto error: {0}")]
    CryptoError(String),
}

impl ApiError {
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        ApiError::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ApiError::ValidationError {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Collapses `validator` output into the first offending field.
///
/// Fields are visited in name order so the reported field is stable across runs.
impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<(String, String)> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let reason = errs
                    .first()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .unwrap_or_else(|| "invalid".to_string());
                (field.to_string(), reason)
            })
            .collect();
        fields.sort();
        match fields.into_iter().next() {
            Some((field, reason)) => ApiError::ValidationError { field, reason },
            None => ApiError::validation("input", "invalid"),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
