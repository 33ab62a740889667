use serde::{Deserialize, Serialize};

/// Result of a logout request. Logging out without a session is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogoutOutcome {
    LoggedOut,
    NoActiveSession,
}

impl LogoutOutcome {
    pub fn success(&self) -> bool {
        matches!(self, LogoutOutcome::LoggedOut)
    }

    pub fn message(&self) -> &'static str {
        match self {
            LogoutOutcome::LoggedOut => "Logout successful.",
            LogoutOutcome::NoActiveSession => "No active session found.",
        }
    }
}

/// Result of a delete operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    pub success: bool,
    pub message: String,
}

impl DeleteOutcome {
    pub fn deleted(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
