use thiserror::Error;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LeaderboardError {
    #[error("User not found: {id}")]
    NotFound { id: i64 },

    #[error("displayName '{display_name}' is already in use")]
    DisplayNameTaken { display_name: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error")]
    Internal,
}

impl LeaderboardError {
    pub fn not_found(id: i64) -> Self {
        Self::NotFound { id }
    }

    pub fn display_name_taken(display_name: impl Into<String>) -> Self {
        Self::DisplayNameTaken {
            display_name: display_name.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

impl From<crate::domain::error::DomainError> for LeaderboardError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            UserNotFound { id } => Self::not_found(id),
            DisplayNameTaken { display_name } => Self::display_name_taken(display_name),
            Validation { message, .. } => Self::validation(message),
            Database { .. } => Self::internal(),
        }
    }
}
