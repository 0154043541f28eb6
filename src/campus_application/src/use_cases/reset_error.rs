use campus_core::{EmailDeliveryError, ResetTicketStoreError};

use crate::lookup::LookupError;

/// Errors shared by the password reset use cases
#[derive(Debug, thiserror::Error)]
pub enum ResetError {
    #[error("No reset request found for this email")]
    NoSuchTicket,
    #[error("Invalid reset code")]
    CodeMismatch,
    #[error("Reset code has expired")]
    TicketExpired,
    #[error("Reset code has already been used")]
    TicketAlreadyUsed,
    #[error("Password must be at least {min_length} characters")]
    WeakPassword { min_length: usize },
    #[error("User not found")]
    UserNotFound,
    #[error("Password update failed")]
    PasswordUpdateFailed(String),
    #[error("Failed to send reset email")]
    EmailDeliveryFailed(#[source] EmailDeliveryError),
    #[error("Service temporarily unavailable")]
    DatabaseUnavailable(String),
    #[error("Unexpected error")]
    UnexpectedError(String),
}

impl ResetError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::DatabaseUnavailable(_)
                | Self::PasswordUpdateFailed(_)
                | Self::EmailDeliveryFailed(_)
        )
    }
}

impl From<ResetTicketStoreError> for ResetError {
    fn from(error: ResetTicketStoreError) -> Self {
        Self::UnexpectedError(error.to_string())
    }
}

impl From<LookupError> for ResetError {
    fn from(error: LookupError) -> Self {
        match error {
            LookupError::DatabaseUnavailable(e) => Self::DatabaseUnavailable(e),
        }
    }
}
