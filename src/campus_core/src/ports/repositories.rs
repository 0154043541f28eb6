use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{email::Email, reset_code::ResetCode, reset_ticket::ResetTicket};

// ResetTicketStore port trait and errors
#[derive(Debug, Error)]
pub enum ResetTicketStoreError {
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

/// Ephemeral storage for reset tickets, at most one per email.
#[async_trait]
pub trait ResetTicketStore: Send + Sync {
    /// Store `ticket`, replacing any ticket held for the same email.
    async fn put(&self, ticket: ResetTicket) -> Result<(), ResetTicketStoreError>;
    async fn get(&self, email: &Email) -> Result<Option<ResetTicket>, ResetTicketStoreError>;
    /// Remove and return the ticket for `email` if `code` still redeems it at
    /// `now`. The check and the removal are one atomic step, so of several
    /// racing claims on one ticket at most one gets it back.
    async fn claim(
        &self,
        email: &Email,
        code: &ResetCode,
        now: DateTime<Utc>,
    ) -> Result<Option<ResetTicket>, ResetTicketStoreError>;
    /// Deleting a missing ticket is not an error.
    async fn delete(&self, email: &Email) -> Result<(), ResetTicketStoreError>;
    /// Drop every ticket that is expired at `now` or already used.
    /// Returns how many were removed.
    async fn sweep(&self, now: DateTime<Utc>) -> Result<usize, ResetTicketStoreError>;
}
