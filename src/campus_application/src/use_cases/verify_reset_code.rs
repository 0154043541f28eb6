use campus_core::{Clock, Email, ResetTicket, ResetTicketStore};

use super::reset_error::ResetError;

/// Run the ticket checks in order: existence, code, expiry, use.
///
/// An expired ticket is deleted on the way out. Nothing else is mutated.
pub(crate) async fn check_ticket<T, C>(
    ticket_store: &T,
    clock: &C,
    email: &Email,
    code: &str,
) -> Result<ResetTicket, ResetError>
where
    T: ResetTicketStore,
    C: Clock,
{
    let ticket = ticket_store
        .get(email)
        .await?
        .ok_or(ResetError::NoSuchTicket)?;

    if ticket.code.as_str() != code.trim() {
        return Err(ResetError::CodeMismatch);
    }

    if ticket.is_expired_at(clock.now()) {
        ticket_store.delete(email).await?;
        return Err(ResetError::TicketExpired);
    }

    if ticket.used {
        return Err(ResetError::TicketAlreadyUsed);
    }

    Ok(ticket)
}

/// Verify reset code use case - read-only check of a pending reset code
pub struct VerifyResetCodeUseCase<'a, T, C>
where
    T: ResetTicketStore,
    C: Clock,
{
    ticket_store: &'a T,
    clock: &'a C,
}

impl<'a, T, C> VerifyResetCodeUseCase<'a, T, C>
where
    T: ResetTicketStore,
    C: Clock,
{
    pub fn new(ticket_store: &'a T, clock: &'a C) -> Self {
        Self {
            ticket_store,
            clock,
        }
    }

    /// Execute the verify reset code use case
    ///
    /// Verification does not consume the ticket and can be repeated.
    #[tracing::instrument(name = "VerifyResetCodeUseCase::execute", skip_all)]
    pub async fn execute(&self, email: &Email, code: &str) -> Result<(), ResetError> {
        check_ticket(self.ticket_store, self.clock, email, code).await?;
        Ok(())
    }
}
