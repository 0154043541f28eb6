use campus_core::{Clock, Email, EmailClient, RecordStore, ResetCode, ResetTicket, ResetTicketStore};

use super::reset_error::ResetError;
use crate::{lookup::locate_identity_by_email, policy::ResetPolicy};

const RESET_EMAIL_SUBJECT: &str = "Password reset code";

/// Request reset use case - issues a reset code and mails it
pub struct RequestResetUseCase<'a, R, T, E, C>
where
    R: RecordStore,
    T: ResetTicketStore,
    E: EmailClient,
    C: Clock,
{
    record_store: &'a R,
    ticket_store: &'a T,
    email_client: &'a E,
    clock: &'a C,
    policy: ResetPolicy,
}

impl<'a, R, T, E, C> RequestResetUseCase<'a, R, T, E, C>
where
    R: RecordStore,
    T: ResetTicketStore,
    E: EmailClient,
    C: Clock,
{
    pub fn new(
        record_store: &'a R,
        ticket_store: &'a T,
        email_client: &'a E,
        clock: &'a C,
        policy: ResetPolicy,
    ) -> Self {
        Self {
            record_store,
            ticket_store,
            email_client,
            clock,
            policy,
        }
    }

    /// Execute the request reset use case
    ///
    /// Succeeds without doing anything when no identity owns `email`, so the
    /// caller cannot tell registered addresses apart. A new ticket replaces
    /// any pending one. The ticket is kept even when the mail fails.
    #[tracing::instrument(name = "RequestResetUseCase::execute", skip_all)]
    pub async fn execute(&self, email: Email) -> Result<(), ResetError> {
        let Some(role) = locate_identity_by_email(self.record_store, &email).await? else {
            tracing::debug!("Reset requested for unknown email");
            return Ok(());
        };

        let code = ResetCode::new();
        let ticket = ResetTicket::issue(
            email.clone(),
            code.clone(),
            self.clock.now(),
            self.policy.code_ttl,
        );
        self.ticket_store.put(ticket).await?;

        tracing::info!(%role, "Reset ticket issued");

        let content = format!(
            "Your password reset code is {}. It expires in {} minutes.",
            code.as_str(),
            self.policy.code_ttl.num_minutes()
        );

        self.email_client
            .send_email(&email, RESET_EMAIL_SUBJECT, &content)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to deliver reset code");
                ResetError::EmailDeliveryFailed(e)
            })
    }
}
