use campus_core::{Clock, Email, Password, PasswordHasher, RecordStore, ResetTicketStore, Role};
use secrecy::{ExposeSecret, Secret};

use super::{reset_error::ResetError, verify_reset_code::check_ticket};
use crate::{lookup::locate_identity_by_email, policy::ResetPolicy};

/// Reset password use case - consumes a reset code and stores a new password
pub struct ResetPasswordUseCase<'a, R, T, H, C>
where
    R: RecordStore,
    T: ResetTicketStore,
    H: PasswordHasher,
    C: Clock,
{
    record_store: &'a R,
    ticket_store: &'a T,
    hasher: &'a H,
    clock: &'a C,
    policy: ResetPolicy,
}

impl<'a, R, T, H, C> ResetPasswordUseCase<'a, R, T, H, C>
where
    R: RecordStore,
    T: ResetTicketStore,
    H: PasswordHasher,
    C: Clock,
{
    pub fn new(
        record_store: &'a R,
        ticket_store: &'a T,
        hasher: &'a H,
        clock: &'a C,
        policy: ResetPolicy,
    ) -> Self {
        Self {
            record_store,
            ticket_store,
            hasher,
            clock,
            policy,
        }
    }

    /// Execute the reset password use case
    ///
    /// # Arguments
    /// * `email` - Email the code was issued for
    /// * `code` - The code received by mail
    /// * `new_password` - Replacement password
    ///
    /// # Returns
    /// Ok(()) once the new hash is stored. The ticket is claimed before the
    /// update, so a code is consumed at most once even under concurrent
    /// calls; if the update fails the ticket is put back and the code can be
    /// retried.
    #[tracing::instrument(name = "ResetPasswordUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        email: &Email,
        code: &str,
        new_password: Password,
    ) -> Result<(), ResetError> {
        let ticket = check_ticket(self.ticket_store, self.clock, email, code).await?;

        if !new_password.meets_minimum_length(self.policy.min_password_length) {
            return Err(ResetError::WeakPassword {
                min_length: self.policy.min_password_length,
            });
        }

        let role = locate_identity_by_email(self.record_store, email)
            .await?
            .ok_or(ResetError::UserNotFound)?;

        let password_hash = self
            .hasher
            .hash(&new_password)
            .await
            .map_err(|e| ResetError::PasswordUpdateFailed(e.to_string()))?;

        let Some(claimed) = self
            .ticket_store
            .claim(email, &ticket.code, self.clock.now())
            .await?
        else {
            // Someone else consumed or replaced the ticket since the check.
            let current = check_ticket(self.ticket_store, self.clock, email, code).await;
            return Err(current.err().unwrap_or(ResetError::NoSuchTicket));
        };

        if let Err(e) = self.store_password(role, email, password_hash).await {
            if let Err(put_back) = self.ticket_store.put(claimed).await {
                tracing::error!(error = %put_back, "Failed to restore reset ticket");
            }
            return Err(e);
        }

        tracing::info!(%role, "Password reset completed");
        Ok(())
    }

    async fn store_password(
        &self,
        role: Role,
        email: &Email,
        password_hash: Secret<String>,
    ) -> Result<(), ResetError> {
        let descriptor = role.descriptor();
        let updated = self
            .record_store
            .update_field(
                descriptor.table_name,
                descriptor.email_field,
                email.as_ref().expose_secret(),
                descriptor.password_field,
                Some(password_hash.expose_secret().clone()),
            )
            .await
            .map_err(|e| {
                tracing::error!(table = descriptor.table_name, error = %e, "Password update failed");
                ResetError::PasswordUpdateFailed(e.to_string())
            })?;

        if updated == 0 {
            return Err(ResetError::UserNotFound);
        }
        Ok(())
    }
}
