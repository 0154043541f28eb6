use campus_core::{Email, IdentityId, RecordStore, Role, RoleDescriptor};
use secrecy::ExposeSecret;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UniquenessError {
    /// No table could be checked. Carries the last store error for logs.
    #[error("Database unavailable")]
    DatabaseUnavailable(String),
}

/// Checks candidate identifiers against the stored identities.
///
/// IDs share one namespace across every role table, so an ID check fans out
/// over all of them and tolerates individual table failures as long as one
/// table answered. Emails are scoped to a single role, so an email check
/// touches one table and any failure is fatal.
pub struct IdentityUniquenessChecker<'a, R>
where
    R: RecordStore,
{
    record_store: &'a R,
}

impl<'a, R> IdentityUniquenessChecker<'a, R>
where
    R: RecordStore,
{
    pub fn new(record_store: &'a R) -> Self {
        Self { record_store }
    }

    #[tracing::instrument(name = "IdentityUniquenessChecker::is_id_unique", skip(self))]
    pub async fn is_id_unique(&self, id: &IdentityId) -> Result<bool, UniquenessError> {
        let mut checked_tables = 0usize;
        let mut last_error = None;

        for role in Role::ALL {
            let descriptor = role.descriptor();
            match self
                .record_store
                .find_one(descriptor.table_name, descriptor.id_field, id.as_str())
                .await
            {
                Ok(Some(_)) => return Ok(false),
                Ok(None) => checked_tables += 1,
                Err(e) => {
                    tracing::warn!(
                        table = descriptor.table_name,
                        error = %e,
                        "Skipping table during ID uniqueness check"
                    );
                    last_error = Some(e.to_string());
                }
            }
        }

        if checked_tables == 0 {
            let detail = last_error.unwrap_or_default();
            tracing::error!(error = %detail, "ID uniqueness check failed on every table");
            return Err(UniquenessError::DatabaseUnavailable(detail));
        }

        Ok(true)
    }

    #[tracing::instrument(
        name = "IdentityUniquenessChecker::is_email_unique",
        skip(self, email, descriptor),
        fields(table = descriptor.table_name)
    )]
    pub async fn is_email_unique(
        &self,
        email: &Email,
        descriptor: &RoleDescriptor,
    ) -> Result<bool, UniquenessError> {
        let row = self
            .record_store
            .find_one(
                descriptor.table_name,
                descriptor.email_field,
                email.as_ref().expose_secret(),
            )
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Email uniqueness check failed");
                UniquenessError::DatabaseUnavailable(e.to_string())
            })?;

        Ok(row.is_none())
    }
}
