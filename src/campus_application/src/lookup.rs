use campus_core::{Email, RecordStore, Role};
use secrecy::ExposeSecret;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Database unavailable")]
    DatabaseUnavailable(String),
}

/// Find which role an email is registered under.
///
/// Tables are scanned in [`Role::ALL`] order and the first match wins, so an
/// email registered under two roles resolves to the earlier one. Tables that
/// fail are skipped; the lookup only fails when none could be queried.
#[tracing::instrument(name = "locate_identity_by_email", skip_all)]
pub async fn locate_identity_by_email<R>(
    record_store: &R,
    email: &Email,
) -> Result<Option<Role>, LookupError>
where
    R: RecordStore,
{
    let mut checked_tables = 0usize;
    let mut last_error = None;

    for role in Role::ALL {
        let descriptor = role.descriptor();
        match record_store
            .find_one(
                descriptor.table_name,
                descriptor.email_field,
                email.as_ref().expose_secret(),
            )
            .await
        {
            Ok(Some(_)) => return Ok(Some(role)),
            Ok(None) => checked_tables += 1,
            Err(e) => {
                tracing::warn!(
                    table = descriptor.table_name,
                    error = %e,
                    "Skipping table during email lookup"
                );
                last_error = Some(e.to_string());
            }
        }
    }

    if checked_tables == 0 {
        return Err(LookupError::DatabaseUnavailable(
            last_error.unwrap_or_default(),
        ));
    }

    Ok(None)
}
