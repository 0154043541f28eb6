use std::collections::BTreeMap;

use campus_core::{
    AuthClaims, AuthToken, Email, IDENTITY_ID_CONSTRAINT, IdentityId, Password, PasswordHasher,
    Record, RecordStore, RecordStoreError, Role, RoleDescriptor, RoleError, TokenSigner,
};
use secrecy::{ExposeSecret, Secret};

use crate::uniqueness::{IdentityUniquenessChecker, UniquenessError};

/// Raw attribute values submitted for a new identity, keyed by column name.
pub type Attributes = BTreeMap<String, String>;

/// Error types for register use case
#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("Invalid role")]
    InvalidRole(#[from] RoleError),
    #[error("ID must be exactly 9 digits")]
    InvalidIdFormat,
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Invalid password")]
    InvalidPassword,
    #[error("ID already exists")]
    IdAlreadyExists,
    #[error("Email already exists")]
    EmailAlreadyExists,
    #[error("Service temporarily unavailable")]
    DatabaseUnavailable(String),
    /// The role descriptor names a column the store does not have.
    #[error("Internal server error")]
    InvalidFieldReference(String),
    #[error("Registration rejected")]
    ConstraintViolation(String),
    #[error("Unexpected error")]
    UnexpectedError(String),
}

impl RegisterError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::DatabaseUnavailable(_))
    }
}

impl From<UniquenessError> for RegisterError {
    fn from(error: UniquenessError) -> Self {
        match error {
            UniquenessError::DatabaseUnavailable(e) => Self::DatabaseUnavailable(e),
        }
    }
}

/// Register use case - validates and persists a new role-tagged identity
pub struct RegisterUseCase<'a, R, H, S>
where
    R: RecordStore,
    H: PasswordHasher,
    S: TokenSigner,
{
    record_store: &'a R,
    hasher: &'a H,
    signer: &'a S,
}

impl<'a, R, H, S> RegisterUseCase<'a, R, H, S>
where
    R: RecordStore,
    H: PasswordHasher,
    S: TokenSigner,
{
    pub fn new(record_store: &'a R, hasher: &'a H, signer: &'a S) -> Self {
        Self {
            record_store,
            hasher,
            signer,
        }
    }

    /// Execute the register use case
    ///
    /// # Arguments
    /// * `role_name` - Name of the role to register under
    /// * `attributes` - Column values, including the plaintext password
    ///
    /// # Returns
    /// A token bound to the new identity, or RegisterError
    #[tracing::instrument(name = "RegisterUseCase::execute", skip(self, attributes))]
    pub async fn execute(
        &self,
        role_name: &str,
        attributes: Attributes,
    ) -> Result<AuthToken, RegisterError> {
        let role: Role = role_name.parse()?;
        let descriptor = role.descriptor();

        let id = attributes
            .get(descriptor.id_field)
            .ok_or(RegisterError::InvalidIdFormat)
            .and_then(|id| IdentityId::parse(id).map_err(|_| RegisterError::InvalidIdFormat))?;

        check_required_fields(descriptor, &attributes)?;

        let email = attributes
            .get(descriptor.email_field)
            .ok_or_else(|| RegisterError::MissingRequiredField(descriptor.email_field.into()))
            .and_then(|email| Email::parse(email).map_err(|_| RegisterError::InvalidEmail))?;

        let password = attributes
            .get(descriptor.password_field)
            .ok_or_else(|| RegisterError::MissingRequiredField(descriptor.password_field.into()))
            .and_then(|password| {
                Password::try_from(Secret::from(password.clone()))
                    .map_err(|_| RegisterError::InvalidPassword)
            })?;

        let checker = IdentityUniquenessChecker::new(self.record_store);
        if !checker.is_id_unique(&id).await? {
            return Err(RegisterError::IdAlreadyExists);
        }
        if !checker.is_email_unique(&email, descriptor).await? {
            return Err(RegisterError::EmailAlreadyExists);
        }

        let password_hash = self
            .hasher
            .hash(&password)
            .await
            .map_err(|e| RegisterError::UnexpectedError(e.to_string()))?;

        let record = build_record(descriptor, &attributes, &id, &email, &password_hash);

        self.record_store
            .insert(descriptor.table_name, record)
            .await
            .map_err(|e| map_insert_error(e, descriptor))?;

        tracing::info!(%id, %role, "Identity registered");

        self.signer
            .sign(&AuthClaims::new(id, role))
            .map_err(|e| RegisterError::UnexpectedError(e.to_string()))
    }
}

fn check_required_fields(
    descriptor: &RoleDescriptor,
    attributes: &Attributes,
) -> Result<(), RegisterError> {
    for field in descriptor.required_fields {
        let present = attributes
            .get(*field)
            .is_some_and(|value| !value.trim().is_empty());
        if !present {
            return Err(RegisterError::MissingRequiredField((*field).to_string()));
        }
    }
    Ok(())
}

// Every insertable column gets a value; anything not supplied is NULL.
fn build_record(
    descriptor: &RoleDescriptor,
    attributes: &Attributes,
    id: &IdentityId,
    email: &Email,
    password_hash: &Secret<String>,
) -> Record {
    descriptor
        .insertable_fields
        .iter()
        .map(|&field| {
            let value = if field == descriptor.id_field {
                Some(id.to_string())
            } else if field == descriptor.email_field {
                Some(email.as_ref().expose_secret().clone())
            } else if field == descriptor.password_field {
                Some(password_hash.expose_secret().clone())
            } else {
                attributes
                    .get(field)
                    .map(|value| value.trim())
                    .filter(|value| !value.is_empty())
                    .map(str::to_owned)
            };
            (field.to_string(), value)
        })
        .collect()
}

// The pre-checks race with concurrent registrations. The store's constraints
// decide, the shared id namespace included, and their violations read the same
// as a failed pre-check.
fn map_insert_error(error: RecordStoreError, descriptor: &RoleDescriptor) -> RegisterError {
    match error {
        RecordStoreError::UniqueViolation { constraint } => match constraint {
            Some(name) if name == IDENTITY_ID_CONSTRAINT => RegisterError::IdAlreadyExists,
            Some(name) if name.contains(descriptor.email_field) => {
                RegisterError::EmailAlreadyExists
            }
            _ => RegisterError::IdAlreadyExists,
        },
        RecordStoreError::UnknownField(field) => {
            tracing::error!(
                table = descriptor.table_name,
                %field,
                "Role descriptor references a column the store does not have"
            );
            RegisterError::InvalidFieldReference(field)
        }
        RecordStoreError::ConstraintViolation(detail) => {
            tracing::warn!(table = descriptor.table_name, %detail, "Insert rejected");
            RegisterError::ConstraintViolation(detail)
        }
        RecordStoreError::Unavailable(detail) => RegisterError::DatabaseUnavailable(detail),
        RecordStoreError::UnexpectedError(detail) => RegisterError::UnexpectedError(detail),
    }
}
