use campus_core::{
    AuthClaims, AuthToken, Email, IdentityId, Password, PasswordHasher, RecordStore,
    RecordStoreError, Role, RoleError, TokenSigner,
};
use secrecy::{ExposeSecret, Secret};

/// Error types specific to login use case
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Invalid role")]
    InvalidRole(#[from] RoleError),
    /// Unknown identity and wrong password both end up here.
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Service temporarily unavailable")]
    DatabaseUnavailable(String),
    #[error("Unexpected error")]
    UnexpectedError(String),
}

impl LoginError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::DatabaseUnavailable(_))
    }
}

/// How the caller identified themselves.
enum LoginIdentifier {
    Id(IdentityId),
    Email(Email),
}

impl LoginIdentifier {
    fn parse(identifier: &str) -> Option<Self> {
        let identifier = identifier.trim();
        if let Ok(id) = IdentityId::parse(identifier) {
            return Some(Self::Id(id));
        }
        Email::parse(identifier).ok().map(Self::Email)
    }
}

/// Login use case - handles user authentication
pub struct LoginUseCase<'a, R, H, S>
where
    R: RecordStore,
    H: PasswordHasher,
    S: TokenSigner,
{
    record_store: &'a R,
    hasher: &'a H,
    signer: &'a S,
}

impl<'a, R, H, S> LoginUseCase<'a, R, H, S>
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

    /// Execute the login use case
    ///
    /// # Arguments
    /// * `role_name` - Role the caller logs in as
    /// * `identifier` - Email address or 9-digit ID
    /// * `password` - Plaintext password
    ///
    /// # Returns
    /// A token bound to the identity, or LoginError
    #[tracing::instrument(name = "LoginUseCase::execute", skip(self, identifier, password))]
    pub async fn execute(
        &self,
        role_name: &str,
        identifier: &str,
        password: Secret<String>,
    ) -> Result<AuthToken, LoginError> {
        let role: Role = role_name.parse()?;
        let descriptor = role.descriptor();

        let identifier = LoginIdentifier::parse(identifier).ok_or(LoginError::InvalidCredentials)?;
        let password = Password::try_from(password).map_err(|_| LoginError::InvalidCredentials)?;

        let (field, value) = match &identifier {
            LoginIdentifier::Id(id) => (descriptor.id_field, id.as_str().to_owned()),
            LoginIdentifier::Email(email) => (
                descriptor.email_field,
                email.as_ref().expose_secret().clone(),
            ),
        };

        let row = self
            .record_store
            .find_one(descriptor.table_name, field, &value)
            .await
            .map_err(|e| match e {
                RecordStoreError::Unavailable(detail) => LoginError::DatabaseUnavailable(detail),
                other => LoginError::UnexpectedError(other.to_string()),
            })?;

        let Some(row) = row else {
            self.burn_verification(&password).await;
            return Err(LoginError::InvalidCredentials);
        };

        let Some(password_hash) = row
            .get(descriptor.password_field)
            .cloned()
            .flatten()
            .map(Secret::from)
        else {
            tracing::warn!(table = descriptor.table_name, "Identity has no password hash");
            self.burn_verification(&password).await;
            return Err(LoginError::InvalidCredentials);
        };

        let verified = self
            .hasher
            .verify(&password, &password_hash)
            .await
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, "Stored password hash could not be verified");
                false
            });
        if !verified {
            return Err(LoginError::InvalidCredentials);
        }

        let id = row
            .get(descriptor.id_field)
            .cloned()
            .flatten()
            .ok_or_else(|| LoginError::UnexpectedError("identity row has no id".to_string()))
            .and_then(|id| {
                IdentityId::parse(&id).map_err(|e| LoginError::UnexpectedError(e.to_string()))
            })?;

        self.signer
            .sign(&AuthClaims::new(id, role))
            .map_err(|e| LoginError::UnexpectedError(e.to_string()))
    }

    // Unknown identities pay for one verification too, so response time does
    // not tell them apart from a wrong password.
    async fn burn_verification(&self, password: &Password) {
        let _ = self.hasher.verify(password, &self.hasher.decoy_hash()).await;
    }
}
