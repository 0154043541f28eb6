use campus_adapters::{crypto::Argon2PasswordHasher, time::SystemClock};
use campus_application::{
    Attributes, LoginError, LoginUseCase, RegisterError, RegisterUseCase, RequestResetUseCase,
    ResetError, ResetPasswordUseCase, ResetPolicy, VerifyResetCodeUseCase,
};
use campus_core::{
    AuthToken, Clock, Email, EmailClient, Password, PasswordHasher, RecordStore,
    ResetTicketStore, TokenSigner,
};
use secrecy::Secret;
use tokio::task::JoinHandle;

use crate::sweeper::spawn_reset_sweeper;

/// Entry point for registration, login and password recovery.
///
/// Takes raw caller input, turns it into domain values and runs the matching
/// use case. Stores are cheap handles (`Clone` shares state), so the same
/// service can be cloned into every request handler.
#[derive(Clone)]
pub struct IdentityService<R, T, E, S, H = Argon2PasswordHasher, C = SystemClock> {
    record_store: R,
    ticket_store: T,
    email_client: E,
    signer: S,
    hasher: H,
    clock: C,
    policy: ResetPolicy,
}

impl<R, T, E, S> IdentityService<R, T, E, S>
where
    R: RecordStore,
    T: ResetTicketStore,
    E: EmailClient,
    S: TokenSigner,
{
    /// Create a service with Argon2 hashing, the system clock and the
    /// default reset policy.
    pub fn new(record_store: R, ticket_store: T, email_client: E, signer: S) -> Self {
        Self {
            record_store,
            ticket_store,
            email_client,
            signer,
            hasher: Argon2PasswordHasher::new(),
            clock: SystemClock,
            policy: ResetPolicy::default(),
        }
    }
}

impl<R, T, E, S, H, C> IdentityService<R, T, E, S, H, C>
where
    R: RecordStore,
    T: ResetTicketStore,
    E: EmailClient,
    S: TokenSigner,
    H: PasswordHasher,
    C: Clock,
{
    pub fn with_policy(mut self, policy: ResetPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_hasher<H2: PasswordHasher>(self, hasher: H2) -> IdentityService<R, T, E, S, H2, C> {
        IdentityService {
            record_store: self.record_store,
            ticket_store: self.ticket_store,
            email_client: self.email_client,
            signer: self.signer,
            hasher,
            clock: self.clock,
            policy: self.policy,
        }
    }

    pub fn with_clock<C2: Clock>(self, clock: C2) -> IdentityService<R, T, E, S, H, C2> {
        IdentityService {
            record_store: self.record_store,
            ticket_store: self.ticket_store,
            email_client: self.email_client,
            signer: self.signer,
            hasher: self.hasher,
            clock,
            policy: self.policy,
        }
    }

    pub fn policy(&self) -> &ResetPolicy {
        &self.policy
    }

    pub async fn register(
        &self,
        role_name: &str,
        attributes: Attributes,
    ) -> Result<AuthToken, RegisterError> {
        RegisterUseCase::new(&self.record_store, &self.hasher, &self.signer)
            .execute(role_name, attributes)
            .await
    }

    /// `identifier` is either the 9-digit ID or the email address.
    pub async fn login(
        &self,
        role_name: &str,
        identifier: &str,
        password: Secret<String>,
    ) -> Result<AuthToken, LoginError> {
        LoginUseCase::new(&self.record_store, &self.hasher, &self.signer)
            .execute(role_name, identifier, password)
            .await
    }

    /// Always acknowledges addresses that are malformed or unregistered.
    pub async fn request_reset(&self, email: &str) -> Result<(), ResetError> {
        let Ok(email) = Email::parse(email) else {
            tracing::debug!("Reset requested for malformed email");
            return Ok(());
        };

        RequestResetUseCase::new(
            &self.record_store,
            &self.ticket_store,
            &self.email_client,
            &self.clock,
            self.policy,
        )
        .execute(email)
        .await
    }

    pub async fn verify_reset_code(&self, email: &str, code: &str) -> Result<(), ResetError> {
        let email = Email::parse(email).map_err(|_| ResetError::NoSuchTicket)?;
        self.verify_ticket(&email, code).await
    }

    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: Secret<String>,
    ) -> Result<(), ResetError> {
        let email = Email::parse(email).map_err(|_| ResetError::NoSuchTicket)?;

        let Ok(new_password) = Password::try_from(new_password) else {
            // Ticket problems take precedence over password strength.
            self.verify_ticket(&email, code).await?;
            return Err(ResetError::WeakPassword {
                min_length: self.policy.min_password_length,
            });
        };

        ResetPasswordUseCase::new(
            &self.record_store,
            &self.ticket_store,
            &self.hasher,
            &self.clock,
            self.policy,
        )
        .execute(&email, code, new_password)
        .await
    }

    async fn verify_ticket(&self, email: &Email, code: &str) -> Result<(), ResetError> {
        VerifyResetCodeUseCase::new(&self.ticket_store, &self.clock)
            .execute(email, code)
            .await
    }
}

impl<R, T, E, S, H, C> IdentityService<R, T, E, S, H, C>
where
    T: ResetTicketStore + Clone + 'static,
    C: Clock + Clone + 'static,
{
    /// Start the periodic ticket sweep on the current runtime.
    pub fn spawn_reset_sweeper(&self) -> JoinHandle<()> {
        spawn_reset_sweeper(
            self.ticket_store.clone(),
            self.clock.clone(),
            self.policy.sweep_interval,
        )
    }
}
