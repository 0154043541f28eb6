use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::Secret;
use thiserror::Error;

use crate::domain::{
    auth_token::{AuthClaims, AuthToken},
    email::Email,
    password::Password,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailDeliveryError {
    /// The provider endpoint could not be built from configuration.
    #[error("Invalid email endpoint: {0}")]
    InvalidEndpoint(String),
    /// The request never got a response: connect failure, timeout, bad body.
    #[error("Email transport failed: {0}")]
    Transport(String),
    #[error("Email provider answered with status {status}")]
    Rejected { status: u16 },
}

/// Port trait for email sending service
#[async_trait]
pub trait EmailClient: Send + Sync {
    /// Deliver a plain-text message.
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<(), EmailDeliveryError>;
}

#[derive(Debug, Error)]
pub enum HashingError {
    #[error("Password hashing failed: {0}")]
    UnexpectedError(String),
}

/// One-way salted password hashing.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &Password) -> Result<Secret<String>, HashingError>;

    /// `Ok(false)` on mismatch. Malformed stored hashes are errors.
    async fn verify(
        &self,
        password: &Password,
        password_hash: &Secret<String>,
    ) -> Result<bool, HashingError>;

    /// A well-formed hash that no password matches. Verifying against it
    /// costs as much as verifying against a stored hash.
    fn decoy_hash(&self) -> Secret<String>;
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token error: {0}")]
    UnexpectedError(String),
}

/// Issues and checks signed, time-limited bearer tokens.
pub trait TokenSigner: Send + Sync {
    fn sign(&self, claims: &AuthClaims) -> Result<AuthToken, TokenError>;
    fn verify(&self, token: &str) -> Result<AuthClaims, TokenError>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
