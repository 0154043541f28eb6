use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

/// Minimum length enforced on passwords chosen through the reset flow.
pub const MIN_RESET_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    #[error("Password must not be empty")]
    Empty,
}

/// Plaintext password, kept in a [`Secret`] until it is hashed.
#[derive(Debug, Clone)]
pub struct Password(Secret<String>);

impl Password {
    /// Number of characters, not bytes.
    pub fn char_count(&self) -> usize {
        self.0.expose_secret().chars().count()
    }

    pub fn meets_minimum_length(&self, min_length: usize) -> bool {
        self.char_count() >= min_length
    }
}

impl TryFrom<Secret<String>> for Password {
    type Error = PasswordError;

    fn try_from(value: Secret<String>) -> Result<Self, Self::Error> {
        if value.expose_secret().is_empty() {
            return Err(PasswordError::Empty);
        }
        Ok(Self(value))
    }
}

impl AsRef<Secret<String>> for Password {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}
