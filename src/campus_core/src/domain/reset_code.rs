use std::fmt;

use rand::Rng;
use thiserror::Error;

const CODE_LENGTH: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResetCodeError {
    #[error("Reset code must be exactly 6 digits")]
    InvalidFormat,
}

/// Six-digit numeric password-reset code. Leading zeros are significant.
#[derive(Clone, PartialEq, Eq)]
pub struct ResetCode(String);

impl ResetCode {
    /// Generate a uniformly random code in `000000..=999999`.
    pub fn new() -> Self {
        let n: u32 = rand::rng().random_range(0..1_000_000);
        Self(format!("{n:06}"))
    }

    pub fn parse(code: &str) -> Result<Self, ResetCodeError> {
        let code = code.trim();
        if code.len() == CODE_LENGTH && code.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(code.to_owned()))
        } else {
            Err(ResetCodeError::InvalidFormat)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ResetCode {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ResetCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ResetCode(******)")
    }
}
