use campus_core::MIN_RESET_PASSWORD_LENGTH;

/// Timing and strength rules for the password reset flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetPolicy {
    /// How long an issued code stays valid.
    pub code_ttl: chrono::Duration,
    /// Period of the background sweep over stored tickets.
    pub sweep_interval: std::time::Duration,
    pub min_password_length: usize,
}

impl Default for ResetPolicy {
    fn default() -> Self {
        Self {
            code_ttl: chrono::Duration::minutes(15),
            sweep_interval: std::time::Duration::from_secs(5 * 60),
            min_password_length: MIN_RESET_PASSWORD_LENGTH,
        }
    }
}
