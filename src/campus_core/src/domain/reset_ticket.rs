use chrono::{DateTime, Duration, Utc};

use super::{email::Email, reset_code::ResetCode};

/// Pending password reset for one email address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetTicket {
    pub email: Email,
    pub code: ResetCode,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
}

impl ResetTicket {
    pub fn issue(email: Email, code: ResetCode, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            email,
            code,
            expires_at: issued_at + ttl,
            used: false,
        }
    }

    /// A ticket is expired from `expires_at` onwards.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Expired or used tickets can be dropped by the sweep.
    pub fn is_stale_at(&self, now: DateTime<Utc>) -> bool {
        self.used || self.is_expired_at(now)
    }

    pub fn mark_used(&mut self) {
        self.used = true;
    }

    /// Whether `code` may still consume this ticket at `now`.
    pub fn redeemable_with(&self, code: &ResetCode, now: DateTime<Utc>) -> bool {
        !self.is_stale_at(now) && self.code == *code
    }
}
