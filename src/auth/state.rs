//! Auth flow state and configuration.

use serde::{Deserialize, Serialize};

const DEFAULT_OTP_TTL_MILLIS: i64 = 5 * 60 * 1000;

/// The flow's local view of two-factor progress, distinct from the session
/// store's session object.
///
/// Invariant: `is_verified` can only become `true` after `otp_sent` did, and
/// only through a matching, unexpired code. Both flags reset when a fresh
/// sign-in/sign-up cycle begins or on sign-out.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    pub email: String,
    pub is_verified: bool,
    pub otp_sent: bool,
}

impl AuthState {
    /// The pre-authentication state: no email, nothing sent, nothing verified.
    #[must_use]
    pub fn initial() -> Self {
        Self::default()
    }

    /// State right after the session store accepted credentials for `email`.
    #[must_use]
    pub fn credentials_accepted(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            is_verified: false,
            otp_sent: false,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct AuthConfig {
    otp_ttl_millis: i64,
}

impl AuthConfig {
    /// Default policy: five-minute codes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            otp_ttl_millis: DEFAULT_OTP_TTL_MILLIS,
        }
    }

    #[must_use]
    pub fn with_otp_ttl_millis(mut self, millis: i64) -> Self {
        self.otp_ttl_millis = millis;
        self
    }

    #[must_use]
    pub fn otp_ttl_millis(&self) -> i64 {
        self.otp_ttl_millis
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new()
    }
}
