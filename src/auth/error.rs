//! Typed errors for the auth flow. None of these are fatal; every variant
//! leaves the flow in a state the user can retry from.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// The OTP dispatch collaborator failed; no state was changed and no
    /// record was stored.
    #[error("failed to send OTP: {0}")]
    Delivery(anyhow::Error),

    /// Verification was attempted with no pending record: either no code was
    /// ever issued, or the last one was already consumed or purged.
    #[error("no active OTP; request a new one")]
    NoActiveOtp,

    /// The pending code outlived its window. The record has been purged; the
    /// user must request a resend.
    #[error("OTP has expired; request a new one")]
    Expired,

    /// Wrong code. The pending record is retained so the user can retry.
    #[error("invalid OTP")]
    Mismatch,

    /// Resend was requested before any sign-in/sign-up established an email.
    #[error("no email address on record")]
    NoPendingEmail,

    /// Pass-through failure from the session store collaborator.
    #[error("{0}")]
    Credential(String),

    /// The scratch store backing the pending record failed.
    #[error("OTP storage error: {0}")]
    Storage(#[from] crate::storage::StorageError),
}

impl AuthError {
    /// `true` for the variants a caller should surface as "try again",
    /// as opposed to "request a new code".
    #[must_use]
    pub fn retryable_with_same_code(&self) -> bool {
        matches!(self, Self::Mismatch)
    }
}
