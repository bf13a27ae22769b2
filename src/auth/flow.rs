//! The OTP verification state machine.
//!
//! `Unauthenticated → CredentialsAccepted → OtpIssued → Verified`, observable
//! through [`AuthState`]'s flags, returning to `Unauthenticated` on sign-out.
//! All operations run from discrete user actions; the flow owns its state
//! exclusively (`&mut self`), so no two mutations interleave.

use secrecy::SecretString;
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::clock::{Clock, SystemClock};
use crate::auth::dispatch::OtpSender;
use crate::auth::error::AuthError;
use crate::auth::otp::{CodeGenerator, OtpRecord, ThreadRngCodeGenerator};
use crate::auth::session::{Session, SessionStore};
use crate::auth::state::{AuthConfig, AuthState};
use crate::auth::store::OtpStore;
use crate::bugs::model::User;

pub struct AuthFlow {
    state: AuthState,
    config: AuthConfig,
    sessions: Arc<dyn SessionStore>,
    sender: Arc<dyn OtpSender>,
    otp_store: Box<dyn OtpStore>,
    generator: Box<dyn CodeGenerator>,
    clock: Arc<dyn Clock>,
}

impl AuthFlow {
    #[must_use]
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        sender: Arc<dyn OtpSender>,
        otp_store: Box<dyn OtpStore>,
    ) -> Self {
        Self {
            state: AuthState::initial(),
            config: AuthConfig::new(),
            sessions,
            sender,
            otp_store,
            generator: Box::new(ThreadRngCodeGenerator),
            clock: Arc::new(SystemClock),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: AuthConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_generator(mut self, generator: Box<dyn CodeGenerator>) -> Self {
        self.generator = generator;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The flow's view of two-factor progress. Gate access on
    /// [`AuthState::is_verified`], not on the session store alone.
    #[must_use]
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// The application user for the currently open session, if any, with the
    /// role every account gets on sign-up.
    pub async fn current_user(&self) -> Option<User> {
        self.sessions
            .current_session()
            .await
            .map(|session| User::from(&session))
    }

    /// Check credentials with the session store, then issue the second
    /// factor.
    ///
    /// On a provider failure nothing changes. After the provider accepts, the
    /// flow is at `CredentialsAccepted` even if delivery of the code fails;
    /// [`Self::resend_otp`] retries from there.
    ///
    /// # Errors
    /// `AuthError::Credential` from the provider, or `AuthError::Delivery`
    /// when the accepted sign-in could not get its code sent.
    pub async fn sign_in(
        &mut self,
        email: &str,
        password: SecretString,
    ) -> Result<Session, AuthError> {
        let session = self
            .sessions
            .sign_in(email, password)
            .await
            .map_err(|err| AuthError::Credential(err.to_string()))?;

        self.state = AuthState::credentials_accepted(email);
        self.issue_otp(email).await?;
        Ok(session)
    }

    /// Register a new account, then issue the second factor.
    ///
    /// # Errors
    /// Same surface as [`Self::sign_in`].
    pub async fn sign_up(
        &mut self,
        email: &str,
        password: SecretString,
    ) -> Result<Session, AuthError> {
        let session = self
            .sessions
            .sign_up(email, password)
            .await
            .map_err(|err| AuthError::Credential(err.to_string()))?;

        self.state = AuthState::credentials_accepted(email);
        self.issue_otp(email).await?;
        Ok(session)
    }

    /// Generate, deliver, and persist a fresh code for `email`.
    ///
    /// Delivery happens before the record is stored, so a failed dispatch
    /// leaves no live code behind and `otp_sent` stays false.
    ///
    /// # Errors
    /// `AuthError::Delivery` when the dispatch collaborator fails,
    /// `AuthError::Storage` when the slot cannot be written.
    pub async fn issue_otp(&mut self, email: &str) -> Result<(), AuthError> {
        let code = self.generator.generate();

        if let Err(err) = self.sender.send(email, &code).await {
            warn!(email = %email, "otp delivery failed: {err:#}");
            return Err(AuthError::Delivery(err));
        }

        let record = OtpRecord {
            code,
            email: email.to_string(),
            expires_at: self.clock.now_millis() + self.config.otp_ttl_millis(),
        };
        self.otp_store.put(&record)?;
        self.state.otp_sent = true;

        info!(email = %email, expires_at = record.expires_at, "otp issued");
        Ok(())
    }

    /// Present a candidate code.
    ///
    /// Expiry is checked lazily here; an expired record is purged as a side
    /// effect. A mismatch keeps the record so the user can retry; a match
    /// consumes it, making a second presentation fail with `NoActiveOtp`.
    ///
    /// # Errors
    /// `NoActiveOtp`, `Expired`, or `Mismatch` per the rules above.
    pub fn verify_otp(&mut self, candidate: &str) -> Result<(), AuthError> {
        let Some(record) = self.otp_store.load()? else {
            return Err(AuthError::NoActiveOtp);
        };

        if record.is_expired(self.clock.now_millis()) {
            self.otp_store.clear()?;
            info!(email = %record.email, "otp expired; record purged");
            return Err(AuthError::Expired);
        }

        if !record.matches(candidate) {
            return Err(AuthError::Mismatch);
        }

        self.otp_store.clear()?;
        self.state.is_verified = true;
        info!(email = %record.email, "otp verified");
        Ok(())
    }

    /// Re-issue a fresh, independently drawn code to the pending email,
    /// overwriting any prior record.
    ///
    /// # Errors
    /// `NoPendingEmail` when no sign-in/sign-up established an address; no
    /// dispatch call is made in that case. Otherwise the
    /// [`Self::issue_otp`] surface.
    pub async fn resend_otp(&mut self) -> Result<(), AuthError> {
        if self.state.email.is_empty() {
            return Err(AuthError::NoPendingEmail);
        }

        let email = self.state.email.clone();
        self.issue_otp(&email).await
    }

    /// Close the session and return to `Unauthenticated`. Idempotent.
    ///
    /// Any pending code is purged with the session; a record must not
    /// outlive the cycle that issued it.
    ///
    /// # Errors
    /// `AuthError::Credential` when the provider rejects the sign-out.
    pub async fn sign_out(&mut self) -> Result<(), AuthError> {
        self.sessions
            .sign_out()
            .await
            .map_err(|err| AuthError::Credential(err.to_string()))?;

        self.otp_store.clear()?;
        self.state = AuthState::initial();
        info!("signed out");
        Ok(())
    }
}
