//! Session store: the external identity provider behind a capability trait.
//!
//! The flow only needs credential checks, sign-out, and a way to observe
//! session changes. [`InMemorySessionStore`] is the reference provider used
//! for local development and tests; a remote-backed implementation satisfies
//! the same contract.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::watch;
use tracing::info;
use uuid::Uuid;

use crate::auth::clock::{Clock, SystemClock};
use crate::auth::valid_email;

/// An authenticated identity issued by the provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub id: Uuid,
    pub email: String,
    /// Unix milliseconds.
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Password should be at least {min} characters")]
    WeakPassword { min: usize },
    #[error("User already registered")]
    AlreadyRegistered,
    #[error("Invalid login credentials")]
    InvalidCredentials,
    #[error("{0}")]
    Provider(String),
}

/// Capability interface of the identity provider.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Check credentials for an existing account and open a session.
    ///
    /// # Errors
    /// Returns `CredentialError` when the account is unknown, the password is
    /// wrong, or the provider is unavailable.
    async fn sign_in(&self, email: &str, password: SecretString)
        -> Result<Session, CredentialError>;

    /// Create an account and open a session for it.
    ///
    /// # Errors
    /// Returns `CredentialError` when the email is malformed, the password is
    /// too short, or the address is already registered.
    async fn sign_up(&self, email: &str, password: SecretString)
        -> Result<Session, CredentialError>;

    /// Close the current session. Closing when none is open is a no-op.
    ///
    /// # Errors
    /// Returns `CredentialError` when the provider is unavailable.
    async fn sign_out(&self) -> Result<(), CredentialError>;

    /// The currently open session, if any.
    async fn current_session(&self) -> Option<Session>;

    /// Subscribe to session changes. Dropping the receiver unsubscribes.
    fn subscribe(&self) -> watch::Receiver<Option<Session>>;
}

struct Account {
    user_id: Uuid,
    password: SecretString,
    created_at: i64,
}

/// Reference provider holding accounts in memory.
pub struct InMemorySessionStore {
    accounts: Mutex<HashMap<String, Account>>,
    current: watch::Sender<Option<Session>>,
    clock: Arc<dyn Clock>,
    min_password_length: usize,
}

impl InMemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            accounts: Mutex::new(HashMap::new()),
            current,
            clock,
            min_password_length: 6,
        }
    }

    #[must_use]
    pub fn with_min_password_length(mut self, length: usize) -> Self {
        self.min_password_length = length;
        self
    }

    fn open_session(&self, user_id: Uuid, email: &str) -> Session {
        let session = Session {
            id: user_id,
            email: email.to_string(),
            created_at: self.clock.now_millis(),
        };
        self.current.send_replace(Some(session.clone()));
        session
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn sign_in(
        &self,
        email: &str,
        password: SecretString,
    ) -> Result<Session, CredentialError> {
        let user_id = {
            let accounts = self.accounts.lock().unwrap_or_else(|e| e.into_inner());
            let account = accounts.get(email).ok_or(CredentialError::InvalidCredentials)?;
            if account.password.expose_secret() != password.expose_secret() {
                return Err(CredentialError::InvalidCredentials);
            }
            account.user_id
        };

        info!(email = %email, "session opened");
        Ok(self.open_session(user_id, email))
    }

    async fn sign_up(
        &self,
        email: &str,
        password: SecretString,
    ) -> Result<Session, CredentialError> {
        if !valid_email(email) {
            return Err(CredentialError::InvalidEmail);
        }
        if password.expose_secret().len() < self.min_password_length {
            return Err(CredentialError::WeakPassword {
                min: self.min_password_length,
            });
        }

        let user_id = {
            let mut accounts = self.accounts.lock().unwrap_or_else(|e| e.into_inner());
            if accounts.contains_key(email) {
                return Err(CredentialError::AlreadyRegistered);
            }
            let user_id = Uuid::new_v4();
            accounts.insert(
                email.to_string(),
                Account {
                    user_id,
                    password,
                    created_at: self.clock.now_millis(),
                },
            );
            user_id
        };

        info!(email = %email, "account registered");
        Ok(self.open_session(user_id, email))
    }

    async fn sign_out(&self) -> Result<(), CredentialError> {
        self.current.send_replace(None);
        Ok(())
    }

    async fn current_session(&self) -> Option<Session> {
        self.current.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.current.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[tokio::test]
    async fn sign_up_then_sign_in() {
        let store = InMemorySessionStore::new();
        let session = store.sign_up("a@x.com", secret("secret1")).await.unwrap();
        assert_eq!(session.email, "a@x.com");

        let again = store.sign_in("a@x.com", secret("secret1")).await.unwrap();
        assert_eq!(again.id, session.id);
        assert_eq!(store.current_session().await, Some(again));
    }

    #[tokio::test]
    async fn sign_up_rejections() {
        let store = InMemorySessionStore::new();

        assert_eq!(
            store.sign_up("not-an-email", secret("secret1")).await,
            Err(CredentialError::InvalidEmail)
        );
        assert_eq!(
            store.sign_up("a@x.com", secret("short")).await,
            Err(CredentialError::WeakPassword { min: 6 })
        );

        store.sign_up("a@x.com", secret("secret1")).await.unwrap();
        assert_eq!(
            store.sign_up("a@x.com", secret("secret1")).await,
            Err(CredentialError::AlreadyRegistered)
        );
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_account_look_identical() {
        let store = InMemorySessionStore::new();
        store.sign_up("a@x.com", secret("secret1")).await.unwrap();

        assert_eq!(
            store.sign_in("a@x.com", secret("wrong-1")).await,
            Err(CredentialError::InvalidCredentials)
        );
        assert_eq!(
            store.sign_in("b@x.com", secret("secret1")).await,
            Err(CredentialError::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn sign_out_is_idempotent_and_observable() {
        let store = InMemorySessionStore::new();
        let mut changes = store.subscribe();

        store.sign_up("a@x.com", secret("secret1")).await.unwrap();
        changes.changed().await.unwrap();
        assert!(changes.borrow_and_update().is_some());

        store.sign_out().await.unwrap();
        changes.changed().await.unwrap();
        assert!(changes.borrow_and_update().is_none());

        // Already signed out; still succeeds.
        store.sign_out().await.unwrap();
        assert_eq!(store.current_session().await, None);
    }
}
