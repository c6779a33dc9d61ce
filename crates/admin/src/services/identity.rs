//! Identity provider seam.
//!
//! Authentication itself is delegated; the back office only asks for the
//! current principal and hands it explicitly to every accessor call.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use shopdesk_core::{Email, EmailError, Principal, PrincipalId};

/// Errors from the identity provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("invalid credentials")]
    InvalidCredentials,
}

/// Source of the signed-in principal.
pub trait IdentityProvider: Send + Sync {
    /// The signed-in principal, if any.
    fn current_principal(&self) -> Option<Principal>;

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] on malformed email or bad credentials.
    fn sign_in(&self, email: &str, password: &SecretString) -> Result<Principal, IdentityError>;

    fn sign_out(&self);
}

/// A fixed principal, typically from configuration. Sign-in is refused.
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    principal: Option<Principal>,
}

impl StaticIdentity {
    #[must_use]
    pub const fn new(principal: Option<Principal>) -> Self {
        Self { principal }
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_principal(&self) -> Option<Principal> {
        self.principal.clone()
    }

    fn sign_in(&self, _email: &str, _password: &SecretString) -> Result<Principal, IdentityError> {
        Err(IdentityError::InvalidCredentials)
    }

    fn sign_out(&self) {}
}

struct Account {
    principal: Principal,
    password: SecretString,
}

#[derive(Default)]
struct Accounts {
    by_email: HashMap<Email, Account>,
    current: Option<Principal>,
}

/// In-process identity provider with registered accounts.
#[derive(Clone, Default)]
pub struct InMemoryIdentity {
    inner: Arc<RwLock<Accounts>>,
}

impl std::fmt::Debug for InMemoryIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let accounts = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("InMemoryIdentity")
            .field("accounts", &accounts.by_email.len())
            .field("current", &accounts.current)
            .finish()
    }
}

impl InMemoryIdentity {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account and return its principal.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidEmail`] for a malformed address.
    pub fn register(&self, email: &str, password: SecretString) -> Result<Principal, IdentityError> {
        let email = Email::parse(email)?;
        let principal = Principal::new(PrincipalId::new(uuid::Uuid::new_v4().to_string()), email.clone());
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .by_email
            .insert(
                email,
                Account {
                    principal: principal.clone(),
                    password,
                },
            );
        Ok(principal)
    }
}

impl IdentityProvider for InMemoryIdentity {
    fn current_principal(&self) -> Option<Principal> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .current
            .clone()
    }

    fn sign_in(&self, email: &str, password: &SecretString) -> Result<Principal, IdentityError> {
        let email = Email::parse(email)?;
        let mut accounts = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let principal = accounts
            .by_email
            .get(&email)
            .filter(|account| account.password.expose_secret() == password.expose_secret())
            .map(|account| account.principal.clone())
            .ok_or(IdentityError::InvalidCredentials)?;
        accounts.current = Some(principal.clone());
        tracing::info!(principal = %principal.id, "Signed in");
        Ok(principal)
    }

    fn sign_out(&self) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .current = None;
    }
}
