//! Principals and tenant keys.
//!
//! Every record is owned by exactly one tenant: the administrative principal
//! that created it. The principal is always passed explicitly; nothing in
//! Shopdesk reads "the current user" from global state.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::PrincipalId;

/// An authenticated administrative principal, as reported by the identity
/// provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Identifier issued by the identity provider.
    pub id: PrincipalId,
    /// Canonical sign-in address.
    pub email: Email,
}

impl Principal {
    /// Create a principal.
    #[must_use]
    pub const fn new(id: PrincipalId, email: Email) -> Self {
        Self { id, email }
    }

    /// The storage key scoping all of this principal's data.
    #[must_use]
    pub fn tenant_key(&self) -> TenantKey {
        TenantKey::from_email(&self.email)
    }
}

/// Path-safe key identifying a tenant's storage subtree.
///
/// Derived from the canonical email address with a reversible escape:
/// ASCII lowercase letters, digits and `-` pass through, every other byte
/// becomes `_` followed by two lowercase hex digits. Distinct addresses
/// therefore never share a key, and the result never contains a path
/// separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantKey(String);

impl TenantKey {
    /// Derive the key for an email address.
    #[must_use]
    pub fn from_email(email: &Email) -> Self {
        let mut key = String::with_capacity(email.as_str().len() + 8);
        for byte in email.as_str().bytes() {
            if byte.is_ascii_lowercase() || byte.is_ascii_digit() || byte == b'-' {
                key.push(char::from(byte));
            } else {
                key.push_str(&format!("_{byte:02x}"));
            }
        }
        Self(key)
    }

    /// Borrow the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TenantKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
