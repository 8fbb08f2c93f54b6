//! Username/password authentication over an injected credential store.
//!
//! Passwords are stored as unsalted single-pass SHA-256 hex digests.
//! This reproduces the legacy credential format; it is not a hardened
//! scheme and the file should be treated as sensitive.

use crate::store::CredentialStore;
use crate::{Error, Result};
use sha2::{Digest, Sha256};

/// Hash a plaintext password to its lowercase hex SHA-256 digest.
///
/// Deterministic and unkeyed: equal plaintexts always yield equal
/// digests, across processes and runs.
pub fn hash_password(plaintext: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plaintext.as_bytes());
    hex::encode(hasher.finalize())
}

/// Constant-time byte comparison to prevent timing attacks
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// Registration and login over a [`CredentialStore`].
///
/// Every operation loads a fresh snapshot from the store, so multiple
/// authenticators over the same backing file observe each other's
/// registrations. Single-writer use is assumed; there is no
/// cross-process coordination beyond best-effort file locks.
pub struct Authenticator<S: CredentialStore> {
    store: S,
}

impl<S: CredentialStore> Authenticator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Register a new user.
    ///
    /// Fails with [`Error::EmptyUsername`] for a blank username,
    /// [`Error::DuplicateUsername`] if the username is taken and
    /// [`Error::PasswordMismatch`] if the confirmation differs. All
    /// three are recoverable; the console re-prompts on them.
    /// On success the updated snapshot is persisted before returning.
    pub fn register(&self, username: &str, password: &str, confirm: &str) -> Result<()> {
        let username = username.trim();
        if username.is_empty() {
            return Err(Error::EmptyUsername);
        }

        let mut credentials = self.store.load()?;

        if credentials.contains(username) {
            tracing::info!(username, "Registration rejected: duplicate username");
            return Err(Error::DuplicateUsername(username.to_string()));
        }
        if password != confirm {
            return Err(Error::PasswordMismatch);
        }

        credentials.insert(username, hash_password(password))?;
        self.store.save(&credentials)?;

        tracing::info!(username, "Registered new user");
        Ok(())
    }

    /// Authenticate a user, returning the username as the identity.
    ///
    /// Fails with [`Error::UnknownUser`] if the username is absent and
    /// [`Error::WrongPassword`] if the digest does not match.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<String> {
        let username = username.trim();
        let credentials = self.store.load()?;

        let stored = credentials
            .digest_for(username)
            .ok_or_else(|| Error::UnknownUser(username.to_string()))?;

        let attempt = hash_password(password);
        if !constant_time_eq(stored.as_bytes(), attempt.as_bytes()) {
            tracing::info!(username, "Login rejected: wrong password");
            return Err(Error::WrongPassword);
        }

        tracing::info!(username, "Login succeeded");
        Ok(username.to_string())
    }
}
