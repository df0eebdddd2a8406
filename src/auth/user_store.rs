//! User Storage
//! Mission: Hold registered accounts in process memory
//!
//! Accounts live only as long as the process; a restart loses every
//! registration. The store is an injected object held in shared state so
//! tests get a fresh one each.

use crate::auth::models::Account;
use anyhow::{Context, Result};
use bcrypt::{hash, verify, DEFAULT_COST};
use parking_lot::RwLock;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::info;

/// Registration conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    UsernameTaken,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::UsernameTaken => write!(f, "Username already registered"),
        }
    }
}

impl std::error::Error for StoreError {}

/// In-memory account store keyed by username
pub struct UserStore {
    accounts: RwLock<HashMap<String, Account>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
        }
    }

    /// Look up an account by username
    pub fn get(&self, username: &str) -> Option<Account> {
        self.accounts.read().get(username).cloned()
    }

    /// Insert a new account. Check-then-insert runs under the write lock, so
    /// of two concurrent registrations for the same username exactly one wins
    /// and the other observes `UsernameTaken`.
    pub fn insert(&self, account: Account) -> Result<(), StoreError> {
        match self.accounts.write().entry(account.username.clone()) {
            Entry::Occupied(_) => Err(StoreError::UsernameTaken),
            Entry::Vacant(slot) => {
                info!("✅ Registered account: {}", account.username);
                slot.insert(account);
                Ok(())
            }
        }
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash a plaintext password with bcrypt.
///
/// Deliberately slow key derivation; callers on the async path must run this
/// through `tokio::task::spawn_blocking`.
pub fn hash_password(plain: &str) -> Result<String> {
    hash(plain, DEFAULT_COST).context("Failed to hash password")
}

/// Check a plaintext password against a stored bcrypt hash. The bcrypt crate
/// performs the comparison in constant time.
pub fn verify_password(plain: &str, hashed: &str) -> Result<bool> {
    verify(plain, hashed).context("Failed to verify password")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn account(username: &str) -> Account {
        Account {
            username: username.to_string(),
            hashed_password: "hash".to_string(),
            full_name: None,
            email: None,
            disabled: false,
        }
    }

    #[test]
    fn test_insert_and_get() {
        let store = UserStore::new();

        assert!(store.get("alice").is_none());
        store.insert(account("alice")).unwrap();

        let found = store.get("alice").unwrap();
        assert_eq!(found.username, "alice");
    }

    #[test]
    fn test_duplicate_username_conflicts() {
        let store = UserStore::new();

        store.insert(account("alice")).unwrap();
        assert_eq!(
            store.insert(account("alice")).unwrap_err(),
            StoreError::UsernameTaken
        );
    }

    #[test]
    fn test_concurrent_registration_single_winner() {
        let store = Arc::new(UserStore::new());

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || store.insert(account("alice")).is_ok())
            })
            .collect();

        let wins: usize = handles
            .into_iter()
            .map(|h| h.join().unwrap() as usize)
            .sum();
        assert_eq!(wins, 1);
    }

    #[test]
    fn test_password_hash_and_verify() {
        let hashed = hash_password("s3cret").unwrap();

        assert_ne!(hashed, "s3cret");
        assert!(verify_password("s3cret", &hashed).unwrap());
        assert!(!verify_password("wrong", &hashed).unwrap());
    }
}
