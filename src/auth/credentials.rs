// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential storage and password hashing.
//!
//! Both concerns sit behind traits so the gate can run against any user
//! database. The crate ships an in-memory store and a bcrypt hasher.

use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

use super::error::{CredentialStoreError, PasswordHashError};
use super::roles::Role;

/// Stored credentials for one user.
#[derive(Clone)]
pub struct UserRecord {
    pub username: String,
    pub password_hash: String,
    pub roles: BTreeSet<Role>,
}

impl std::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRecord")
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("roles", &self.roles)
            .finish()
    }
}

/// Lookup of users by name.
///
/// Implementations provide their own synchronization; lookups are treated as
/// synchronous and are never cached or retried by the caller.
pub trait CredentialStore: Send + Sync {
    /// Returns `Ok(None)` when the user does not exist.
    fn find_user(&self, username: &str) -> Result<Option<UserRecord>, CredentialStoreError>;
}

/// Hashes and verifies passwords.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Returns false on mismatch and on an unreadable hash.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// bcrypt password hasher.
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        bcrypt::hash(password, self.cost).map_err(|e| PasswordHashError(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        match bcrypt::verify(password, hash) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash could not be parsed");
                false
            }
        }
    }
}

/// In-memory credential store keyed by username.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user.
    pub fn upsert_user(
        &self,
        username: impl Into<String>,
        password_hash: impl Into<String>,
        roles: impl IntoIterator<Item = Role>,
    ) -> Result<(), CredentialStoreError> {
        let username = username.into();
        let record = UserRecord {
            username: username.clone(),
            password_hash: password_hash.into(),
            roles: roles.into_iter().collect(),
        };
        self.users
            .write()
            .map_err(|_| poisoned())?
            .insert(username, record);
        Ok(())
    }

    /// Remove a user. Returns whether the user existed.
    pub fn remove_user(&self, username: &str) -> Result<bool, CredentialStoreError> {
        Ok(self
            .users
            .write()
            .map_err(|_| poisoned())?
            .remove(username)
            .is_some())
    }

    pub fn len(&self) -> usize {
        self.users.read().map(|users| users.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn find_user(&self, username: &str) -> Result<Option<UserRecord>, CredentialStoreError> {
        let users = self.users.read().map_err(|_| poisoned())?;
        Ok(users.get(username).cloned())
    }
}

fn poisoned() -> CredentialStoreError {
    CredentialStoreError::Unavailable("user table lock poisoned".to_string())
}

/// Seed the demo accounts: `user` with USER and `admin` with ADMIN.
pub fn seed_demo_users(
    store: &InMemoryCredentialStore,
    hasher: &dyn PasswordHasher,
    user_password: &str,
    admin_password: &str,
) -> Result<(), SeedError> {
    store.upsert_user("user", hasher.hash(user_password)?, [Role::user()])?;
    store.upsert_user("admin", hasher.hash(admin_password)?, [Role::admin()])?;
    Ok(())
}

/// Demo account seeding failed.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Hash(#[from] PasswordHashError),
    #[error(transparent)]
    Store(#[from] CredentialStoreError),
}
