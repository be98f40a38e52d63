// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Username/password exchange for a bearer token.

use std::sync::Arc;

use chrono::Duration;

use super::credentials::{CredentialStore, PasswordHasher};
use super::error::AuthFailure;
use super::roles::Role;
use super::token::TokenService;

/// Password checked for unknown users so both failure paths do the same work.
const DECOY_PASSWORD: &str = "decoy-password-for-unknown-users";

/// Sign-in credentials. Only lives for the duration of one sign-in.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInResult {
    pub token: String,
    pub username: String,
    pub roles: Vec<Role>,
}

/// Exchanges credentials for a signed token.
pub struct SignInExchange {
    credentials: Arc<dyn CredentialStore>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<TokenService>,
    lifetime: Duration,
    decoy_hash: Option<String>,
}

impl SignInExchange {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<TokenService>,
        lifetime: Duration,
    ) -> Self {
        let decoy_hash = match hasher.hash(DECOY_PASSWORD) {
            Ok(hash) => Some(hash),
            Err(e) => {
                tracing::warn!(error = %e, "Could not prepare decoy password hash");
                None
            }
        };

        Self {
            credentials,
            hasher,
            tokens,
            lifetime,
            decoy_hash,
        }
    }

    /// Verify `credentials` and issue a token.
    ///
    /// Runs a password hash comparison, so call it off the async workers.
    pub fn sign_in(&self, credentials: &Credentials) -> Result<SignInResult, AuthFailure> {
        let user = match self.credentials.find_user(&credentials.username) {
            Ok(user) => user,
            Err(e) => {
                tracing::error!(error = %e, "Credential lookup failed during sign-in");
                None
            }
        };

        let Some(user) = user else {
            if let Some(decoy) = &self.decoy_hash {
                let _ = self.hasher.verify(&credentials.password, decoy);
            }
            tracing::info!("Sign-in rejected: bad credentials");
            return Err(AuthFailure::BadCredentials);
        };

        if !self.hasher.verify(&credentials.password, &user.password_hash) {
            tracing::info!("Sign-in rejected: bad credentials");
            return Err(AuthFailure::BadCredentials);
        }

        let token = self
            .tokens
            .issue(&user.username, self.lifetime)
            .map_err(|e| {
                tracing::error!(reason = e.code(), "Token issuance failed during sign-in");
                AuthFailure::BadCredentials
            })?;

        tracing::info!(username = %user.username, "User signed in");

        Ok(SignInResult {
            token,
            username: user.username,
            roles: user.roles.into_iter().collect(),
        })
    }
}
