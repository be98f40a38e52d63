// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims, the verified principal, and the per-request auth outcome.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::TokenError;
use super::roles::Role;

/// Claims embedded in a signed token.
///
/// Serialized with the registered JWT claim names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    #[serde(rename = "sub")]
    pub subject: String,

    /// Issued at, Unix seconds
    #[serde(rename = "iat")]
    pub issued_at: i64,

    /// Expiration, Unix seconds
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

/// Verified identity for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Principal {
    username: String,
    roles: BTreeSet<Role>,
}

impl Principal {
    pub fn new(username: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            username: username.into(),
            roles: roles.into_iter().collect(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }

    /// True if the principal holds at least one of `required`.
    pub fn has_any_role(&self, required: &BTreeSet<Role>) -> bool {
        !self.roles.is_disjoint(required)
    }
}

/// Why a presented token did not produce a principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    /// Token failed verification
    Token(TokenError),
    /// Token is authentic but its subject no longer exists
    UnknownSubject,
    /// Credential store lookup failed
    StoreUnavailable,
}

/// Outcome of the authentication pipeline for one request.
///
/// Inserted into the request extensions by the pipeline and read by the
/// route guard and the [`Auth`](super::Auth) extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthResult {
    Authenticated(Principal),
    /// No bearer token was presented
    Anonymous,
    /// A token was presented but did not verify
    Rejected(RejectionReason),
}

impl AuthResult {
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            AuthResult::Authenticated(principal) => Some(principal),
            AuthResult::Anonymous | AuthResult::Rejected(_) => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_principal() -> Principal {
        Principal::new("alice", [Role::user()])
    }

    #[test]
    fn claims_use_registered_names() {
        let claims = Claims {
            subject: "alice".to_string(),
            issued_at: 1_700_000_000,
            expires_at: 1_700_003_600,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["sub"], "alice");
        assert_eq!(json["iat"], 1_700_000_000);
        assert_eq!(json["exp"], 1_700_003_600);
    }

    #[test]
    fn has_any_role_is_logical_or() {
        let principal = sample_principal();
        let user_or_admin: BTreeSet<Role> = [Role::user(), Role::admin()].into();
        let admin_only: BTreeSet<Role> = [Role::admin()].into();

        assert!(principal.has_any_role(&user_or_admin));
        assert!(!principal.has_any_role(&admin_only));
        assert!(!principal.has_any_role(&BTreeSet::new()));
    }

    #[test]
    fn principal_is_only_exposed_when_authenticated() {
        let authenticated = AuthResult::Authenticated(sample_principal());
        assert_eq!(authenticated.principal().unwrap().username(), "alice");
        assert!(authenticated.is_authenticated());

        assert!(AuthResult::Anonymous.principal().is_none());
        let expired = AuthResult::Rejected(RejectionReason::Token(TokenError::Expired));
        assert!(!expired.is_authenticated());
    }

    #[test]
    fn principal_serializes_username_and_roles() {
        let principal = Principal::new("bob", [Role::admin(), Role::user()]);
        let json = serde_json::to_value(&principal).unwrap();
        assert_eq!(json["username"], "bob");
        assert_eq!(json["roles"], serde_json::json!(["ADMIN", "USER"]));
    }
}
