// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Roles and route policies for authorization.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Prefix used by authority strings such as `ROLE_ADMIN`.
const AUTHORITY_PREFIX: &str = "ROLE_";

/// A granted role.
///
/// Role names are normalized to upper case, so `admin`, `ADMIN` and the
/// authority form `ROLE_ADMIN` all name the same role.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(from = "String", into = "String")]
pub struct Role(String);

impl Role {
    pub fn new(name: impl AsRef<str>) -> Self {
        let name = name.as_ref().trim();
        let name = name.strip_prefix(AUTHORITY_PREFIX).unwrap_or(name);
        Role(name.to_uppercase())
    }

    /// Regular user.
    pub fn user() -> Self {
        Role("USER".to_string())
    }

    /// Administrator.
    pub fn admin() -> Self {
        Role("ADMIN".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Role {
    fn from(name: String) -> Self {
        Role::new(name)
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        Role::new(name)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.0
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Access requirement attached to a route at registration time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutePolicy {
    /// Reachable without a principal (sign-in, liveness, docs).
    Public,
    /// Any authenticated principal, whatever its roles.
    Authenticated,
    /// Authenticated principal holding at least one of these roles.
    AnyRole(BTreeSet<Role>),
}

impl RoutePolicy {
    /// Policy satisfied by any one of `roles`.
    pub fn any_of<I, R>(roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        RoutePolicy::AnyRole(roles.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalizes_case_and_authority_prefix() {
        assert_eq!(Role::new("admin"), Role::admin());
        assert_eq!(Role::new("ROLE_ADMIN"), Role::admin());
        assert_eq!(Role::new(" User "), Role::user());
        assert_eq!(Role::new("auditor").as_str(), "AUDITOR");
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&Role::admin()).unwrap();
        assert_eq!(json, r#""ADMIN""#);

        let role: Role = serde_json::from_str(r#""role_user""#).unwrap();
        assert_eq!(role, Role::user());
    }

    #[test]
    fn any_of_collects_roles() {
        let policy = RoutePolicy::any_of(["USER", "admin"]);
        let RoutePolicy::AnyRole(roles) = policy else {
            panic!("expected AnyRole");
        };
        assert!(roles.contains(&Role::user()));
        assert!(roles.contains(&Role::admin()));
        assert_eq!(roles.len(), 2);
    }
}
