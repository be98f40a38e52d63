// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the authenticated principal.
//!
//! Use the `Auth` extractor in handlers that need to know who is calling:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(principal): Auth) -> impl IntoResponse {
//!     // principal is Principal
//! }
//! ```
//!
//! The extractor only reads what the authentication middleware left in the
//! request extensions; it never looks at the `Authorization` header itself.

use axum::{extract::FromRequestParts, http::request::Parts};

use super::claims::{AuthResult, Principal};
use super::unauthorized::Unauthorized;

/// Extractor for authenticated principals.
///
/// Rejects with the standard 401 body when the request has no principal.
pub struct Auth(pub Principal);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = Unauthorized;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<AuthResult>() {
            Some(AuthResult::Authenticated(principal)) => Ok(Auth(principal.clone())),
            _ => Err(Unauthorized::authentication_required(parts.uri.path())),
        }
    }
}

/// Optional authentication extractor.
///
/// Returns `None` instead of rejecting when there is no principal.
pub struct OptionalAuth(pub Option<Principal>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let principal = parts
            .extensions
            .get::<AuthResult>()
            .and_then(AuthResult::principal)
            .cloned();
        Ok(OptionalAuth(principal))
    }
}
