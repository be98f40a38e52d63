// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Route authorization.
//!
//! Each route declares a [`RoutePolicy`] when it is registered:
//!
//! ```rust,ignore
//! Router::new()
//!     .route("/admin", protect(get(hello_admin), RoutePolicy::any_of([Role::admin()])))
//! ```
//!
//! The guard reads the [`AuthResult`] left by the authentication middleware
//! and refuses the request with a 401 before the handler runs. Denials for a
//! missing principal and for a missing role are indistinguishable.

use axum::{
    extract::{Request, State},
    middleware::{from_fn_with_state, Next},
    response::{IntoResponse, Response},
    routing::MethodRouter,
};

use super::claims::AuthResult;
use super::roles::RoutePolicy;
use super::unauthorized::Unauthorized;

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

/// Evaluates route policies against request principals.
pub struct AuthorizationGuard;

impl AuthorizationGuard {
    pub fn check(auth: &AuthResult, policy: &RoutePolicy) -> Decision {
        let allowed = match policy {
            RoutePolicy::Public => true,
            RoutePolicy::Authenticated => auth.is_authenticated(),
            RoutePolicy::AnyRole(required) => auth
                .principal()
                .is_some_and(|principal| principal.has_any_role(required)),
        };

        if allowed {
            Decision::Allow
        } else {
            Decision::Deny
        }
    }
}

/// Attach `policy` to a route.
///
/// The guard also wraps the method fallback, so a caller the policy refuses
/// gets a 401 for unregistered methods too, never a 405.
pub fn protect<S>(method_router: MethodRouter<S>, policy: RoutePolicy) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    method_router.layer(from_fn_with_state(policy, require_policy))
}

/// Guard middleware installed by [`protect`].
pub async fn require_policy(
    State(policy): State<RoutePolicy>,
    request: Request,
    next: Next,
) -> Response {
    let decision = match request.extensions().get::<AuthResult>() {
        Some(auth) => AuthorizationGuard::check(auth, &policy),
        None => AuthorizationGuard::check(&AuthResult::Anonymous, &policy),
    };

    match decision {
        Decision::Allow => next.run(request).await,
        Decision::Deny => {
            Unauthorized::authentication_required(request.uri().path()).into_response()
        }
    }
}
