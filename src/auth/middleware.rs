// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Runs once per request, before routing to a handler. It turns the
//! `Authorization` header into an [`AuthResult`] and stores it in the request
//! extensions. It never rejects: refusing a request is the route guard's job,
//! so public routes stay reachable with a stale token and protected routes
//! all fail the same way.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/admin", protect(get(handler), RoutePolicy::any_of([Role::admin()])))
//!     .layer(axum::middleware::from_fn_with_state(pipeline, authenticate));
//! ```

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use super::claims::{AuthResult, Principal, RejectionReason};
use super::credentials::CredentialStore;
use super::error::TokenError;
use super::token::TokenService;

const BEARER_PREFIX: &str = "Bearer ";

/// Extract the bearer token from the `Authorization` header.
///
/// The prefix is case-sensitive. Returns `None` when the header is missing,
/// not visible ASCII, has another scheme, or carries an empty token.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?;
    let Ok(value) = value.to_str() else {
        tracing::debug!("Authorization header is not valid ASCII");
        return None;
    };

    let Some(token) = value.strip_prefix(BEARER_PREFIX) else {
        tracing::debug!("Authorization header does not use the Bearer scheme");
        return None;
    };

    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

/// Turns request headers into an [`AuthResult`].
pub struct AuthenticationPipeline {
    tokens: Arc<TokenService>,
    credentials: Arc<dyn CredentialStore>,
}

impl AuthenticationPipeline {
    pub fn new(tokens: Arc<TokenService>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            tokens,
            credentials,
        }
    }

    /// Authenticate a request from its headers.
    pub fn authenticate(&self, headers: &HeaderMap) -> AuthResult {
        match bearer_token(headers) {
            Some(token) => self.authenticate_token(token),
            None => AuthResult::Anonymous,
        }
    }

    /// Verify a bearer token and resolve the subject's current roles.
    pub fn authenticate_token(&self, token: &str) -> AuthResult {
        let claims = match self.tokens.verify(token) {
            Ok(claims) => claims,
            Err(err) => {
                log_rejected_token(err);
                return AuthResult::Rejected(RejectionReason::Token(err));
            }
        };

        // A panicking store must not take the request down with it
        let lookup = catch_unwind(AssertUnwindSafe(|| {
            self.credentials.find_user(&claims.subject)
        }));
        let Ok(lookup) = lookup else {
            tracing::error!("Credential store panicked during authentication");
            return AuthResult::Rejected(RejectionReason::StoreUnavailable);
        };

        match lookup {
            Ok(Some(user)) => {
                tracing::debug!(
                    username = %user.username,
                    roles = ?user.roles,
                    "Request authenticated"
                );
                AuthResult::Authenticated(Principal::new(user.username, user.roles))
            }
            Ok(None) => {
                tracing::info!(
                    username = %claims.subject,
                    "Token subject no longer exists"
                );
                AuthResult::Rejected(RejectionReason::UnknownSubject)
            }
            Err(e) => {
                tracing::error!(error = %e, "Cannot set user authentication");
                AuthResult::Rejected(RejectionReason::StoreUnavailable)
            }
        }
    }
}

fn log_rejected_token(err: TokenError) {
    match err {
        TokenError::BadSignature => {
            tracing::warn!(reason = err.code(), "Rejected token with invalid signature");
        }
        _ => {
            tracing::debug!(reason = err.code(), "Rejected token");
        }
    }
}

/// Authentication middleware function.
pub async fn authenticate(
    State(pipeline): State<Arc<AuthenticationPipeline>>,
    mut request: Request,
    next: Next,
) -> Response {
    let result = pipeline.authenticate(request.headers());
    request.extensions_mut().insert(result);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::credentials::{InMemoryCredentialStore, UserRecord};
    use crate::auth::error::CredentialStoreError;
    use crate::auth::roles::Role;
    use crate::auth::signer::Signer;
    use axum::http::HeaderValue;
    use chrono::{Duration, Utc};

    const KEY: &[u8] = b"0123456789abcdef0123456789abcdef";

    fn tokens() -> Arc<TokenService> {
        Arc::new(TokenService::new(Signer::new(KEY).unwrap()))
    }

    fn pipeline_with_alice() -> (
        AuthenticationPipeline,
        Arc<TokenService>,
        Arc<InMemoryCredentialStore>,
    ) {
        let store = Arc::new(InMemoryCredentialStore::new());
        store
            .upsert_user("alice", "unused", [Role::user(), Role::admin()])
            .unwrap();
        let tokens = tokens();
        let pipeline = AuthenticationPipeline::new(tokens.clone(), store.clone());
        (pipeline, tokens, store)
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    struct BrokenStore;

    impl CredentialStore for BrokenStore {
        fn find_user(&self, _: &str) -> Result<Option<UserRecord>, CredentialStoreError> {
            Err(CredentialStoreError::Unavailable("connection refused".to_string()))
        }
    }

    struct PanickingStore;

    impl CredentialStore for PanickingStore {
        fn find_user(&self, _: &str) -> Result<Option<UserRecord>, CredentialStoreError> {
            panic!("driver bug");
        }
    }

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
        assert_eq!(bearer_token(&headers_with("")), None);
        assert_eq!(bearer_token(&headers_with("Bearer ")), None);
        assert_eq!(bearer_token(&headers_with("Bearer    ")), None);
        assert_eq!(bearer_token(&headers_with("bearer abc")), None);
        assert_eq!(bearer_token(&headers_with("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers_with("Bearerabc")), None);
        assert_eq!(bearer_token(&headers_with("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers_with("Bearer  abc  ")), Some("abc"));
    }

    #[test]
    fn bearer_token_ignores_non_ascii_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap(),
        );
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn no_header_is_anonymous() {
        let (pipeline, _, _) = pipeline_with_alice();
        assert_eq!(pipeline.authenticate(&HeaderMap::new()), AuthResult::Anonymous);
        assert_eq!(pipeline.authenticate(&headers_with("Token abc")), AuthResult::Anonymous);
    }

    #[test]
    fn valid_token_yields_principal_with_stored_roles() {
        let (pipeline, tokens, _) = pipeline_with_alice();
        let token = tokens.issue("alice", Duration::hours(1)).unwrap();

        let result = pipeline.authenticate(&headers_with(&format!("Bearer {token}")));
        let principal = result.principal().expect("authenticated");
        assert_eq!(principal.username(), "alice");
        assert!(principal.has_role(&Role::admin()));
        assert!(principal.has_role(&Role::user()));
    }

    #[test]
    fn roles_are_read_at_request_time() {
        let (pipeline, tokens, store) = pipeline_with_alice();
        let token = tokens.issue("alice", Duration::hours(1)).unwrap();

        store.upsert_user("alice", "unused", [Role::user()]).unwrap();
        let result = pipeline.authenticate_token(&token);
        assert!(!result.principal().unwrap().has_role(&Role::admin()));
    }

    #[test]
    fn expired_token_is_rejected() {
        let (pipeline, tokens, _) = pipeline_with_alice();
        let issued = Utc::now() - Duration::hours(2);
        let token = tokens
            .issue_at("alice", Duration::hours(1), issued)
            .unwrap();

        assert_eq!(
            pipeline.authenticate_token(&token),
            AuthResult::Rejected(RejectionReason::Token(TokenError::Expired))
        );
    }

    #[test]
    fn garbage_token_is_rejected_not_panicking() {
        let (pipeline, _, _) = pipeline_with_alice();
        assert_eq!(
            pipeline.authenticate(&headers_with("Bearer not-a-token")),
            AuthResult::Rejected(RejectionReason::Token(TokenError::Malformed))
        );
    }

    #[test]
    fn forged_token_is_rejected() {
        let (pipeline, _, _) = pipeline_with_alice();
        let forger = TokenService::new(Signer::new(b"fedcba9876543210fedcba9876543210").unwrap());
        let token = forger.issue("alice", Duration::hours(1)).unwrap();

        assert_eq!(
            pipeline.authenticate_token(&token),
            AuthResult::Rejected(RejectionReason::Token(TokenError::BadSignature))
        );
    }

    #[test]
    fn deleted_user_is_rejected() {
        let (pipeline, tokens, store) = pipeline_with_alice();
        let token = tokens.issue("alice", Duration::hours(1)).unwrap();
        store.remove_user("alice").unwrap();

        assert_eq!(
            pipeline.authenticate_token(&token),
            AuthResult::Rejected(RejectionReason::UnknownSubject)
        );
    }

    #[test]
    fn store_failure_is_rejected() {
        let tokens = tokens();
        let pipeline = AuthenticationPipeline::new(tokens.clone(), Arc::new(BrokenStore));
        let token = tokens.issue("alice", Duration::hours(1)).unwrap();

        assert_eq!(
            pipeline.authenticate_token(&token),
            AuthResult::Rejected(RejectionReason::StoreUnavailable)
        );
    }

    #[test]
    fn store_panic_is_rejected() {
        let tokens = tokens();
        let pipeline = AuthenticationPipeline::new(tokens.clone(), Arc::new(PanickingStore));
        let token = tokens.issue("alice", Duration::hours(1)).unwrap();

        assert_eq!(
            pipeline.authenticate_token(&token),
            AuthResult::Rejected(RejectionReason::StoreUnavailable)
        );
    }
}
