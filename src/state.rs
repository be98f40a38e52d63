// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use chrono::Duration;

use crate::auth::{
    AuthenticationPipeline, CredentialStore, PasswordHasher, SignInExchange, TokenService,
};

/// Shared application state. Everything in it is immutable or internally
/// synchronized, so handlers never coordinate with each other.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<AuthenticationPipeline>,
    pub sign_in: Arc<SignInExchange>,
}

impl AppState {
    pub fn new(
        tokens: TokenService,
        credentials: Arc<dyn CredentialStore>,
        hasher: Arc<dyn PasswordHasher>,
        token_lifetime: Duration,
    ) -> Self {
        let tokens = Arc::new(tokens);
        Self {
            pipeline: Arc::new(AuthenticationPipeline::new(
                tokens.clone(),
                credentials.clone(),
            )),
            sign_in: Arc::new(SignInExchange::new(
                credentials,
                hasher,
                tokens,
                token_lifetime,
            )),
        }
    }
}
