// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use relational_auth_server::{
    api::router,
    auth::{
        credentials::seed_demo_users, BcryptHasher, InMemoryCredentialStore, Signer, TokenService,
    },
    config::{AppConfig, DEFAULT_LOG_FILTER, LOG_FORMAT_ENV},
    state::AppState,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    // A missing or weak key is fatal
    let signer = match Signer::from_base64(&config.jwt_secret) {
        Ok(signer) => signer,
        Err(e) => {
            tracing::error!(error = %e, "Cannot load token signing key");
            std::process::exit(1);
        }
    };

    let hasher = Arc::new(BcryptHasher::new(config.bcrypt_cost));
    let store = Arc::new(InMemoryCredentialStore::new());

    if let Some(seed) = &config.seed_users {
        if let Err(e) = seed_demo_users(
            &store,
            hasher.as_ref(),
            &seed.user_password,
            &seed.admin_password,
        ) {
            tracing::error!(error = %e, "Failed to seed demo users");
            std::process::exit(1);
        }
        tracing::info!(users = store.len(), "Seeded demo users");
    }

    let state = AppState::new(
        TokenService::new(signer),
        store,
        hasher,
        config.token_lifetime,
    );
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .expect("Failed to bind listen address");
    let addr = listener
        .local_addr()
        .expect("Failed to read bound address");

    tracing::info!(
        %addr,
        token_lifetime_secs = config.token_lifetime.num_seconds(),
        "Relational Auth server listening (docs at /docs)"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
