// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Role-gated greeting endpoints.
//!
//! The handlers do no checks of their own; their policies are attached in
//! [`super::router`].

use crate::auth::Auth;

#[utoipa::path(
    get,
    path = "/guys",
    tag = "Greetings",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Greeting for USER or ADMIN", body = String),
        (status = 401, description = "Unauthorized"),
    )
)]
pub async fn hello_guys(Auth(principal): Auth) -> &'static str {
    tracing::info!(username = principal.username(), "guys accessed this method");
    "Hello, World!"
}

#[utoipa::path(
    get,
    path = "/user",
    tag = "Greetings",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Greeting for USER", body = String),
        (status = 401, description = "Unauthorized"),
    )
)]
pub async fn hello_user(Auth(principal): Auth) -> &'static str {
    tracing::info!(username = principal.username(), "authorized user accessed this method");
    "Hello, User!"
}

#[utoipa::path(
    get,
    path = "/admin",
    tag = "Greetings",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Greeting for ADMIN", body = String),
        (status = 401, description = "Unauthorized"),
    )
)]
pub async fn hello_admin(Auth(principal): Auth) -> &'static str {
    tracing::info!(username = principal.username(), "admin accessed this method");
    "Hello, Admin!"
}
