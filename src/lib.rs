// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Auth Server - Stateless bearer-token gate
//!
//! Users sign in once with a username and password and receive an
//! HMAC-signed token. Every later request carries the token; the server
//! verifies it, resolves the caller's roles, and checks them against the
//! policy the route was registered with. No session state is kept.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers and router (Axum)
//! - `auth` - Token signing, authentication pipeline, route guards, sign-in
//! - `config` - Environment configuration
//! - `state` - Shared application state

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod state;
