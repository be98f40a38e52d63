// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults, and the startup configuration they
//! are parsed into. Configuration is read once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET` | Base64 token signing key (at least 32 bytes decoded) | Required |
//! | `JWT_EXPIRATION_MS` | Token lifetime in milliseconds (1000 to one year) | `3600000` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `SEED_DEMO_USERS` | Create the `user` and `admin` demo accounts | `true` |
//! | `SEED_USER_PASSWORD` | Password for the `user` demo account | `userPassword` |
//! | `SEED_ADMIN_PASSWORD` | Password for the `admin` demo account | `adminPassword` |
//! | `BCRYPT_COST` | bcrypt cost for seeded hashes | `4` (debug), `12` (release) |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use chrono::Duration;
use thiserror::Error;

/// Base64-encoded HMAC signing key.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Token lifetime in milliseconds.
pub const JWT_EXPIRATION_MS_ENV: &str = "JWT_EXPIRATION_MS";
pub const DEFAULT_JWT_EXPIRATION_MS: i64 = 3_600_000;
/// Token timestamps have second resolution, so shorter lifetimes are refused.
pub const MIN_JWT_EXPIRATION_MS: i64 = 1_000;
/// One year.
pub const MAX_JWT_EXPIRATION_MS: i64 = 31_536_000_000;

pub const HOST_ENV: &str = "HOST";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const PORT_ENV: &str = "PORT";
pub const DEFAULT_PORT: u16 = 8080;

pub const SEED_DEMO_USERS_ENV: &str = "SEED_DEMO_USERS";
pub const SEED_USER_PASSWORD_ENV: &str = "SEED_USER_PASSWORD";
pub const DEFAULT_USER_PASSWORD: &str = "userPassword";
pub const SEED_ADMIN_PASSWORD_ENV: &str = "SEED_ADMIN_PASSWORD";
pub const DEFAULT_ADMIN_PASSWORD: &str = "adminPassword";

pub const BCRYPT_COST_ENV: &str = "BCRYPT_COST";

/// Logging format (`json` or `pretty`).
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Configuration could not be loaded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Demo accounts created at startup.
#[derive(Clone)]
pub struct SeedUsers {
    pub user_password: String,
    pub admin_password: String,
}

impl std::fmt::Debug for SeedUsers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedUsers").finish_non_exhaustive()
    }
}

/// Startup configuration.
#[derive(Clone)]
pub struct AppConfig {
    /// Base64 key material, decoded by [`Signer::from_base64`](crate::auth::Signer::from_base64)
    pub jwt_secret: String,
    pub token_lifetime: Duration,
    pub host: String,
    pub port: u16,
    /// `None` when seeding is disabled
    pub seed_users: Option<SeedUsers>,
    pub bcrypt_cost: u32,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_lifetime", &self.token_lifetime)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("seed_users", &self.seed_users.is_some())
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup(JWT_SECRET_ENV)
            .filter(|secret| !secret.trim().is_empty())
            .ok_or(ConfigError::Missing(JWT_SECRET_ENV))?;

        let expiration_ms = match lookup(JWT_EXPIRATION_MS_ENV) {
            Some(raw) => raw.trim().parse::<i64>().map_err(|e| ConfigError::Invalid {
                name: JWT_EXPIRATION_MS_ENV,
                reason: e.to_string(),
            })?,
            None => DEFAULT_JWT_EXPIRATION_MS,
        };
        if !(MIN_JWT_EXPIRATION_MS..=MAX_JWT_EXPIRATION_MS).contains(&expiration_ms) {
            return Err(ConfigError::Invalid {
                name: JWT_EXPIRATION_MS_ENV,
                reason: format!(
                    "must be between {MIN_JWT_EXPIRATION_MS} and {MAX_JWT_EXPIRATION_MS}"
                ),
            });
        }

        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup(PORT_ENV) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: PORT_ENV,
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let seed_enabled = match lookup(SEED_DEMO_USERS_ENV) {
            Some(raw) => parse_bool(&raw).ok_or_else(|| ConfigError::Invalid {
                name: SEED_DEMO_USERS_ENV,
                reason: format!("expected true or false, got {raw:?}"),
            })?,
            None => true,
        };
        let seed_users = seed_enabled.then(|| SeedUsers {
            user_password: lookup(SEED_USER_PASSWORD_ENV)
                .unwrap_or_else(|| DEFAULT_USER_PASSWORD.to_string()),
            admin_password: lookup(SEED_ADMIN_PASSWORD_ENV)
                .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string()),
        });

        let bcrypt_cost = match lookup(BCRYPT_COST_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|cost| (4..=31).contains(cost))
                .ok_or_else(|| ConfigError::Invalid {
                    name: BCRYPT_COST_ENV,
                    reason: format!("expected an integer between 4 and 31, got {raw:?}"),
                })?,
            None => default_bcrypt_cost(),
        };

        Ok(Self {
            jwt_secret,
            token_lifetime: Duration::milliseconds(expiration_ms),
            host,
            port,
            seed_users,
            bcrypt_cost,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Lower cost in debug builds keeps local development fast.
fn default_bcrypt_cost() -> u32 {
    if cfg!(debug_assertions) {
        4
    } else {
        bcrypt::DEFAULT_COST
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
