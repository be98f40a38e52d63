// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The 401 response sent whenever a request is refused.
//!
//! Every refusal (missing token, bad token, missing role, failed sign-in)
//! renders this body so callers cannot tell the checks apart.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// Message for requests without a principal that satisfies the route.
pub const AUTHENTICATION_REQUIRED: &str =
    "Full authentication is required to access this resource";

/// Message for a failed sign-in.
pub const BAD_CREDENTIALS: &str = "Bad credentials";

/// Body of every 401 response.
#[derive(Debug, Serialize, ToSchema)]
pub struct UnauthorizedBody {
    /// Always 401
    pub status: u16,
    /// Always `UNAUTHORIZED`
    pub error: String,
    pub message: String,
    /// Path of the refused request
    pub path: String,
}

/// A refused request, rendered as a 401 JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unauthorized {
    message: &'static str,
    path: String,
}

impl Unauthorized {
    /// No valid principal, or the principal lacks every required role.
    pub fn authentication_required(path: impl Into<String>) -> Self {
        Self {
            message: AUTHENTICATION_REQUIRED,
            path: path.into(),
        }
    }

    /// Sign-in rejected.
    pub fn bad_credentials(path: impl Into<String>) -> Self {
        Self {
            message: BAD_CREDENTIALS,
            path: path.into(),
        }
    }

    pub fn body(&self) -> UnauthorizedBody {
        UnauthorizedBody {
            status: StatusCode::UNAUTHORIZED.as_u16(),
            error: "UNAUTHORIZED".to_string(),
            message: self.message.to_string(),
            path: self.path.clone(),
        }
    }
}

impl IntoResponse for Unauthorized {
    fn into_response(self) -> Response {
        tracing::info!(path = %self.path, message = self.message, "Unauthorized request");
        (StatusCode::UNAUTHORIZED, Json(self.body())).into_response()
    }
}
