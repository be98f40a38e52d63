// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::{Auth, Principal, Role};

/// Response for GET /me
#[derive(Debug, Serialize, ToSchema)]
pub struct UserMeResponse {
    pub username: String,
    /// Roles as currently stored, not as of sign-in
    pub roles: Vec<Role>,
}

impl From<Principal> for UserMeResponse {
    fn from(principal: Principal) -> Self {
        Self {
            username: principal.username().to_string(),
            roles: principal.roles().iter().cloned().collect(),
        }
    }
}

/// Get the current authenticated user's information.
///
/// This endpoint returns the identity and roles of the currently authenticated user.
#[utoipa::path(
    get,
    path = "/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User information", body = UserMeResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn get_current_user(Auth(principal): Auth) -> Json<UserMeResponse> {
    Json(principal.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_me_response_from_principal() {
        let principal = Principal::new("alice", [Role::user(), Role::admin()]);

        let response: UserMeResponse = principal.into();
        assert_eq!(response.username, "alice");
        assert_eq!(response.roles, vec![Role::admin(), Role::user()]);
    }
}
