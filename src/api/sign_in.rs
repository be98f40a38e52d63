// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Sign-in endpoint.

use axum::{
    extract::State,
    http::Uri,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{unauthorized::UnauthorizedBody, Credentials, Role, SignInResult, Unauthorized};
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /signIn
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl From<LoginRequest> for Credentials {
    fn from(request: LoginRequest) -> Self {
        Credentials::new(request.username, request.password)
    }
}

/// Response for POST /signIn
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer token for the `Authorization` header
    pub jwt_token: String,
    pub username: String,
    pub roles: Vec<Role>,
}

impl From<SignInResult> for LoginResponse {
    fn from(result: SignInResult) -> Self {
        Self {
            jwt_token: result.token,
            username: result.username,
            roles: result.roles,
        }
    }
}

/// Exchange a username and password for a bearer token.
///
/// Unknown users and wrong passwords get the same response.
#[utoipa::path(
    post,
    path = "/signIn",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = LoginResponse),
        (status = 401, description = "Bad credentials", body = UnauthorizedBody),
    )
)]
pub async fn sign_in(
    State(state): State<AppState>,
    uri: Uri,
    Json(request): Json<LoginRequest>,
) -> Response {
    let credentials = Credentials::from(request);
    let exchange = state.sign_in.clone();

    // bcrypt is CPU-bound
    let outcome = tokio::task::spawn_blocking(move || exchange.sign_in(&credentials)).await;

    match outcome {
        Ok(Ok(result)) => Json(LoginResponse::from(result)).into_response(),
        Ok(Err(_)) => Unauthorized::bad_credentials(uri.path()).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Sign-in task failed");
            ApiError::internal("Internal server error").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_uses_camel_case() {
        let response = LoginResponse::from(SignInResult {
            token: "t".to_string(),
            username: "admin".to_string(),
            roles: vec![Role::admin()],
        });
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "jwtToken": "t", "username": "admin", "roles": ["ADMIN"] })
        );
    }

    #[test]
    fn login_request_debug_redacts_password() {
        let request: LoginRequest =
            serde_json::from_str(r#"{"username":"admin","password":"hunter2"}"#).unwrap();
        assert!(!format!("{request:?}").contains("hunter2"));
    }
}
