// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::Uri,
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{
        middleware::authenticate, protect, unauthorized::UnauthorizedBody, OptionalAuth, Role,
        RoutePolicy, Unauthorized,
    },
    error::ApiError,
    state::AppState,
};

pub mod greetings;
pub mod health;
pub mod sign_in;
pub mod users;

/// Build the application router.
///
/// Every route declares its policy here. Layers run outermost first:
/// request id, trace, CORS, authentication, then the per-route guard.
pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/signIn", protect(post(sign_in::sign_in), RoutePolicy::Public))
        .route("/health/live", protect(get(health::liveness), RoutePolicy::Public))
        .route(
            "/guys",
            protect(
                get(greetings::hello_guys),
                RoutePolicy::any_of([Role::user(), Role::admin()]),
            ),
        )
        .route(
            "/user",
            protect(get(greetings::hello_user), RoutePolicy::any_of([Role::user()])),
        )
        .route(
            "/admin",
            protect(get(greetings::hello_admin), RoutePolicy::any_of([Role::admin()])),
        )
        .route(
            "/me",
            protect(get(users::get_current_user), RoutePolicy::Authenticated),
        )
        .fallback(fallback)
        .with_state(state.clone());

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(from_fn_with_state(state.pipeline.clone(), authenticate))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Unregistered routes require authentication: anonymous callers get 401,
/// authenticated callers get 404.
async fn fallback(OptionalAuth(principal): OptionalAuth, uri: Uri) -> Response {
    match principal {
        Some(_) => ApiError::not_found("Resource not found").into_response(),
        None => Unauthorized::authentication_required(uri.path()).into_response(),
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        sign_in::sign_in,
        greetings::hello_guys,
        greetings::hello_user,
        greetings::hello_admin,
        users::get_current_user,
        health::liveness
    ),
    components(
        schemas(
            sign_in::LoginRequest,
            sign_in::LoginResponse,
            users::UserMeResponse,
            health::HealthResponse,
            UnauthorizedBody,
            Role
        )
    ),
    tags(
        (name = "Auth", description = "Sign-in and token issuance"),
        (name = "Greetings", description = "Role-gated greetings"),
        (name = "Users", description = "Current principal"),
        (name = "Health", description = "Liveness probe")
    )
)]
struct ApiDoc;
