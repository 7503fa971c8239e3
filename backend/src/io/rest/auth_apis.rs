//! # REST API for Authentication
//!
//! Endpoints for registering, logging in and out, and reading the active
//! session user.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::info;

use shared::{LoginRequest, RegisterRequest};

use super::error_response;
use crate::AppState;

/// Register a new account
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> impl IntoResponse {
    info!("POST /api/auth/register - email: {}", request.email);

    match state.auth_service.register(request).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => error_response("Register", e),
    }
}

/// Log into an existing account
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> impl IntoResponse {
    info!("POST /api/auth/login - email: {}", request.email);

    match state.auth_service.login(request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response("Login", e),
    }
}

/// End the active session
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/auth/logout");

    match state.auth_service.logout().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("Logout", e),
    }
}

/// Read the active session user
pub async fn current_user(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/auth/me");

    match state.auth_service.current_user().await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response("Read session", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app_state;

    #[tokio::test]
    async fn test_register_and_me_handlers() {
        let (state, _temp_dir) = test_app_state().await;

        let request = RegisterRequest {
            email: "erin@example.com".to_string(),
            password: "pw".to_string(),
            display_name: None,
        };
        let response = register(State(state.clone()), Json(request)).await.into_response();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = current_user(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_with_bad_credentials_is_unauthorized() {
        let (state, _temp_dir) = test_app_state().await;

        let request = LoginRequest {
            email: "nobody@example.com".to_string(),
            password: "pw".to_string(),
        };
        let response = login(State(state), Json(request)).await.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
