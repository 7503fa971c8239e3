use std::sync::Arc;
use tracing::info;

use shared::{ActiveUserResponse, LoginRequest, RegisterRequest, UserResponse};

use crate::error::{AppError, Result};
use crate::storage::UserStore;

/// Service for the stub authentication flows.
///
/// Credentials are compared as exact, case-sensitive strings and the store
/// keeps them in plaintext; this mirrors the reference behavior and is an
/// explicit non-goal to harden.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Create an account and make it the active session user.
    pub async fn register(&self, request: RegisterRequest) -> Result<UserResponse> {
        validate_credentials(&request.email, &request.password)?;

        let user = self
            .store
            .register_user(&request.email, &request.password, request.display_name)
            .await?;

        info!("Registered account for {}", user.email);
        Ok(UserResponse {
            user,
            success_message: "Account created successfully".to_string(),
        })
    }

    /// Authenticate and make the user the active session user.
    pub async fn login(&self, request: LoginRequest) -> Result<UserResponse> {
        validate_credentials(&request.email, &request.password)?;

        let user = self.store.login_user(&request.email, &request.password).await?;

        info!("Logged in {}", user.email);
        Ok(UserResponse {
            user,
            success_message: "Logged in successfully".to_string(),
        })
    }

    /// End the active session. Always succeeds.
    pub async fn logout(&self) -> Result<()> {
        self.store.logout_user().await?;
        info!("Logged out");
        Ok(())
    }

    /// The active session user, if any.
    pub async fn current_user(&self) -> Result<ActiveUserResponse> {
        let user = self.store.get_current_user().await?;
        Ok(ActiveUserResponse { user })
    }
}

fn validate_credentials(email: &str, password: &str) -> Result<()> {
    if email.trim().is_empty() {
        return Err(AppError::Validation("Email cannot be empty".to_string()));
    }
    if password.is_empty() {
        return Err(AppError::Validation("Password cannot be empty".to_string()));
    }
    Ok(())
}
