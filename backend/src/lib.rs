//! # bingo-maker backend
//!
//! All non-UI logic for the bingo board maker.
//!
//! The backend follows a layered architecture:
//! ```text
//! IO Layer (REST API, handlers)
//!     |
//! Domain Layer (grid rules, services, auto-save)
//!     |
//! Storage Layer (JSON-file stub store)
//! ```
//!
//! The storage layer is a local stub standing in for a real backend; any
//! store implementing the traits in [`storage::traits`] with the same
//! success/failure semantics works without touching the layers above.

pub mod domain;
pub mod error;
pub mod io;
pub mod storage;

use std::path::Path;
use std::sync::Arc;

use axum::{
    http::Method,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::domain::{AuthService, AutoSaveScheduler, BoardService, ImageService};
use crate::storage::json::{
    JsonBoardRepository, JsonConnection, JsonImageRepository, JsonUserRepository,
};
use crate::storage::{BoardStore, ImageStore, UserStore};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub board_service: BoardService,
    pub image_service: ImageService,
    pub autosave: AutoSaveScheduler,
    /// Origin used to build public share links
    pub public_origin: String,
}

/// Initialize the backend with all required services over a data directory.
pub async fn initialize_backend(
    data_dir: impl AsRef<Path>,
    public_origin: String,
) -> anyhow::Result<AppState> {
    info!("Setting up store");
    let connection = Arc::new(JsonConnection::new(data_dir)?);
    Ok(build_app_state(connection, public_origin))
}

/// Wire the services over an existing connection (tests pass one with zero
/// latency).
pub fn build_app_state(connection: Arc<JsonConnection>, public_origin: String) -> AppState {
    info!("Setting up domain services");
    let users: Arc<dyn UserStore> = Arc::new(JsonUserRepository::new(connection.clone()));
    let boards: Arc<dyn BoardStore> = Arc::new(JsonBoardRepository::new(connection.clone()));
    let images: Arc<dyn ImageStore> = Arc::new(JsonImageRepository::new(connection));

    let board_service = BoardService::new(boards, users.clone());
    let auth_service = AuthService::new(users.clone());
    let image_service = ImageService::new(images, users, board_service.clone());
    let autosave = AutoSaveScheduler::new(board_service.clone());

    AppState {
        auth_service,
        board_service,
        image_service,
        autosave,
        public_origin,
    }
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    // CORS setup to allow a browser frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/auth/register", post(io::rest::auth_apis::register))
        .route("/auth/login", post(io::rest::auth_apis::login))
        .route("/auth/logout", post(io::rest::auth_apis::logout))
        .route("/auth/me", get(io::rest::auth_apis::current_user))
        .route(
            "/boards",
            get(io::rest::board_apis::list_boards).post(io::rest::board_apis::create_board),
        )
        .route(
            "/boards/:id",
            get(io::rest::board_apis::get_board)
                .put(io::rest::board_apis::update_board)
                .delete(io::rest::board_apis::delete_board),
        )
        .route(
            "/boards/:id/duplicate",
            post(io::rest::board_apis::duplicate_board),
        )
        .route(
            "/boards/:id/archive",
            post(io::rest::board_apis::archive_board),
        )
        .route("/boards/:id/edits", post(io::rest::board_apis::record_edit))
        .route("/boards/:id/save", post(io::rest::board_apis::save_board))
        .route("/boards/:id/share", get(io::rest::board_apis::share_link))
        .route(
            "/boards/:id/squares",
            put(io::rest::square_apis::update_squares),
        )
        .route(
            "/boards/:id/squares/move",
            post(io::rest::square_apis::move_square),
        )
        .route(
            "/boards/:id/squares/randomize",
            post(io::rest::square_apis::randomize_squares),
        )
        .route(
            "/boards/:id/squares/reset",
            post(io::rest::square_apis::reset_squares),
        )
        .route(
            "/boards/:id/squares/:square_id",
            put(io::rest::square_apis::update_square_content),
        )
        .route(
            "/boards/:id/images/:slot",
            post(io::rest::image_apis::upload_image).delete(io::rest::image_apis::remove_image),
        );

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    /// AppState over a temp directory with zero simulated latency.
    pub async fn test_app_state() -> (AppState, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let connection =
            Arc::new(JsonConnection::with_latency(temp_dir.path(), Duration::ZERO).unwrap());
        let state = build_app_state(connection, "http://localhost:3000".to_string());
        (state, temp_dir)
    }

    /// Register (and thereby activate) a throwaway user.
    pub async fn register_test_user(state: &AppState) {
        state
            .auth_service
            .register(shared::RegisterRequest {
                email: "u1@example.com".to_string(),
                password: "pw".to_string(),
                display_name: None,
            })
            .await
            .expect("Failed to register test user");
    }
}
