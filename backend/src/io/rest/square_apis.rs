//! # REST API for Grid Editing
//!
//! Endpoints for replacing, moving, randomizing, and resetting squares.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::info;

use shared::{MoveSquareRequest, UpdateSquareContentRequest, UpdateSquaresRequest};

use super::error_response;
use crate::AppState;

/// Replace the full 25-square sequence
pub async fn update_squares(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
    Json(request): Json<UpdateSquaresRequest>,
) -> impl IntoResponse {
    info!(
        "PUT /api/boards/{}/squares - {} squares",
        board_id,
        request.squares.len()
    );

    match state
        .board_service
        .update_squares(&board_id, request.squares)
        .await
    {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => error_response("Update squares", e),
    }
}

/// Move one square to another square's position
pub async fn move_square(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
    Json(request): Json<MoveSquareRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/boards/{}/squares/move - {} -> {}",
        board_id, request.source_id, request.dest_id
    );

    match state
        .board_service
        .move_square(&board_id, &request.source_id, &request.dest_id)
        .await
    {
        Ok(moved) => (StatusCode::OK, Json(serde_json::json!({ "moved": moved }))).into_response(),
        Err(e) => error_response("Move square", e),
    }
}

/// Shuffle the non-center squares
pub async fn randomize_squares(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/boards/{}/squares/randomize", board_id);

    match state.board_service.randomize_squares(&board_id).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => error_response("Randomize squares", e),
    }
}

/// Restore the squares captured when the board was loaded
pub async fn reset_squares(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/boards/{}/squares/reset", board_id);

    match state.board_service.reset_squares(&board_id).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => error_response("Reset squares", e),
    }
}

/// Replace one square's text
pub async fn update_square_content(
    State(state): State<AppState>,
    Path((board_id, square_id)): Path<(String, String)>,
    Json(request): Json<UpdateSquareContentRequest>,
) -> impl IntoResponse {
    info!("PUT /api/boards/{}/squares/{}", board_id, square_id);

    match state
        .board_service
        .update_square_content(&board_id, &square_id, &request.content)
        .await
    {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => error_response("Update square content", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{register_test_user, test_app_state};
    use shared::{ColorScheme, CreateBoardRequest, CENTER_INDEX};

    async fn state_with_board() -> (crate::AppState, shared::Board, tempfile::TempDir) {
        let (state, temp_dir) = test_app_state().await;
        register_test_user(&state).await;
        let board = state
            .board_service
            .create_new_board(CreateBoardRequest {
                title: "Trivia".to_string(),
                description: String::new(),
                color_scheme: ColorScheme::Blue,
            })
            .await
            .unwrap();
        (state, board, temp_dir)
    }

    #[tokio::test]
    async fn test_move_square_handler_reports_rejection() {
        let (state, board, _temp_dir) = state_with_board().await;

        let request = MoveSquareRequest {
            source_id: board.squares[CENTER_INDEX].id.clone(),
            dest_id: board.squares[0].id.clone(),
        };
        let response = move_square(State(state), Path(board.id.clone()), Json(request))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["moved"], false);
    }

    #[tokio::test]
    async fn test_randomize_unknown_board_is_not_found() {
        let (state, _board, _temp_dir) = state_with_board().await;

        let response = randomize_squares(State(state), Path("missing".to_string()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_square_content_cap_is_bad_request() {
        let (state, board, _temp_dir) = state_with_board().await;

        let request = UpdateSquareContentRequest {
            content: "x".repeat(51),
        };
        let response = update_square_content(
            State(state),
            Path((board.id.clone(), board.squares[0].id.clone())),
            Json(request),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
