//! # REST API for Board Management
//!
//! Endpoints for listing, creating, loading, updating, duplicating,
//! archiving, deleting, and sharing boards, plus the auto-save flow.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::info;

use shared::{
    ArchiveBoardRequest, BoardListResponse, BoardResponse, CreateBoardRequest, ShareLinkResponse,
    UpdateBoardRequest,
};

use super::error_response;
use crate::error::AppError;
use crate::AppState;

/// Query parameters for the board list endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardListQuery {
    #[serde(default)]
    pub include_archived: bool,
}

/// List the active user's boards
pub async fn list_boards(
    State(state): State<AppState>,
    Query(query): Query<BoardListQuery>,
) -> impl IntoResponse {
    info!("GET /api/boards - query: {:?}", query);

    let user = match state.auth_service.current_user().await {
        Ok(response) => match response.user {
            Some(user) => user,
            None => return error_response("List boards", AppError::NotAuthenticated),
        },
        Err(e) => return error_response("List boards", e),
    };

    match state
        .board_service
        .load_boards(&user.uid, query.include_archived)
        .await
    {
        Ok(boards) => (StatusCode::OK, Json(BoardListResponse { boards })).into_response(),
        Err(e) => error_response("List boards", e),
    }
}

/// Create a board for the active user
pub async fn create_board(
    State(state): State<AppState>,
    Json(request): Json<CreateBoardRequest>,
) -> impl IntoResponse {
    info!("POST /api/boards - title: {}", request.title);

    match state.board_service.create_new_board(request).await {
        Ok(board) => (
            StatusCode::CREATED,
            Json(BoardResponse {
                board,
                success_message: "Board created successfully".to_string(),
            }),
        )
            .into_response(),
        Err(e) => error_response("Create board", e),
    }
}

/// Load a board as the current editing selection
pub async fn get_board(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/boards/{}", board_id);

    match state.board_service.load_board(&board_id).await {
        Ok(board) => (StatusCode::OK, Json(board)).into_response(),
        Err(e) => error_response("Load board", e),
    }
}

/// Apply a detail update immediately
pub async fn update_board(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
    Json(request): Json<UpdateBoardRequest>,
) -> impl IntoResponse {
    info!("PUT /api/boards/{}", board_id);

    if let Err(e) = state
        .board_service
        .update_board_details(&board_id, request.into_patch())
        .await
    {
        return error_response("Update board", e);
    }

    board_response(&state, &board_id, "Board updated successfully").await
}

/// Delete a board
pub async fn delete_board(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/boards/{}", board_id);

    match state.board_service.delete_user_board(&board_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("Delete board", e),
    }
}

/// Duplicate an already-loaded board
pub async fn duplicate_board(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/boards/{}/duplicate", board_id);

    match state.board_service.duplicate_board(&board_id).await {
        Ok(board) => (
            StatusCode::CREATED,
            Json(BoardResponse {
                board,
                success_message: "Board duplicated successfully".to_string(),
            }),
        )
            .into_response(),
        Err(e) => error_response("Duplicate board", e),
    }
}

/// Archive or unarchive a board
pub async fn archive_board(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
    Json(request): Json<ArchiveBoardRequest>,
) -> impl IntoResponse {
    info!("POST /api/boards/{}/archive - {:?}", board_id, request);

    if let Err(e) = state
        .board_service
        .archive_board(&board_id, request.archive)
        .await
    {
        return error_response("Archive board", e);
    }

    let message = if request.archive {
        "Board archived successfully"
    } else {
        "Board unarchived successfully"
    };
    board_response(&state, &board_id, message).await
}

/// Record an edit for the debounced auto-save cycle
pub async fn record_edit(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
    Json(request): Json<UpdateBoardRequest>,
) -> impl IntoResponse {
    info!("POST /api/boards/{}/edits", board_id);

    state.autosave.record_edit(&board_id, request.into_patch());
    StatusCode::ACCEPTED.into_response()
}

/// Flush pending auto-save edits now (explicit save action)
pub async fn save_board(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/boards/{}/save", board_id);

    match state.autosave.save_now(&board_id).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => error_response("Save board", e),
    }
}

/// Build the public, read-only share link for a board
pub async fn share_link(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/boards/{}/share", board_id);

    match state.board_service.find_board(&board_id).await {
        Ok(Some(board)) => {
            let share_url = format!("{}/board/view/{}", state.public_origin, board.id);
            (StatusCode::OK, Json(ShareLinkResponse { share_url })).into_response()
        }
        Ok(None) => error_response(
            "Share board",
            AppError::NotFound("board", board_id.clone()),
        ),
        Err(e) => error_response("Share board", e),
    }
}

/// Fetch the board's post-operation state for a response body.
async fn board_response(state: &AppState, board_id: &str, message: &str) -> axum::response::Response {
    match state.board_service.find_board(board_id).await {
        Ok(Some(board)) => (
            StatusCode::OK,
            Json(BoardResponse {
                board,
                success_message: message.to_string(),
            }),
        )
            .into_response(),
        Ok(None) => error_response(
            "Read back board",
            AppError::NotFound("board", board_id.to_string()),
        ),
        Err(e) => error_response("Read back board", e),
    }
}
