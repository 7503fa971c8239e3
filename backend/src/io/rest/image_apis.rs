//! # REST API for Board Imagery
//!
//! Endpoints for uploading and removing header/footer/center images. The
//! upload body is the raw file; its declared type travels in the
//! `Content-Type` header.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::info;

use shared::ImageSlot;

use super::error_response;
use crate::error::AppError;
use crate::AppState;

/// Query parameters for image removal
#[derive(Debug, Deserialize)]
pub struct RemoveImageQuery {
    /// Storage path of the previous upload, when the client tracked one
    pub path: Option<String>,
}

fn parse_slot(slot: &str) -> Result<ImageSlot, AppError> {
    slot.parse::<ImageSlot>().map_err(AppError::Validation)
}

/// Upload an image into a board slot
pub async fn upload_image(
    State(state): State<AppState>,
    Path((board_id, slot)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    info!(
        "POST /api/boards/{}/images/{} - {} bytes",
        board_id,
        slot,
        body.len()
    );

    let slot = match parse_slot(&slot) {
        Ok(slot) => slot,
        Err(e) => return error_response("Upload image", e),
    };

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    match state
        .image_service
        .upload_board_image(&board_id, slot, body.to_vec(), &content_type)
        .await
    {
        Ok(result) => (StatusCode::CREATED, Json(result)).into_response(),
        Err(e) => error_response("Upload image", e),
    }
}

/// Remove the image from a board slot
pub async fn remove_image(
    State(state): State<AppState>,
    Path((board_id, slot)): Path<(String, String)>,
    Query(query): Query<RemoveImageQuery>,
) -> impl IntoResponse {
    info!("DELETE /api/boards/{}/images/{}", board_id, slot);

    let slot = match parse_slot(&slot) {
        Ok(slot) => slot,
        Err(e) => return error_response("Remove image", e),
    };

    match state
        .image_service
        .remove_board_image(&board_id, slot, query.path.as_deref())
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("Remove image", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{register_test_user, test_app_state};
    use shared::{ColorScheme, CreateBoardRequest};

    #[tokio::test]
    async fn test_upload_rejects_unknown_slot_and_bad_type() {
        let (state, _temp_dir) = test_app_state().await;
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

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "image/png".parse().unwrap());

        let response = upload_image(
            State(state.clone()),
            Path((board.id.clone(), "banner".to_string())),
            headers.clone(),
            Bytes::from_static(&[1, 2]),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let mut gif_headers = HeaderMap::new();
        gif_headers.insert(header::CONTENT_TYPE, "image/gif".parse().unwrap());
        let response = upload_image(
            State(state.clone()),
            Path((board.id.clone(), "header".to_string())),
            gif_headers,
            Bytes::from_static(&[1, 2]),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = upload_image(
            State(state),
            Path((board.id, "header".to_string())),
            headers,
            Bytes::from_static(&[1, 2]),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
