use std::sync::Arc;
use tracing::info;

use shared::{BoardPatch, ImageSlot, ImageUploadResult};

use super::board_service::BoardService;
use crate::error::{AppError, Result};
use crate::storage::{ImageStore, UserStore};

/// Largest accepted upload: 5MB.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/jpg"];

/// Service attaching uploaded imagery to board slots.
///
/// Upload preconditions (file type, size) live here as typed checks; the
/// image store itself validates nothing.
#[derive(Clone)]
pub struct ImageService {
    store: Arc<dyn ImageStore>,
    users: Arc<dyn UserStore>,
    boards: BoardService,
}

impl ImageService {
    pub fn new(store: Arc<dyn ImageStore>, users: Arc<dyn UserStore>, boards: BoardService) -> Self {
        Self { store, users, boards }
    }

    /// Validate and store an image, then point the board's slot URL at it.
    pub async fn upload_board_image(
        &self,
        board_id: &str,
        slot: ImageSlot,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<ImageUploadResult> {
        let user = self
            .users
            .get_current_user()
            .await?
            .ok_or(AppError::NotAuthenticated)?;

        validate_upload(&data, content_type)?;

        let result = self
            .store
            .upload_image(data, content_type, &user.uid, slot)
            .await?;

        self.boards
            .update_board_details(board_id, slot_patch(slot, Some(result.url.clone())))
            .await?;

        info!("Attached {} image to board {}", slot.as_str(), board_id);
        Ok(result)
    }

    /// Clear a board's slot URL, deleting the stored file when the caller
    /// supplies the path it tracked for the previous upload.
    pub async fn remove_board_image(
        &self,
        board_id: &str,
        slot: ImageSlot,
        path: Option<&str>,
    ) -> Result<()> {
        if let Some(path) = path {
            self.store.delete_image(path).await?;
        }

        self.boards
            .update_board_details(board_id, slot_patch(slot, None))
            .await?;

        info!("Removed {} image from board {}", slot.as_str(), board_id);
        Ok(())
    }
}

fn validate_upload(data: &[u8], content_type: &str) -> Result<()> {
    if !ALLOWED_IMAGE_TYPES.contains(&content_type) {
        return Err(AppError::UploadFailed(
            "Only JPG, JPEG and PNG files are allowed".to_string(),
        ));
    }
    if data.is_empty() {
        return Err(AppError::UploadFailed("File is empty".to_string()));
    }
    if data.len() > MAX_IMAGE_BYTES {
        return Err(AppError::UploadFailed(
            "File size exceeds 5MB limit".to_string(),
        ));
    }
    Ok(())
}

fn slot_patch(slot: ImageSlot, url: Option<String>) -> BoardPatch {
    match slot {
        ImageSlot::Header => BoardPatch {
            header_image_url: Some(url),
            ..BoardPatch::default()
        },
        ImageSlot::Footer => BoardPatch {
            footer_image_url: Some(url),
            ..BoardPatch::default()
        },
        ImageSlot::Center => BoardPatch {
            center_image_url: Some(url),
            ..BoardPatch::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::json::{
        JsonBoardRepository, JsonConnection, JsonImageRepository, JsonUserRepository,
    };
    use shared::{ColorScheme, CreateBoardRequest};
    use std::time::Duration;
    use tempfile::TempDir;

    async fn setup_test() -> (ImageService, BoardService, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let connection =
            Arc::new(JsonConnection::with_latency(temp_dir.path(), Duration::ZERO).unwrap());
        let users = Arc::new(JsonUserRepository::new(connection.clone()));
        users
            .register_user("u1@example.com", "pw", None)
            .await
            .expect("Failed to register test user");

        let boards = BoardService::new(
            Arc::new(JsonBoardRepository::new(connection.clone())),
            users.clone(),
        );
        let images = ImageService::new(
            Arc::new(JsonImageRepository::new(connection)),
            users,
            boards.clone(),
        );
        (images, boards, temp_dir)
    }

    async fn create_board(boards: &BoardService) -> String {
        boards
            .create_new_board(CreateBoardRequest {
                title: "Trivia".to_string(),
                description: String::new(),
                color_scheme: ColorScheme::Blue,
            })
            .await
            .expect("Failed to create board")
            .id
    }

    #[tokio::test]
    async fn test_upload_attaches_slot_url() {
        let (images, boards, _temp_dir) = setup_test().await;
        let board_id = create_board(&boards).await;

        let result = images
            .upload_board_image(&board_id, ImageSlot::Header, vec![1, 2, 3], "image/png")
            .await
            .expect("Failed to upload");

        let board = boards.find_board(&board_id).await.unwrap().unwrap();
        assert_eq!(board.header_image_url.as_deref(), Some(result.url.as_str()));
        assert!(board.footer_image_url.is_none());
        assert!(board.center_image_url.is_none());
    }

    #[tokio::test]
    async fn test_upload_validates_type_and_size() {
        let (images, boards, _temp_dir) = setup_test().await;
        let board_id = create_board(&boards).await;

        let result = images
            .upload_board_image(&board_id, ImageSlot::Header, vec![1], "image/gif")
            .await;
        assert!(matches!(result, Err(AppError::UploadFailed(_))));

        let result = images
            .upload_board_image(&board_id, ImageSlot::Header, Vec::new(), "image/png")
            .await;
        assert!(matches!(result, Err(AppError::UploadFailed(_))));

        let oversized = vec![0u8; MAX_IMAGE_BYTES + 1];
        let result = images
            .upload_board_image(&board_id, ImageSlot::Header, oversized, "image/png")
            .await;
        assert!(matches!(result, Err(AppError::UploadFailed(_))));

        // Failed uploads never touch the board
        let board = boards.find_board(&board_id).await.unwrap().unwrap();
        assert!(board.header_image_url.is_none());
    }

    #[tokio::test]
    async fn test_upload_requires_authentication() {
        let (images, boards, _temp_dir) = setup_test().await;
        let board_id = create_board(&boards).await;
        images.users.logout_user().await.unwrap();

        let result = images
            .upload_board_image(&board_id, ImageSlot::Center, vec![1], "image/png")
            .await;
        assert!(matches!(result, Err(AppError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn test_remove_clears_slot_and_deletes_file() {
        let (images, boards, _temp_dir) = setup_test().await;
        let board_id = create_board(&boards).await;

        let result = images
            .upload_board_image(&board_id, ImageSlot::Center, vec![1, 2], "image/jpeg")
            .await
            .unwrap();

        images
            .remove_board_image(&board_id, ImageSlot::Center, Some(&result.path))
            .await
            .expect("Failed to remove");

        let board = boards.find_board(&board_id).await.unwrap().unwrap();
        assert!(board.center_image_url.is_none());

        // Removal without a tracked path still clears the slot
        images
            .remove_board_image(&board_id, ImageSlot::Center, None)
            .await
            .expect("Pathless removal failed");
    }
}
