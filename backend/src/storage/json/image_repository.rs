use async_trait::async_trait;
use base64::Engine;
use std::fs;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use shared::{ImageSlot, ImageUploadResult};

use super::connection::JsonConnection;
use crate::error::Result;
use crate::storage::traits::ImageStore;

/// Filesystem implementation of the simulated upload store.
///
/// Files land under `uploads/users/<uid>/boards/<slot>_<uuid>.<ext>`; the
/// returned URL is the raw encoded file content (a data URL, directly
/// usable as an image source). A real backend would return a CDN URL here.
#[derive(Clone)]
pub struct JsonImageRepository {
    connection: Arc<JsonConnection>,
}

impl JsonImageRepository {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self { connection }
    }
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        _ => "bin",
    }
}

#[async_trait]
impl ImageStore for JsonImageRepository {
    async fn upload_image(
        &self,
        data: Vec<u8>,
        content_type: &str,
        user_id: &str,
        slot: ImageSlot,
    ) -> Result<ImageUploadResult> {
        self.connection.simulate_latency().await;

        let path = format!(
            "users/{}/boards/{}_{}.{}",
            user_id,
            slot.as_str(),
            Uuid::new_v4(),
            extension_for(content_type)
        );

        let target = self.connection.uploads_directory().join(&path);
        JsonConnection::atomic_write(&target, &data)?;

        let url = format!(
            "data:{};base64,{}",
            content_type,
            base64::engine::general_purpose::STANDARD.encode(&data)
        );

        info!(
            "Stored {} image for user {} at {} ({} bytes)",
            slot.as_str(),
            user_id,
            path,
            data.len()
        );
        Ok(ImageUploadResult { url, path })
    }

    async fn delete_image(&self, path: &str) -> Result<()> {
        self.connection.simulate_latency().await;

        let target = self.connection.uploads_directory().join(path);
        if target.exists() {
            if let Err(e) = fs::remove_file(&target) {
                // Deletion always succeeds from the caller's point of view
                warn!("Failed to remove uploaded image {}: {}", path, e);
            } else {
                info!("Removed uploaded image {}", path);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn setup_test_repo() -> (JsonImageRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let connection = JsonConnection::with_latency(temp_dir.path(), Duration::ZERO).unwrap();
        let repo = JsonImageRepository::new(Arc::new(connection));
        (repo, temp_dir)
    }

    #[tokio::test]
    async fn test_upload_returns_data_url_and_slot_path() {
        let (repo, temp_dir) = setup_test_repo();

        let result = repo
            .upload_image(vec![1, 2, 3], "image/png", "user-1", ImageSlot::Header)
            .await
            .expect("Failed to upload");

        assert!(result.path.starts_with("users/user-1/boards/header_"));
        assert!(result.path.ends_with(".png"));
        assert_eq!(result.url, "data:image/png;base64,AQID");

        // The file exists under uploads/
        assert!(temp_dir.path().join("uploads").join(&result.path).exists());
    }

    #[tokio::test]
    async fn test_upload_jpeg_extension() {
        let (repo, _temp_dir) = setup_test_repo();

        let result = repo
            .upload_image(vec![0xFF], "image/jpeg", "user-1", ImageSlot::Center)
            .await
            .unwrap();
        assert!(result.path.contains("/center_"));
        assert!(result.path.ends_with(".jpg"));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (repo, temp_dir) = setup_test_repo();

        let result = repo
            .upload_image(vec![9, 9], "image/png", "user-1", ImageSlot::Footer)
            .await
            .unwrap();

        repo.delete_image(&result.path).await.expect("Failed to delete");
        assert!(!temp_dir.path().join("uploads").join(&result.path).exists());

        // Unknown path still succeeds
        repo.delete_image(&result.path).await.expect("Second delete failed");
        repo.delete_image("users/nobody/boards/none.png")
            .await
            .expect("Delete of unknown path failed");
    }
}
