//! # Storage Traits
//!
//! Contracts for user, board, and image persistence. Any backing store
//! (local files, document database, REST service) that implements these
//! with the same success/failure semantics works unmodified with the
//! domain layer.

use async_trait::async_trait;
use shared::{Board, BoardPatch, ImageSlot, ImageUploadResult, NewBoard, User};

use crate::error::Result;

/// User records and the active session selection.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create a user account. Fails with `DuplicateEmail` when an existing
    /// record carries the same email (exact, case-sensitive match). On
    /// success the new user becomes the active session user.
    async fn register_user(
        &self,
        email: &str,
        password: &str,
        display_name: Option<String>,
    ) -> Result<User>;

    /// Authenticate by exact email + password match; fails with
    /// `InvalidCredentials` otherwise. On success the user becomes the
    /// active session user.
    async fn login_user(&self, email: &str, password: &str) -> Result<User>;

    /// Clear the active session user. Always succeeds.
    async fn logout_user(&self) -> Result<()>;

    /// Read the active session user without side effects.
    async fn get_current_user(&self) -> Result<Option<User>>;
}

/// Board records, keyed by store-assigned ids.
#[async_trait]
pub trait BoardStore: Send + Sync {
    /// Assign a fresh id and persist the board, echoing the stored record.
    async fn create_board(&self, board: NewBoard) -> Result<Board>;

    /// Merge the given fields into the stored board. `updatedAt` is always
    /// re-stamped with the store's clock, even if the patch carries one.
    /// Silent no-op when no board matches `id`.
    async fn update_board(&self, id: &str, patch: BoardPatch) -> Result<()>;

    /// Remove the board; no-op when absent.
    async fn delete_board(&self, id: &str) -> Result<()>;

    /// Retrieve a board by id.
    async fn get_board(&self, id: &str) -> Result<Option<Board>>;

    /// List boards owned by `user_id`, excluding archived ones unless
    /// requested, sorted by `updatedAt` descending.
    async fn get_user_boards(&self, user_id: &str, include_archived: bool) -> Result<Vec<Board>>;
}

/// Simulated file storage for board imagery.
///
/// The boundary validates nothing; file type and size preconditions are
/// enforced by the caller before invoking `upload_image`.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store raw image bytes for a user's board slot, returning a
    /// displayable URL and a deletable path.
    async fn upload_image(
        &self,
        data: Vec<u8>,
        content_type: &str,
        user_id: &str,
        slot: ImageSlot,
    ) -> Result<ImageUploadResult>;

    /// Remove a previously uploaded image; no-op when the path is unknown.
    async fn delete_image(&self, path: &str) -> Result<()>;
}
