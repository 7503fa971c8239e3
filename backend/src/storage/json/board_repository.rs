use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared::{Board, BoardPatch, NewBoard};

use super::connection::JsonConnection;
use crate::error::Result;
use crate::storage::traits::BoardStore;

/// JSON-file-backed board store: one document per board, discovered by
/// scanning the boards directory.
#[derive(Clone)]
pub struct JsonBoardRepository {
    connection: Arc<JsonConnection>,
}

impl JsonBoardRepository {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self { connection }
    }

    fn load_board_file(&self, path: &Path) -> anyhow::Result<Board> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read board file {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse board file {}", path.display()))
    }

    fn save_board(&self, board: &Board) -> anyhow::Result<()> {
        let contents = serde_json::to_vec_pretty(board)?;
        JsonConnection::atomic_write(&self.connection.board_file_path(&board.id), &contents)
    }

    /// Scan the boards directory; unreadable documents are skipped with a
    /// warning so one corrupt file cannot take down every listing.
    fn discover_boards(&self) -> anyhow::Result<Vec<Board>> {
        let boards_dir = self.connection.boards_directory();

        if !boards_dir.exists() {
            debug!("Boards directory doesn't exist, returning empty list");
            return Ok(Vec::new());
        }

        let mut boards = Vec::new();
        for entry in fs::read_dir(&boards_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            match self.load_board_file(&path) {
                Ok(board) => boards.push(board),
                Err(e) => warn!("Skipping unreadable board file {}: {}", path.display(), e),
            }
        }

        Ok(boards)
    }
}

#[async_trait]
impl BoardStore for JsonBoardRepository {
    async fn create_board(&self, board: NewBoard) -> Result<Board> {
        self.connection.simulate_latency().await;

        let board = board.into_board(Uuid::new_v4().to_string());
        self.save_board(&board)?;

        info!("Created board {} ({})", board.id, board.title);
        Ok(board)
    }

    async fn update_board(&self, id: &str, patch: BoardPatch) -> Result<()> {
        self.connection.simulate_latency().await;

        let path = self.connection.board_file_path(id);
        if !path.exists() {
            debug!("Update for unknown board {} ignored", id);
            return Ok(());
        }

        let mut board = self.load_board_file(&path)?;
        patch.apply(&mut board);
        // The store's clock wins over any caller-supplied timestamp
        board.updated_at = Utc::now().timestamp_millis();
        self.save_board(&board)?;

        debug!("Updated board {}", id);
        Ok(())
    }

    async fn delete_board(&self, id: &str) -> Result<()> {
        self.connection.simulate_latency().await;

        let path = self.connection.board_file_path(id);
        if path.exists() {
            fs::remove_file(&path).map_err(anyhow::Error::from)?;
            info!("Deleted board {}", id);
        }
        Ok(())
    }

    async fn get_board(&self, id: &str) -> Result<Option<Board>> {
        self.connection.simulate_latency().await;

        let path = self.connection.board_file_path(id);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(self.load_board_file(&path)?))
    }

    async fn get_user_boards(&self, user_id: &str, include_archived: bool) -> Result<Vec<Board>> {
        self.connection.simulate_latency().await;

        let mut boards: Vec<Board> = self
            .discover_boards()?
            .into_iter()
            .filter(|b| b.user_id == user_id)
            .filter(|b| include_archived || !b.is_archived)
            .collect();

        // Most recently updated first
        boards.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        debug!("Found {} boards for user {}", boards.len(), user_id);
        Ok(boards)
    }
}
