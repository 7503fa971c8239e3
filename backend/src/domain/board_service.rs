use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use shared::{
    Board, BoardPatch, CreateBoardRequest, NewBoard, Square, MAX_DESCRIPTION_CHARS,
    MAX_SQUARE_CONTENT_CHARS, MAX_TITLE_CHARS,
};

use super::grid;
use crate::error::{AppError, Result};
use crate::storage::{BoardStore, UserStore};

/// In-memory editing session, kept consistent with the store after every
/// mutation so the caller never needs a full reload to observe its own
/// changes.
#[derive(Default)]
struct BoardSession {
    boards: Vec<Board>,
    current_board: Option<Board>,
    /// Squares of the most recently loaded board, captured before any edits
    /// in the current editing session. Used by `reset_squares`.
    loaded_squares: Option<(String, Vec<Square>)>,
}

/// Service mediating between callers and the board store. Owns the board
/// list and current-board selection for one running client.
#[derive(Clone)]
pub struct BoardService {
    store: Arc<dyn BoardStore>,
    users: Arc<dyn UserStore>,
    session: Arc<Mutex<BoardSession>>,
}

impl BoardService {
    pub fn new(store: Arc<dyn BoardStore>, users: Arc<dyn UserStore>) -> Self {
        Self {
            store,
            users,
            session: Arc::new(Mutex::new(BoardSession::default())),
        }
    }

    /// Snapshot of the in-memory board list.
    pub async fn boards(&self) -> Vec<Board> {
        self.session.lock().await.boards.clone()
    }

    /// Snapshot of the current board selection.
    pub async fn current_board(&self) -> Option<Board> {
        self.session.lock().await.current_board.clone()
    }

    /// Read a board straight from the store without touching the session
    /// (public share views use this).
    pub async fn find_board(&self, id: &str) -> Result<Option<Board>> {
        self.store.get_board(id).await
    }

    /// Replace the in-memory list with the user's boards. A store failure
    /// leaves the previous list intact.
    pub async fn load_boards(&self, user_id: &str, include_archived: bool) -> Result<Vec<Board>> {
        info!(
            "Loading boards for user {} (include_archived: {})",
            user_id, include_archived
        );

        let boards = self.store.get_user_boards(user_id, include_archived).await?;

        let mut session = self.session.lock().await;
        session.boards = boards.clone();
        Ok(boards)
    }

    /// Load one board as the current selection, capturing the squares
    /// snapshot that `reset_squares` restores. A miss clears the selection
    /// and surfaces `NotFound`.
    pub async fn load_board(&self, id: &str) -> Result<Board> {
        info!("Loading board {}", id);

        match self.store.get_board(id).await? {
            Some(board) => {
                let mut session = self.session.lock().await;
                session.loaded_squares = Some((board.id.clone(), board.squares.clone()));
                session.current_board = Some(board.clone());
                Ok(board)
            }
            None => {
                let mut session = self.session.lock().await;
                session.current_board = None;
                warn!("Board not found: {}", id);
                Err(AppError::NotFound("board", id.to_string()))
            }
        }
    }

    /// Create a board with the default 25-square layout for the active
    /// user, prepend it to the list, and select it.
    pub async fn create_new_board(&self, request: CreateBoardRequest) -> Result<Board> {
        let user = self
            .users
            .get_current_user()
            .await?
            .ok_or(AppError::NotAuthenticated)?;

        let title = request.title.trim().to_string();
        validate_title(&title)?;
        validate_description(&request.description)?;

        let now = Utc::now().timestamp_millis();
        let new_board = NewBoard {
            title,
            description: request.description,
            created_at: now,
            updated_at: now,
            user_id: user.uid,
            color_scheme: request.color_scheme,
            header_image_url: None,
            footer_image_url: None,
            center_image_url: None,
            squares: grid::default_squares(),
            is_archived: false,
        };

        let board = self.store.create_board(new_board).await?;

        let mut session = self.session.lock().await;
        session.boards.insert(0, board.clone());
        session.loaded_squares = Some((board.id.clone(), board.squares.clone()));
        session.current_board = Some(board.clone());

        info!("Created board {} ({})", board.id, board.title);
        Ok(board)
    }

    /// Persist a partial update, then apply the same merge to the matching
    /// list entry and to the current board.
    pub async fn update_board_details(&self, id: &str, patch: BoardPatch) -> Result<()> {
        if let Some(title) = &patch.title {
            validate_title(title)?;
        }
        if let Some(description) = &patch.description {
            validate_description(description)?;
        }

        self.store.update_board(id, patch.clone()).await?;

        let mut session = self.session.lock().await;
        if let Some(board) = session.boards.iter_mut().find(|b| b.id == id) {
            patch.apply(board);
        }
        if let Some(current) = session.current_board.as_mut() {
            if current.id == id {
                patch.apply(current);
            }
        }

        debug!("Updated board {}", id);
        Ok(())
    }

    /// Duplicate an already-loaded board: new id, fresh square ids,
    /// " (Copy)" title suffix, fresh timestamps, everything else copied
    /// verbatim (image URLs are shared with the source).
    pub async fn duplicate_board(&self, id: &str) -> Result<Board> {
        let source = {
            let session = self.session.lock().await;
            session.boards.iter().find(|b| b.id == id).cloned()
        }
        .ok_or_else(|| AppError::NotFound("board", id.to_string()))?;

        let now = Utc::now().timestamp_millis();
        let new_board = NewBoard {
            title: format!("{} (Copy)", source.title),
            description: source.description.clone(),
            created_at: now,
            updated_at: now,
            user_id: source.user_id.clone(),
            color_scheme: source.color_scheme,
            header_image_url: source.header_image_url.clone(),
            footer_image_url: source.footer_image_url.clone(),
            center_image_url: source.center_image_url.clone(),
            squares: source
                .squares
                .iter()
                .map(|s| Square {
                    id: Square::generate_id(),
                    content: s.content.clone(),
                    is_center: s.is_center,
                })
                .collect(),
            is_archived: source.is_archived,
        };

        let board = self.store.create_board(new_board).await?;

        let mut session = self.session.lock().await;
        session.boards.insert(0, board.clone());

        info!("Duplicated board {} as {}", id, board.id);
        Ok(board)
    }

    /// Soft-hide (or unhide) a board from default listings.
    pub async fn archive_board(&self, id: &str, archive: bool) -> Result<()> {
        let patch = BoardPatch {
            is_archived: Some(archive),
            ..BoardPatch::default()
        };
        self.update_board_details(id, patch).await?;

        info!(
            "{} board {}",
            if archive { "Archived" } else { "Unarchived" },
            id
        );
        Ok(())
    }

    /// Delete a board and drop it from both in-memory views.
    pub async fn delete_user_board(&self, id: &str) -> Result<()> {
        self.store.delete_board(id).await?;

        let mut session = self.session.lock().await;
        session.boards.retain(|b| b.id != id);
        if session.current_board.as_ref().is_some_and(|b| b.id == id) {
            session.current_board = None;
        }

        info!("Deleted board {}", id);
        Ok(())
    }

    /// Persist a full replacement of the 25-square sequence. The grid
    /// functions are responsible for the pinned-center invariant; this
    /// operation does not re-validate it.
    pub async fn update_squares(&self, board_id: &str, squares: Vec<Square>) -> Result<()> {
        let patch = BoardPatch {
            squares: Some(squares),
            ..BoardPatch::default()
        };
        self.update_board_details(board_id, patch).await
    }

    /// Apply a drag reposition. Returns `false` (leaving all state
    /// untouched) when the grid rejects the move.
    pub async fn move_square(
        &self,
        board_id: &str,
        source_id: &str,
        dest_id: &str,
    ) -> Result<bool> {
        let board = self.board_for_grid_ops(board_id).await?;

        match grid::reposition(&board.squares, source_id, dest_id) {
            Some(squares) => {
                self.update_squares(board_id, squares).await?;
                Ok(true)
            }
            None => {
                debug!(
                    "Rejected square move on board {} ({} -> {})",
                    board_id, source_id, dest_id
                );
                Ok(false)
            }
        }
    }

    /// Shuffle the non-center squares of a loaded board.
    pub async fn randomize_squares(&self, board_id: &str) -> Result<()> {
        let board = self.board_for_grid_ops(board_id).await?;
        let squares = grid::randomize(&board.squares);
        self.update_squares(board_id, squares).await
    }

    /// Replace one square's text (capped at 50 characters).
    pub async fn update_square_content(
        &self,
        board_id: &str,
        square_id: &str,
        content: &str,
    ) -> Result<()> {
        if content.chars().count() > MAX_SQUARE_CONTENT_CHARS {
            return Err(AppError::Validation(format!(
                "Square content cannot exceed {} characters",
                MAX_SQUARE_CONTENT_CHARS
            )));
        }

        let board = self.board_for_grid_ops(board_id).await?;
        let squares = grid::set_square_content(&board.squares, square_id, content)
            .ok_or_else(|| AppError::NotFound("square", square_id.to_string()))?;
        self.update_squares(board_id, squares).await
    }

    /// Restore the squares captured when the board was loaded, discarding
    /// every reorder and content edit made since.
    pub async fn reset_squares(&self, board_id: &str) -> Result<()> {
        let snapshot = {
            let session = self.session.lock().await;
            session
                .loaded_squares
                .as_ref()
                .filter(|(id, _)| id == board_id)
                .map(|(_, squares)| squares.clone())
        }
        .ok_or_else(|| AppError::NotFound("board snapshot", board_id.to_string()))?;

        info!("Resetting squares of board {} to loaded snapshot", board_id);
        self.update_squares(board_id, snapshot).await
    }

    /// Grid operations work on the in-memory list, falling back to the
    /// current board when the list does not hold the target.
    async fn board_for_grid_ops(&self, board_id: &str) -> Result<Board> {
        let session = self.session.lock().await;
        session
            .boards
            .iter()
            .find(|b| b.id == board_id)
            .cloned()
            .or_else(|| {
                session
                    .current_board
                    .clone()
                    .filter(|b| b.id == board_id)
            })
            .ok_or_else(|| AppError::NotFound("board", board_id.to_string()))
    }
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(AppError::Validation("Board title cannot be empty".to_string()));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(AppError::Validation(format!(
            "Board title cannot exceed {} characters",
            MAX_TITLE_CHARS
        )));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<()> {
    if description.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(AppError::Validation(format!(
            "Board description cannot exceed {} characters",
            MAX_DESCRIPTION_CHARS
        )));
    }
    Ok(())
}
