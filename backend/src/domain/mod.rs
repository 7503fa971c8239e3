//! # Domain Layer
//!
//! Business rules for boards and their 5x5 grids: the grid reorder
//! algorithm, the board editing session, stub authentication, image
//! attachment, and the debounced auto-save scheduler.

pub mod auth_service;
pub mod autosave;
pub mod board_service;
pub mod grid;
pub mod image_service;

pub use auth_service::AuthService;
pub use autosave::AutoSaveScheduler;
pub use board_service::BoardService;
pub use image_service::ImageService;
