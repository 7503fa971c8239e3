use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Artificial per-operation delay of the stub store.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(150);

/// JsonConnection manages the data directory layout shared by the JSON
/// repositories and simulates the latency of a network-backed store.
#[derive(Clone)]
pub struct JsonConnection {
    base_directory: PathBuf,
    latency: Duration,
}

impl JsonConnection {
    /// Create a connection with the default simulated latency.
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        Self::with_latency(base_directory, DEFAULT_LATENCY)
    }

    /// Create a connection with an explicit latency (tests pass zero).
    pub fn with_latency<P: AsRef<Path>>(base_directory: P, latency: Duration) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
            latency,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Path of the user collection file.
    pub fn users_file_path(&self) -> PathBuf {
        self.base_directory.join("users.json")
    }

    /// Path of the active-session file.
    pub fn session_file_path(&self) -> PathBuf {
        self.base_directory.join("session.yaml")
    }

    /// Directory holding one JSON document per board.
    pub fn boards_directory(&self) -> PathBuf {
        self.base_directory.join("boards")
    }

    /// Path of a single board document.
    pub fn board_file_path(&self, board_id: &str) -> PathBuf {
        self.boards_directory().join(format!("{}.json", board_id))
    }

    /// Root directory for simulated image uploads.
    pub fn uploads_directory(&self) -> PathBuf {
        self.base_directory.join("uploads")
    }

    /// Await the configured artificial latency.
    pub async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    /// Atomic write using a temp file in the target directory.
    pub fn atomic_write(path: &Path, contents: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, contents)?;
        fs::rename(&temp_path, path)?;
        Ok(())
    }
}
