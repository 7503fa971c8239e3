use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fs;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use shared::User;

use super::connection::JsonConnection;
use crate::error::{AppError, Result};
use crate::storage::traits::UserStore;

/// Private on-disk user record. A real backend would never persist a
/// plaintext password; this stub stores exactly what the reference store
/// stored, and fixing that is an explicit non-goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    uid: String,
    email: String,
    display_name: Option<String>,
    password: String,
}

impl UserRecord {
    /// Public projection without the password field.
    fn public(&self) -> User {
        User {
            uid: self.uid.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
        }
    }
}

/// Active-session file contents.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    active_user_uid: Option<String>,
}

/// JSON-file-backed user store.
#[derive(Clone)]
pub struct JsonUserRepository {
    connection: Arc<JsonConnection>,
}

impl JsonUserRepository {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self { connection }
    }

    fn load_users(&self) -> anyhow::Result<Vec<UserRecord>> {
        let path = self.connection.users_file_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn save_users(&self, users: &[UserRecord]) -> anyhow::Result<()> {
        let contents = serde_json::to_vec_pretty(users)?;
        JsonConnection::atomic_write(&self.connection.users_file_path(), &contents)
    }

    fn load_session(&self) -> anyhow::Result<Option<String>> {
        let path = self.connection.session_file_path();
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)?;
        let session: SessionFile = serde_yaml::from_str(&contents)?;
        Ok(session.active_user_uid)
    }

    fn save_session(&self, active_user_uid: Option<&str>) -> anyhow::Result<()> {
        let session = SessionFile {
            active_user_uid: active_user_uid.map(|uid| uid.to_string()),
        };
        let contents = serde_yaml::to_string(&session)?;
        JsonConnection::atomic_write(&self.connection.session_file_path(), contents.as_bytes())
    }
}

#[async_trait]
impl UserStore for JsonUserRepository {
    async fn register_user(
        &self,
        email: &str,
        password: &str,
        display_name: Option<String>,
    ) -> Result<User> {
        self.connection.simulate_latency().await;

        let mut users = self.load_users()?;

        // Exact, case-sensitive comparison
        if users.iter().any(|u| u.email == email) {
            warn!("Registration rejected, email already in use: {}", email);
            return Err(AppError::DuplicateEmail);
        }

        let record = UserRecord {
            uid: Uuid::new_v4().to_string(),
            email: email.to_string(),
            display_name,
            password: password.to_string(),
        };
        let user = record.public();

        users.push(record);
        self.save_users(&users)?;
        self.save_session(Some(&user.uid))?;

        info!("Registered user {} ({})", user.uid, user.email);
        Ok(user)
    }

    async fn login_user(&self, email: &str, password: &str) -> Result<User> {
        self.connection.simulate_latency().await;

        let users = self.load_users()?;
        let record = users
            .iter()
            .find(|u| u.email == email && u.password == password)
            .ok_or(AppError::InvalidCredentials)?;

        let user = record.public();
        self.save_session(Some(&user.uid))?;

        info!("Logged in user {} ({})", user.uid, user.email);
        Ok(user)
    }

    async fn logout_user(&self) -> Result<()> {
        self.connection.simulate_latency().await;

        self.save_session(None)?;
        info!("Cleared active session");
        Ok(())
    }

    async fn get_current_user(&self) -> Result<Option<User>> {
        let uid = match self.load_session()? {
            Some(uid) => uid,
            None => return Ok(None),
        };

        let users = self.load_users()?;
        Ok(users.iter().find(|u| u.uid == uid).map(|u| u.public()))
    }
}
