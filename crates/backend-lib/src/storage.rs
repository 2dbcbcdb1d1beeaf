// ============================
// crates/backend-lib/src/storage.rs
// ============================
//! User store abstraction with in-memory and flat-file implementations.
//!
//! Trainee and trainer records live elsewhere; the security core only needs
//! usernames, password hashes and authorities.
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::fs as tokio_fs;

use crate::error::AppError;
use crate::validation::validate_username;

/// Credentials and authorities for one account
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub username: String,
    /// scrypt PHC string
    pub password_hash: String,
    #[serde(default)]
    pub authorities: Vec<String>,
}

impl UserRecord {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            authorities: Vec::new(),
        }
    }

    pub fn with_authorities<I, A>(mut self, authorities: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.authorities = authorities.into_iter().map(Into::into).collect();
        self
    }
}

/// Trait for user store backends
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up an account by exact username
    async fn lookup_user(&self, username: &str) -> Result<Option<UserRecord>, AppError>;

    /// Replace the password hash of an existing account
    async fn save_user(&self, username: &str, new_password_hash: &str) -> Result<(), AppError>;

    /// Create or overwrite an account
    async fn insert_user(&self, record: UserRecord) -> Result<(), AppError>;
}

/// In-memory user store
#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<DashMap<String, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop an account. Tokens already issued to it stop working at the gate.
    pub fn remove_user(&self, username: &str) -> Option<UserRecord> {
        self.users.remove(username).map(|(_, record)| record)
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn lookup_user(&self, username: &str) -> Result<Option<UserRecord>, AppError> {
        Ok(self.users.get(username).map(|u| u.clone()))
    }

    async fn save_user(&self, username: &str, new_password_hash: &str) -> Result<(), AppError> {
        match self.users.get_mut(username) {
            Some(mut user) => {
                user.password_hash = new_password_hash.to_string();
                Ok(())
            }
            None => Err(AppError::NotFound(format!("user {username}"))),
        }
    }

    async fn insert_user(&self, record: UserRecord) -> Result<(), AppError> {
        self.users.insert(record.username.clone(), record);
        Ok(())
    }
}

/// Flat-file implementation: one JSON document per user under `users/`
#[derive(Clone)]
pub struct FlatFileUserStore {
    root: PathBuf,
}

impl FlatFileUserStore {
    pub fn new<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join("users"))?;
        Ok(Self { root })
    }

    /// Path of a user's record. Usernames that could escape the directory
    /// have no path.
    fn user_path(&self, username: &str) -> Option<PathBuf> {
        validate_username(username).ok()?;
        Some(self.root.join("users").join(format!("{username}.json")))
    }

    async fn write_record(&self, path: &Path, record: &UserRecord) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(record)?;
        // write-then-rename so a crash never leaves a torn record
        let tmp = path.with_extension("json.tmp");
        tokio_fs::write(&tmp, json).await?;
        tokio_fs::rename(&tmp, path).await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for FlatFileUserStore {
    async fn lookup_user(&self, username: &str) -> Result<Option<UserRecord>, AppError> {
        let Some(path) = self.user_path(username) else {
            return Ok(None);
        };

        if !tokio_fs::try_exists(&path).await? {
            return Ok(None);
        }

        let content = tokio_fs::read_to_string(&path).await?;
        let record: UserRecord = serde_json::from_str(&content)?;
        Ok(Some(record))
    }

    async fn save_user(&self, username: &str, new_password_hash: &str) -> Result<(), AppError> {
        let mut record = self
            .lookup_user(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {username}")))?;
        record.password_hash = new_password_hash.to_string();

        let path = self
            .user_path(username)
            .ok_or_else(|| AppError::InvalidInput("invalid username".into()))?;
        self.write_record(&path, &record).await
    }

    async fn insert_user(&self, record: UserRecord) -> Result<(), AppError> {
        let path = self
            .user_path(&record.username)
            .ok_or_else(|| AppError::InvalidInput("invalid username".into()))?;
        self.write_record(&path, &record).await
    }
}
