use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Tokens that survive a restart
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredTokens {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub saved_at: Option<DateTime<Utc>>,
}

impl StoredTokens {
    pub fn new(access_token: String, refresh_token: Option<String>) -> Self {
        Self {
            access_token: Some(access_token),
            refresh_token,
            saved_at: Some(Utc::now()),
        }
    }
}

/// Durable storage for session tokens
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> Result<StoredTokens, ApiError>;
    async fn save(&self, tokens: &StoredTokens) -> Result<(), ApiError>;
    async fn clear(&self) -> Result<(), ApiError>;
}

/// JSON file in the CLI state directory
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join("tokens.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<StoredTokens, ApiError> {
        if !tokio::fs::try_exists(&self.path).await? {
            return Ok(StoredTokens::default());
        }

        let content = tokio::fs::read_to_string(&self.path).await?;
        let tokens: StoredTokens = serde_json::from_str(&content)
            .map_err(|e| ApiError::storage(format!("corrupt token file {}: {}", self.path.display(), e)))?;
        Ok(tokens)
    }

    async fn save(&self, tokens: &StoredTokens) -> Result<(), ApiError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(tokens)
            .map_err(|e| ApiError::storage(e.to_string()))?;
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), ApiError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local storage, for tests and embedders
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    inner: Mutex<StoredTokens>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: StoredTokens) -> Self {
        Self { inner: Mutex::new(tokens) }
    }

    pub fn snapshot(&self) -> StoredTokens {
        self.inner.lock().map(|t| t.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<StoredTokens, ApiError> {
        Ok(self.snapshot())
    }

    async fn save(&self, tokens: &StoredTokens) -> Result<(), ApiError> {
        let mut guard = self.inner.lock().map_err(|_| ApiError::storage("token store poisoned"))?;
        *guard = tokens.clone();
        Ok(())
    }

    async fn clear(&self) -> Result<(), ApiError> {
        let mut guard = self.inner.lock().map_err(|_| ApiError::storage("token store poisoned"))?;
        *guard = StoredTokens::default();
        Ok(())
    }
}
