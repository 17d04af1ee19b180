//! TOML-backed client-local session cache.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use bankbot_core::error::{BankbotError, Result};
use bankbot_core::identity::{SessionRepository, StoredSession};

use crate::paths::{BankbotPaths, ServiceType};
use crate::storage::AtomicTomlFile;

/// Stores the cached session in `session.toml`.
///
/// The file holds the server session cookie, so it is written owner-only.
/// File I/O runs on the blocking pool.
#[derive(Clone)]
pub struct TomlSessionRepository {
    file: Arc<AtomicTomlFile<StoredSession>>,
}

impl TomlSessionRepository {
    /// Creates a repository at the default location for `paths`.
    pub fn new(paths: &BankbotPaths) -> Result<Self> {
        let path = paths.get_path(ServiceType::Session)?;
        Ok(Self::with_path(path))
    }

    /// Creates a repository backed by an explicit file.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path).private()),
        }
    }

    async fn blocking<F, T>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&AtomicTomlFile<StoredSession>) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || op(&file))
            .await
            .map_err(|e| BankbotError::internal(format!("Failed to join task: {}", e)))?
    }
}

#[async_trait]
impl SessionRepository for TomlSessionRepository {
    async fn load(&self) -> Result<Option<StoredSession>> {
        let stored = self
            .blocking(|file| file.load().map_err(BankbotError::from))
            .await?;
        tracing::debug!(
            "[TomlSessionRepository] Loaded session: present={}",
            stored.as_ref().is_some_and(|s| !s.is_empty())
        );
        Ok(stored.filter(|s| !s.is_empty()))
    }

    async fn save(&self, session: &StoredSession) -> Result<()> {
        let session = session.clone();
        self.blocking(move |file| file.save(&session).map_err(BankbotError::from))
            .await?;
        tracing::debug!(
            "[TomlSessionRepository] Session saved to {}",
            self.file.path().display()
        );
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.blocking(|file| file.remove().map_err(BankbotError::from))
            .await?;
        tracing::debug!("[TomlSessionRepository] Session cleared");
        Ok(())
    }
}
