//! Client-local session persistence.
//!
//! Defines the interface for keeping the last known session across process
//! runs. Nothing stored here is authoritative: the service may reject the
//! session at any time.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::model::Identity;
use crate::error::Result;

/// Session state cached on the client between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    #[serde(default)]
    pub admin_logged_in: bool,
    /// Cookie header carrying the server-side session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookies: Option<String>,
    // Tables go last in TOML.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<Identity>,
}

impl StoredSession {
    pub fn is_empty(&self) -> bool {
        self.identity.is_none() && !self.admin_logged_in && self.cookies.is_none()
    }
}

/// An abstract repository for the client-local session cache.
///
/// Decouples the session store from the storage mechanism (TOML file,
/// keychain, in-memory for tests).
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Loads the cached session.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(StoredSession))`: A session was cached
    /// - `Ok(None)`: Nothing cached
    /// - `Err(_)`: Storage could not be read
    async fn load(&self) -> Result<Option<StoredSession>>;

    /// Replaces the cached session.
    async fn save(&self, session: &StoredSession) -> Result<()>;

    /// Removes the cached session. Succeeds when nothing was cached.
    async fn clear(&self) -> Result<()>;
}
