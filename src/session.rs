// ABOUTME: Session state provider: tokens and onboarding flag behind an explicit load/save/clear lifecycle
// ABOUTME: TokenStore seam over the platform secure store, with watch-based change subscription
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Platewise

use crate::errors::{ApiError, ApiResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{debug, warn};

/// Persisted auth session: tokens plus the onboarding flag.
///
/// Written once at OTP-verification time, read on every app-launch
/// redirect decision, cleared at logout.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    /// Bearer token attached to authenticated calls
    pub access_token: Option<String>,
    /// Refresh token issued alongside the access token
    pub refresh_token: Option<String>,
    /// Whether the registration wizard has been completed
    #[serde(default)]
    pub onboarded: bool,
}

impl Session {
    /// True when a non-empty access token is present.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.access_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Seam over the platform secure key-value store.
///
/// The real store is an external collaborator; this trait keeps it
/// swappable and testable.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Read the persisted session, defaulting to empty when absent.
    async fn load(&self) -> ApiResult<Session>;
    /// Persist the session.
    async fn save(&self, session: &Session) -> ApiResult<()>;
    /// Remove any persisted session.
    async fn clear(&self) -> ApiResult<()>;
}

/// In-memory store for tests and previews.
#[derive(Default)]
pub struct MemoryTokenStore {
    inner: Mutex<Session>,
}

impl MemoryTokenStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> ApiResult<Session> {
        let guard = self
            .inner
            .lock()
            .map_err(|_| ApiError::Session("token store lock poisoned".into()))?;
        Ok(guard.clone())
    }

    async fn save(&self, session: &Session) -> ApiResult<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| ApiError::Session("token store lock poisoned".into()))?;
        *guard = session.clone();
        Ok(())
    }

    async fn clear(&self) -> ApiResult<()> {
        self.save(&Session::default()).await
    }
}

/// On-disk stand-in for the platform secure store: one JSON file under the
/// user data directory.
pub struct FileTokenStore {
    path: PathBuf,
}

/// Session plus bookkeeping, as written to disk.
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    #[serde(flatten)]
    session: Session,
    updated_at: DateTime<Utc>,
}

impl FileTokenStore {
    /// Store backed by an explicit file path.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at the default location under the user data directory.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Session`] when no user data directory exists.
    pub fn default_location() -> ApiResult<Self> {
        let dir = dirs::data_dir()
            .ok_or_else(|| ApiError::Session("no user data directory available".into()))?;
        Ok(Self::new(dir.join("platewise").join("session.json")))
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> ApiResult<Session> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Session::default());
            }
            Err(e) => return Err(ApiError::Session(format!("failed to read session: {e}"))),
        };
        match serde_json::from_slice::<StoredSession>(&bytes) {
            Ok(stored) => Ok(stored.session),
            Err(e) => {
                // A corrupt session file must not brick the app; start clean.
                warn!(error = %e, path = %self.path.display(), "session file unreadable, resetting");
                Ok(Session::default())
            }
        }
    }

    async fn save(&self, session: &Session) -> ApiResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ApiError::Session(format!("failed to create store dir: {e}")))?;
        }
        let stored = StoredSession {
            session: session.clone(),
            updated_at: Utc::now(),
        };
        let bytes = serde_json::to_vec_pretty(&stored)
            .map_err(|e| ApiError::Session(format!("failed to encode session: {e}")))?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|e| ApiError::Session(format!("failed to write session: {e}")))
    }

    async fn clear(&self) -> ApiResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ApiError::Session(format!("failed to clear session: {e}"))),
        }
    }
}

/// Single session-state provider.
///
/// All reads and writes of the persisted session flow through here, and
/// every change is published to subscribers, replacing ad hoc secure-store
/// reads scattered across call sites.
pub struct SessionManager {
    store: Arc<dyn TokenStore>,
    current: watch::Sender<Session>,
}

impl SessionManager {
    /// Create a manager over the given store. Call [`SessionManager::load`]
    /// to hydrate from persistence.
    #[must_use]
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let (current, _) = watch::channel(Session::default());
        Self { store, current }
    }

    /// Hydrate the in-memory session from the store.
    ///
    /// # Errors
    ///
    /// Propagates store read failures.
    pub async fn load(&self) -> ApiResult<Session> {
        let session = self.store.load().await?;
        self.current.send_replace(session.clone());
        debug!(logged_in = session.is_logged_in(), "session loaded");
        Ok(session)
    }

    /// Persist a new session and publish the change.
    ///
    /// # Errors
    ///
    /// Propagates store write failures.
    pub async fn save(&self, session: Session) -> ApiResult<()> {
        self.store.save(&session).await?;
        self.current.send_replace(session);
        Ok(())
    }

    /// Clear the persisted session and publish the change.
    ///
    /// # Errors
    ///
    /// Propagates store write failures.
    pub async fn clear(&self) -> ApiResult<()> {
        self.store.clear().await?;
        self.current.send_replace(Session::default());
        Ok(())
    }

    /// Mark the registration wizard as completed.
    ///
    /// # Errors
    ///
    /// Propagates store write failures.
    pub async fn mark_onboarded(&self) -> ApiResult<()> {
        let mut session = self.current();
        session.onboarded = true;
        self.save(session).await
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn current(&self) -> Session {
        self.current.borrow().clone()
    }

    /// True when a non-empty access token is held.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.current.borrow().is_logged_in()
    }

    /// Subscribe to session changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.current.subscribe()
    }
}
