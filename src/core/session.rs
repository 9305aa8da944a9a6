//! Local session persistence.
//!
//! The signed-in user is kept as a JSON blob in a file so a restart does not
//! require signing in again. Sessions never expire; signing out deletes the
//! file. The password is stripped before anything is written.

use crate::{core::user::User, errors::Result};
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// File-backed store for the current session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Creates a store that reads and writes `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the session blob.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persists `user` as the current session.
    ///
    /// # Errors
    /// Returns an error if the directory or file cannot be written.
    pub async fn save(&self, user: &User) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let blob = serde_json::to_vec(&user.without_password())?;
        tokio::fs::write(&self.path, blob).await?;
        info!("Session saved for {}", user.name);
        Ok(())
    }

    /// Restores the saved session, if any.
    ///
    /// A missing file means nobody is signed in. A blob that cannot be decoded
    /// is treated the same way and logged.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read.
    pub async fn load(&self) -> Result<Option<User>> {
        let blob = match tokio::fs::read(&self.path).await {
            Ok(blob) => blob,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No session file at {:?}", self.path);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice::<User>(&blob) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                warn!("Ignoring unreadable session file {:?}: {}", self.path, e);
                Ok(None)
            }
        }
    }

    /// Restores the saved session against the current user list.
    ///
    /// The stored user is replaced by the current record with the same id, so
    /// role changes take effect. A session for a user that was removed or
    /// disabled is cleared.
    pub async fn restore(&self, users: &[User]) -> Result<Option<User>> {
        let Some(saved) = self.load().await? else {
            return Ok(None);
        };

        match users.iter().find(|u| u.id == saved.id) {
            Some(current) if current.is_active() => Ok(Some(current.without_password())),
            _ => {
                info!("Dropping stale session for {}", saved.name);
                self.clear().await?;
                Ok(None)
            }
        }
    }

    /// Signs out by removing the session blob. Missing files are fine.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be removed.
    pub async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                info!("Session cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
