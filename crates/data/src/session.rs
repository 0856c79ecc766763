//! File-backed persistence for the signed-in session.
//!
//! The session is loaded once and handed to components explicitly; nothing
//! reads the file behind their back.

use crate::api::RobotApi;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use traderobots_domain::entities::Session;

/// Errors raised by the session store.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Reading or writing the session file failed.
    #[error("Session file error at {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The session file exists but does not hold a session.
    #[error("Corrupt session file at {path}: {source}")]
    Corrupt {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

/// Loads, saves and clears the persisted session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Creates a store backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File the session lives in.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the session. A missing file means nobody is signed in.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(&self) -> Result<Session, SessionError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No stored session");
                return Ok(Session::Anonymous);
            }
            Err(source) => {
                return Err(SessionError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_str(&raw).map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Persists the session, creating parent directories as needed.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        let io_err = |source| SessionError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(session).map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(io_err)?;

        if let Some(user) = session.user() {
            info!(username = %user.username, "Session saved");
        }
        Ok(())
    }

    /// Removes the persisted session. Removing an absent file is not an error.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Signs out: notifies the backend on a best-effort basis, then always
    /// tears the local session down.
    ///
    /// # Errors
    /// Returns an error only if the local session cannot be removed.
    pub async fn logout(
        &self,
        api: &dyn RobotApi,
        session: &mut Session,
    ) -> Result<(), SessionError> {
        if let Err(e) = api.logout().await {
            warn!(error = %e, "Server logout failed, clearing local session anyway");
        }

        session.clear();
        self.clear()?;
        info!("Signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use traderobots_domain::entities::{SessionCookies, UserProfile};

    fn user() -> UserProfile {
        UserProfile {
            id: "5".to_string(),
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            is_staff: false,
            is_superuser: false,
            token: Some("tok".to_string()),
            cookies: SessionCookies::default(),
        }
    }

    #[test]
    fn test_missing_file_is_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        assert_eq!(store.load().unwrap(), Session::Anonymous);
    }

    #[test]
    fn test_save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested").join("session.json"));

        let session = Session::Authenticated(user());
        store.save(&session).unwrap();
        assert_eq!(store.load().unwrap(), session);

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), Session::Anonymous);
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{ not a session").unwrap();

        let err = SessionStore::new(&path).load().unwrap_err();
        assert!(matches!(err, SessionError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn test_logout_clears_locally_when_server_unreachable() {
        use crate::client::BackendClient;
        use crate::config::ClientConfig;

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let mut session = Session::Authenticated(user());
        store.save(&session).unwrap();

        let config = ClientConfig::default().with_api_url(format!("http://{addr}"));
        let client = BackendClient::new(&config, session.clone()).unwrap();

        store.logout(&client, &mut session).await.unwrap();

        assert_eq!(session, Session::Anonymous);
        assert_eq!(store.load().unwrap(), Session::Anonymous);
    }
}
