//! Access-token session handling.
//!
//! The session is an explicit object injected into the HTTP client - there
//! is no ambient global token state. It pairs a pluggable [`SessionStore`]
//! (where the token durably lives) with the coordination state needed for
//! single-flight refresh: a generation counter and an async gate.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

/// Errors from durable token storage.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Reading or writing the token file failed.
    #[error("session storage error: {0}")]
    Io(#[from] std::io::Error),
    /// Token file exists but is not valid JSON.
    #[error("session storage corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Durable holder of the current access token. Read/write only - no
/// validation, no expiry logic.
pub trait SessionStore: Send + Sync {
    /// Load the stored token, if any.
    fn load(&self) -> Option<SecretString>;
    /// Persist a new token.
    fn save(&self, token: &SecretString) -> Result<(), SessionError>;
    /// Remove any stored token.
    fn clear(&self) -> Result<(), SessionError>;
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    token: std::sync::Mutex<Option<SecretString>>,
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Option<SecretString> {
        self.token.lock().map(|t| t.clone()).unwrap_or(None)
    }

    fn save(&self, token: &SecretString) -> Result<(), SessionError> {
        if let Ok(mut guard) = self.token.lock() {
            *guard = Some(token.clone());
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        if let Ok(mut guard) = self.token.lock() {
            *guard = None;
        }
        Ok(())
    }
}

/// Token persisted as a small JSON file in the user config directory.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct StoredToken {
    access_token: String,
}

impl FileStore {
    /// Create a store at an explicit path.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Create a store at the default location
    /// (`<config dir>/gatherly/session.json`).
    ///
    /// # Errors
    ///
    /// Returns an error if the platform config directory cannot be
    /// determined or created.
    pub fn default_path() -> Result<Self, SessionError> {
        let dir = dirs::config_dir()
            .ok_or_else(|| {
                SessionError::Io(std::io::Error::other("no user config directory"))
            })?
            .join("gatherly");
        std::fs::create_dir_all(&dir)?;
        Ok(Self::new(dir.join("session.json")))
    }
}

impl SessionStore for FileStore {
    fn load(&self) -> Option<SecretString> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str::<StoredToken>(&raw) {
            Ok(stored) => Some(SecretString::from(stored.access_token)),
            Err(e) => {
                warn!(error = %e, "stored session is corrupt, ignoring");
                None
            }
        }
    }

    fn save(&self, token: &SecretString) -> Result<(), SessionError> {
        let body = serde_json::to_string(&StoredToken {
            access_token: token.expose_secret().to_owned(),
        })?;
        std::fs::write(&self.path, body)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Shared session handle used by the HTTP client.
///
/// Cloning is cheap; all clones share one token, one generation counter,
/// and one refresh gate. The generation bumps on every token change
/// (sign-in, refresh, sign-out), which is what lets concurrent 401s detect
/// that somebody else already refreshed.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    store: Box<dyn SessionStore>,
    token: std::sync::Mutex<Option<SecretString>>,
    generation: AtomicU64,
    refresh_gate: tokio::sync::Mutex<()>,
}

impl Session {
    /// Create a session, loading any token the store already holds.
    #[must_use]
    pub fn new(store: Box<dyn SessionStore>) -> Self {
        let token = store.load();
        Self {
            inner: Arc::new(SessionInner {
                store,
                token: std::sync::Mutex::new(token),
                generation: AtomicU64::new(0),
                refresh_gate: tokio::sync::Mutex::new(()),
            }),
        }
    }

    /// Current access token, if signed in.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.inner.token.lock().map(|t| t.clone()).unwrap_or(None)
    }

    /// Observable token generation. Bumps on every set/clear.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::Acquire)
    }

    /// Install a new token and persist it.
    pub fn set_token(&self, token: SecretString) {
        if let Err(e) = self.inner.store.save(&token) {
            warn!(error = %e, "failed to persist access token");
        }
        if let Ok(mut guard) = self.inner.token.lock() {
            *guard = Some(token);
        }
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Drop the token (sign-out, or failed refresh).
    pub fn clear(&self) {
        if let Err(e) = self.inner.store.clear() {
            warn!(error = %e, "failed to clear stored session");
        }
        if let Ok(mut guard) = self.inner.token.lock() {
            *guard = None;
        }
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Run `do_refresh` at most once for a batch of concurrent callers.
    ///
    /// Callers pass the generation they observed when their request got its
    /// 401. Whoever wins the gate performs the refresh and installs the new
    /// token; everyone who arrives after the generation has moved on
    /// returns immediately and retries with the already-installed token.
    /// On refresh failure the session is cleared (effectively signed out)
    /// and the error is propagated to the caller that performed the
    /// refresh.
    ///
    /// # Errors
    ///
    /// Propagates the refresh operation's error.
    pub async fn refresh_once<F, Fut, E>(
        &self,
        observed_generation: u64,
        do_refresh: F,
    ) -> Result<(), E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<SecretString, E>>,
    {
        let _gate = self.inner.refresh_gate.lock().await;

        if self.generation() != observed_generation {
            debug!("token already refreshed by a concurrent request");
            return Ok(());
        }

        match do_refresh().await {
            Ok(token) => {
                self.set_token(token);
                Ok(())
            }
            Err(e) => {
                self.clear();
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn session() -> Session {
        Session::new(Box::new(MemoryStore::default()))
    }

    #[test]
    fn test_set_and_clear_bump_generation() {
        let s = session();
        assert_eq!(s.generation(), 0);
        s.set_token(SecretString::from("tok_1"));
        assert_eq!(s.generation(), 1);
        assert!(s.token().is_some());
        s.clear();
        assert_eq!(s.generation(), 2);
        assert!(s.token().is_none());
    }

    #[test]
    fn test_session_loads_existing_token() {
        let store = MemoryStore::default();
        store.save(&SecretString::from("tok_persisted")).unwrap();
        let s = Session::new(Box::new(store));
        assert_eq!(s.token().unwrap().expose_secret(), "tok_persisted");
    }

    #[tokio::test]
    async fn test_concurrent_401s_trigger_exactly_one_refresh() {
        let s = session();
        s.set_token(SecretString::from("stale"));
        let observed = s.generation();

        let refreshes = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let s = s.clone();
            let refreshes = Arc::clone(&refreshes);
            handles.push(tokio::spawn(async move {
                s.refresh_once::<_, _, std::convert::Infallible>(observed, || {
                    let refreshes = Arc::clone(&refreshes);
                    async move {
                        refreshes.fetch_add(1, Ordering::SeqCst);
                        Ok(SecretString::from("fresh"))
                    }
                })
                .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(refreshes.load(Ordering::SeqCst), 1);
        assert_eq!(s.token().unwrap().expose_secret(), "fresh");
    }

    #[tokio::test]
    async fn test_failed_refresh_clears_session() {
        let s = session();
        s.set_token(SecretString::from("stale"));
        let observed = s.generation();

        let result = s
            .refresh_once(observed, || async { Err::<SecretString, _>("nope") })
            .await;

        assert!(result.is_err());
        assert!(s.token().is_none());
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = std::env::temp_dir().join(format!("gatherly-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let store = FileStore::new(dir.join("session.json"));

        assert!(store.load().is_none());
        store.save(&SecretString::from("tok_file")).unwrap();
        assert_eq!(store.load().unwrap().expose_secret(), "tok_file");
        store.clear().unwrap();
        assert!(store.load().is_none());
        // clearing twice is fine
        store.clear().unwrap();

        std::fs::remove_dir_all(&dir).ok();
    }
}
