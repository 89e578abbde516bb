//! Session cache: the locally persisted copy of the active profile.
//!
//! Written after every mutation, read once at startup. Failures are logged and
//! swallowed; the in-memory profile stays authoritative either way.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::Profile;

/// Fixed key the session document is stored under.
pub const SESSION_KEY: &str = "resumecraft.session";

/// Cached session document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedSession {
    pub username: String,
    pub profile: Profile,
}

pub trait SessionCache: Send + Sync {
    fn load(&self) -> Option<CachedSession>;
    fn store(&self, session: &CachedSession);
    fn clear(&self);
}

/// Stores the session as one JSON file named after [`SESSION_KEY`].
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{SESSION_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionCache for FileCache {
    fn load(&self) -> Option<CachedSession> {
        let raw = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("Ignoring unreadable session cache {}: {e}", self.path.display());
                None
            }
        }
    }

    fn store(&self, session: &CachedSession) {
        let result = serde_json::to_vec(session)
            .map_err(std::io::Error::from)
            .and_then(|bytes| {
                if let Some(parent) = self.path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&self.path, bytes)
            });
        match result {
            Ok(()) => debug!("Session cached at {}", self.path.display()),
            Err(e) => warn!("Failed to write session cache {}: {e}", self.path.display()),
        }
    }

    fn clear(&self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove session cache {}: {e}", self.path.display());
            }
        }
    }
}

/// In-process cache, for tests and embedders without a filesystem.
#[derive(Default)]
pub struct MemoryCache {
    slot: Mutex<Option<CachedSession>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: CachedSession) -> Self {
        Self {
            slot: Mutex::new(Some(session)),
        }
    }
}

impl SessionCache for MemoryCache {
    fn load(&self) -> Option<CachedSession> {
        self.slot.lock().ok()?.clone()
    }

    fn store(&self, session: &CachedSession) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(session.clone());
        }
    }

    fn clear(&self) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> CachedSession {
        CachedSession {
            username: "user001".to_string(),
            profile: Profile {
                name: "Ada".to_string(),
                skills: vec!["Rust".to_string()],
                ..Profile::default()
            },
        }
    }

    #[test]
    fn test_file_cache_store_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path().join("nested"));
        assert!(cache.load().is_none());

        cache.store(&session());
        assert_eq!(cache.load(), Some(session()));
        assert!(cache.path().ends_with("resumecraft.session.json"));
    }

    #[test]
    fn test_file_cache_clear() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        cache.store(&session());
        cache.clear();
        assert!(cache.load().is_none());
        // clearing twice is fine
        cache.clear();
    }

    #[test]
    fn test_file_cache_ignores_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        fs::write(cache.path(), "{not json").unwrap();
        assert!(cache.load().is_none());
    }

    #[test]
    fn test_memory_cache() {
        let cache = MemoryCache::new();
        cache.store(&session());
        assert_eq!(cache.load().unwrap().username, "user001");
        cache.clear();
        assert!(cache.load().is_none());
    }
}
