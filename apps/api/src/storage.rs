//! JSON file storage for the single-user backend.
//!
//! Every file is read and written whole, pretty-printed, behind one async
//! lock so read-modify-write sequences from concurrent requests serialize.
//! A missing or unreadable file reads as its default value.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use resumecraft_profile::models::{AiConversation, ChatHistory, Profile};

const PROFILE_FILE: &str = "user_data.json";
const CHAT_HISTORY_FILE: &str = "chat_history.json";
const CONVERSATIONS_FILE: &str = "ai_conversations.json";
pub const RESUMES_DIR: &str = "resumes";

/// Stored AI conversations keyed by conversation id.
pub type Conversations = BTreeMap<String, AiConversation>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Sample profile served until the user saves their own.
pub fn default_profile() -> Profile {
    Profile {
        name: "John Doe".to_string(),
        email: "john@example.com".to_string(),
        phone: "(123) 456-7890".to_string(),
        linkedin: "linkedin.com/in/johndoe".to_string(),
        skills: vec![
            "JavaScript".to_string(),
            "React".to_string(),
            "Python".to_string(),
        ],
        ..Profile::default()
    }
}

pub struct JsonStore {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl JsonStore {
    /// Opens the data directory, creating it and seeding any missing file.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(dir.join(RESUMES_DIR)).await?;
        let store = Self {
            dir,
            lock: Mutex::new(()),
        };

        if !store.exists(PROFILE_FILE).await {
            store.write(PROFILE_FILE, &default_profile()).await?;
            info!("Created initial profile at {}", store.path(PROFILE_FILE).display());
        }
        if !store.exists(CHAT_HISTORY_FILE).await {
            store.write(CHAT_HISTORY_FILE, &Vec::<ChatHistory>::new()).await?;
        }
        if !store.exists(CONVERSATIONS_FILE).await {
            store.write(CONVERSATIONS_FILE, &Conversations::new()).await?;
        }

        info!("Data directory: {}", store.dir.display());
        Ok(store)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    async fn exists(&self, name: &str) -> bool {
        fs::metadata(self.path(name)).await.is_ok()
    }

    async fn read_or<T, F>(&self, name: &str, fallback: F) -> T
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        let path = self.path(name);
        match fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(value) => value,
                Err(e) => {
                    warn!("Corrupt {}, using defaults: {e}", path.display());
                    fallback()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => fallback(),
            Err(e) => {
                warn!("Failed to read {}, using defaults: {e}", path.display());
                fallback()
            }
        }
    }

    /// Writes through a sibling temp file so a crash never leaves half a document.
    async fn write<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StorageError> {
        let path = self.path(name);
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(value)?;
        fs::write(&tmp, &bytes).await?;
        fs::rename(&tmp, &path).await?;
        debug!("Saved {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    // ────────────────────────────────────────────────────────────────────────
    // Profile
    // ────────────────────────────────────────────────────────────────────────

    pub async fn profile(&self) -> Profile {
        let _guard = self.lock.lock().await;
        self.read_or(PROFILE_FILE, default_profile).await
    }

    /// Runs `edit` on the stored profile under the store lock and saves the
    /// result. Nothing is written when `edit` fails.
    pub async fn update_profile<R, E, F>(&self, edit: F) -> Result<R, E>
    where
        F: FnOnce(&mut Profile) -> Result<R, E>,
        E: From<StorageError>,
    {
        let _guard = self.lock.lock().await;
        let mut profile = self.read_or(PROFILE_FILE, default_profile).await;
        let result = edit(&mut profile)?;
        self.write(PROFILE_FILE, &profile).await?;
        Ok(result)
    }

    // ────────────────────────────────────────────────────────────────────────
    // Chat history & AI conversations
    // ────────────────────────────────────────────────────────────────────────

    pub async fn chat_history(&self) -> Vec<ChatHistory> {
        let _guard = self.lock.lock().await;
        self.read_or(CHAT_HISTORY_FILE, Vec::new).await
    }

    pub async fn append_chat(&self, entry: ChatHistory) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut history: Vec<ChatHistory> = self.read_or(CHAT_HISTORY_FILE, Vec::new).await;
        history.push(entry);
        self.write(CHAT_HISTORY_FILE, &history).await
    }

    pub async fn conversations(&self) -> Conversations {
        let _guard = self.lock.lock().await;
        self.read_or(CONVERSATIONS_FILE, Conversations::new).await
    }

    /// Creates or replaces the conversation stored under `id`.
    pub async fn upsert_conversation(
        &self,
        id: &str,
        conversation: AiConversation,
    ) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut all: Conversations = self.read_or(CONVERSATIONS_FILE, Conversations::new).await;
        all.insert(id.to_string(), conversation);
        self.write(CONVERSATIONS_FILE, &all).await
    }

    // ────────────────────────────────────────────────────────────────────────
    // Uploads
    // ────────────────────────────────────────────────────────────────────────

    /// Stores an uploaded resume as `res{ext}`, overwriting the previous one
    /// with the same extension. Returns the stored file name.
    pub async fn save_upload(&self, original_name: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let ext = Path::new(original_name)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
            .unwrap_or_default();
        let filename = format!("res{ext}");
        let path = self.dir.join(RESUMES_DIR).join(&filename);
        fs::write(&path, bytes).await?;
        info!("Resume saved as {}", path.display());
        Ok(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use resumecraft_profile::models::ChatMessage;

    #[tokio::test]
    async fn test_open_seeds_default_profile() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).await.unwrap();

        let profile = store.profile().await;
        assert_eq!(profile.name, "John Doe");
        assert_eq!(profile.skills, vec!["JavaScript", "React", "Python"]);
        assert!(dir.path().join(RESUMES_DIR).is_dir());
        assert!(store.chat_history().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_profile_reads_as_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).await.unwrap();
        std::fs::write(dir.path().join(PROFILE_FILE), "{not json").unwrap();

        assert_eq!(store.profile().await, default_profile());
    }

    #[tokio::test]
    async fn test_update_profile_persists_only_on_success() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).await.unwrap();

        store
            .update_profile(|p| {
                p.name = "Ada".to_string();
                Ok::<_, StorageError>(())
            })
            .await
            .unwrap();
        assert_eq!(store.profile().await.name, "Ada");

        let failed: Result<(), StorageError> = store
            .update_profile(|p| {
                p.name = "Nobody".to_string();
                Err(StorageError::Io(std::io::Error::new(ErrorKind::Other, "boom")))
            })
            .await;
        assert!(failed.is_err());
        assert_eq!(store.profile().await.name, "Ada");
    }

    #[tokio::test]
    async fn test_upsert_conversation_replaces_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).await.unwrap();

        for n in 1..=2 {
            let conversation = AiConversation {
                job_title: "Engineer".to_string(),
                last_updated: Utc::now(),
                messages: vec![ChatMessage::user("hi"); n],
            };
            store.upsert_conversation("c1", conversation).await.unwrap();
        }

        let all = store.conversations().await;
        assert_eq!(all.len(), 1);
        assert_eq!(all["c1"].messages.len(), 2);
    }

    #[tokio::test]
    async fn test_upload_named_res_with_lowercase_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).await.unwrap();

        let name = store.save_upload("My CV.PDF", b"%PDF").await.unwrap();
        assert_eq!(name, "res.pdf");
        assert!(dir.path().join(RESUMES_DIR).join("res.pdf").is_file());

        let name = store.save_upload("notes", b"plain").await.unwrap();
        assert_eq!(name, "res");
    }
}
