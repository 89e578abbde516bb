//! ResumeCraft profile core.
//!
//! Holds the career profile for the active session, keeps it in a local
//! session cache and reconciles it with the remote profile API in the
//! background. Local edits always win for the duration of a session; the
//! remote store is a best-effort sync target.

pub mod cache;
pub mod config;
pub mod conversation;
pub mod errors;
pub mod models;
pub mod store;
pub mod sync;
pub mod template;

pub use cache::{FileCache, MemoryCache, SessionCache};
pub use config::ClientConfig;
pub use conversation::Conversation;
pub use errors::SyncError;
pub use store::{Notification, NotificationLevel, PendingSync, ProfileStore};
pub use sync::{SyncClient, SyncOutcome};
