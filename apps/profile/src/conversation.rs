//! Chat-based refinement of generated documents.
//!
//! A conversation has no id until its first successful save; from then on
//! the id is fixed and every later save updates the same remote record.

use tracing::warn;

use crate::errors::SyncError;
use crate::models::{ChatMessage, Role};
use crate::sync::SyncClient;

pub const GREETING: &str = "How would you like to improve the generated documents? \
I can help with formatting, wording, or emphasizing different aspects of your experience.";

pub const UNTITLED_JOB: &str = "Untitled Job";

#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    id: Option<String>,
    job_title: String,
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new(job_title: impl Into<String>) -> Self {
        Self {
            id: None,
            job_title: job_title.into(),
            messages: Vec::new(),
        }
    }

    /// Loads a stored conversation. `None` when it cannot be fetched.
    pub async fn resume(client: &SyncClient, id: &str) -> Option<Self> {
        let stored = client.ai_conversation(id).await?;
        Some(Self {
            id: Some(id.to_string()),
            job_title: stored.job_title,
            messages: stored.messages,
        })
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn job_title(&self) -> &str {
        &self.job_title
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    fn title_or_untitled(&self) -> &str {
        if self.job_title.trim().is_empty() {
            UNTITLED_JOB
        } else {
            &self.job_title
        }
    }

    /// Seeds the assistant greeting into an empty conversation and saves it
    /// when a job title is known.
    pub async fn open(&mut self, client: &SyncClient) {
        if !self.messages.is_empty() {
            return;
        }
        self.messages.push(ChatMessage::assistant(GREETING));
        if !self.job_title.trim().is_empty() {
            if let Err(e) = self.save(client).await {
                warn!("Failed to save initial AI conversation: {e}");
            }
        }
    }

    /// Sends a user message, appends the assistant reply and saves the
    /// conversation. Blank input is ignored and returns `None`.
    ///
    /// A failed save is logged; the messages stay in the local transcript.
    pub async fn send(&mut self, client: &SyncClient, text: &str) -> Option<&ChatMessage> {
        if text.trim().is_empty() {
            return None;
        }
        self.messages.push(ChatMessage::user(text));

        let reply = client.chat_reply(&self.messages).await;
        self.messages.push(ChatMessage::assistant(reply));

        if let Err(e) = self.save(client).await {
            warn!("Failed to save AI conversation: {e}");
        }
        self.messages.last().filter(|m| m.role == Role::Assistant)
    }

    /// Saves the conversation and returns its id. The first successful save fixes the id.
    pub async fn save(&mut self, client: &SyncClient) -> Result<&str, SyncError> {
        let saved = client
            .save_ai_conversation(self.id.as_deref(), self.title_or_untitled(), &self.messages)
            .await?;
        Ok(self.id.get_or_insert(saved).as_str())
    }

    /// Archives the transcript to the chat history. Returns the chat id.
    pub async fn archive(&self, client: &SyncClient) -> Result<String, SyncError> {
        client
            .save_chat_history(&self.messages, self.title_or_untitled())
            .await
    }
}
