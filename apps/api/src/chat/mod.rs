//! Chat history, AI conversations and the refinement assistant.

pub mod handlers;
pub mod prompts;

use resumecraft_profile::models::AiConversationSummary;

use crate::storage::Conversations;

pub const UNTITLED_JOB: &str = "Untitled Job";

/// Falls back to [`UNTITLED_JOB`] when no title was sent.
pub fn title_or_untitled(job_title: Option<String>) -> String {
    job_title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| UNTITLED_JOB.to_string())
}

pub fn summarize(conversations: &Conversations) -> Vec<AiConversationSummary> {
    conversations
        .iter()
        .map(|(id, conversation)| AiConversationSummary {
            id: id.clone(),
            job_title: conversation.job_title.clone(),
            last_updated: Some(conversation.last_updated),
            message_count: conversation.messages.len(),
        })
        .collect()
}
