//! Axum route handlers for chat history, AI conversations and replies.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use resumecraft_profile::models::{
    AiConversation, AiConversationSummary, ChatHistory, ChatReplyRequest,
    ChatReplyResponse, SaveChatRequest, SaveChatResponse, SaveConversationRequest,
    SaveConversationResponse,
};

use crate::chat::prompts::AGENT_SYSTEM;
use crate::chat::{summarize, title_or_untitled};
use crate::errors::AppError;
use crate::state::AppState;

/// POST /api/chat/save
pub async fn handle_save_chat(
    State(state): State<AppState>,
    Json(request): Json<SaveChatRequest>,
) -> Result<Json<SaveChatResponse>, AppError> {
    let entry = ChatHistory {
        id: Uuid::new_v4().to_string(),
        job_title: title_or_untitled(request.job_title),
        timestamp: Utc::now(),
        messages: request.chat_messages,
    };
    let chat_id = entry.id.clone();
    let job_title = entry.job_title.clone();

    state.store.append_chat(entry).await?;

    info!("Chat history saved for '{job_title}'");
    Ok(Json(SaveChatResponse {
        chat_id,
        message: Some("Chat history saved successfully".to_string()),
    }))
}

/// GET /api/chat/history
pub async fn handle_chat_history(State(state): State<AppState>) -> Json<Vec<ChatHistory>> {
    Json(state.store.chat_history().await)
}

/// POST /api/chat/respond
pub async fn handle_chat_respond(
    State(state): State<AppState>,
    Json(request): Json<ChatReplyRequest>,
) -> Result<Json<ChatReplyResponse>, AppError> {
    if request.messages.is_empty() {
        return Err(AppError::Validation("No messages provided".to_string()));
    }

    let reply = state.llm.complete(AGENT_SYSTEM, &request.messages).await?;

    Ok(Json(ChatReplyResponse { reply: Some(reply) }))
}

/// POST /api/ai-conversation/save
///
/// Upserts by `conversationId`, minting one when absent.
pub async fn handle_save_conversation(
    State(state): State<AppState>,
    Json(request): Json<SaveConversationRequest>,
) -> Result<Json<SaveConversationResponse>, AppError> {
    let conversation_id = request
        .conversation_id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let conversation = AiConversation {
        job_title: title_or_untitled(request.job_title),
        last_updated: Utc::now(),
        messages: request.messages,
    };
    state
        .store
        .upsert_conversation(&conversation_id, conversation)
        .await?;

    info!("AI conversation {conversation_id} saved");
    Ok(Json(SaveConversationResponse {
        conversation_id,
        message: Some("Conversation saved successfully".to_string()),
    }))
}

/// GET /api/ai-conversation/:id
pub async fn handle_get_conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> Result<Json<AiConversation>, AppError> {
    state
        .store
        .conversations()
        .await
        .remove(&conversation_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Conversation not found".to_string()))
}

/// GET /api/ai-conversation/list
pub async fn handle_list_conversations(
    State(state): State<AppState>,
) -> Json<Vec<AiConversationSummary>> {
    Json(summarize(&state.store.conversations().await))
}
