pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::chat::handlers as chat;
use crate::documents::handlers as documents;
use crate::generation::handlers as generation;
use crate::profile::handlers as profile;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Profile API
        .route("/api/profile", get(profile::handle_get_profile))
        .route("/api/profile/update", post(profile::handle_update_profile))
        .route(
            "/api/profile/education/:id",
            put(profile::handle_update_education),
        )
        .route(
            "/api/profile/work-experience/:id",
            put(profile::handle_update_work_experience),
        )
        // Documents
        .route("/api/resume/generate", post(generation::handle_generate))
        .route("/api/resume/upload", post(documents::handle_upload))
        .route("/api/document/download", post(documents::handle_download))
        // Chat & AI conversations
        .route("/api/chat/save", post(chat::handle_save_chat))
        .route("/api/chat/history", get(chat::handle_chat_history))
        .route("/api/chat/respond", post(chat::handle_chat_respond))
        .route(
            "/api/ai-conversation/save",
            post(chat::handle_save_conversation),
        )
        .route(
            "/api/ai-conversation/list",
            get(chat::handle_list_conversations),
        )
        .route(
            "/api/ai-conversation/:id",
            get(chat::handle_get_conversation),
        )
        .with_state(state)
}
