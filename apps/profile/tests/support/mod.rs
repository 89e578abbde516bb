//! In-process mock of the remote profile / generation API.
//!
//! Each test binds its own backend on an ephemeral port and flips the
//! failure switches it needs.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};

use resumecraft_profile::models::{
    AiConversation, AiConversationSummary, ChatHistory, EducationPatch, GeneratedDocuments,
    Profile, SaveChatRequest, SaveConversationRequest, WorkExperiencePatch,
};
use resumecraft_profile::{ClientConfig, SyncClient};

#[derive(Default)]
pub struct MockState {
    pub profile: Profile,
    pub fail_profile_get: bool,
    pub fail_profile_update: bool,
    pub fail_direct: bool,
    pub fail_generate: bool,
    pub render_documents: bool,
    /// Reply returned by /api/chat/respond; `None` answers without a reply field.
    pub reply: Option<String>,
    pub pushes: Vec<Profile>,
    pub direct_updates: Vec<String>,
    pub chats: Vec<ChatHistory>,
    pub conversations: HashMap<String, AiConversation>,
    pub uploads: Vec<(String, usize)>,
}

type Shared = Arc<Mutex<MockState>>;

pub struct MockBackend {
    pub url: String,
    state: Shared,
}

impl MockBackend {
    pub async fn spawn(state: MockState) -> Self {
        let state = Arc::new(Mutex::new(state));
        let app = router(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            url: format!("http://{addr}"),
            state,
        }
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    pub fn client(&self) -> SyncClient {
        client_for(&self.url)
    }
}

pub fn client_for(url: &str) -> SyncClient {
    let config = ClientConfig {
        request_timeout: Duration::from_secs(5),
        ..ClientConfig::default()
    }
    .with_api_url(url);
    SyncClient::new(&config).unwrap()
}

/// Client pointed at a port nothing listens on.
pub fn offline_client() -> SyncClient {
    client_for("http://127.0.0.1:9")
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/profile", get(get_profile))
        .route("/api/profile/update", post(update_profile))
        .route("/api/profile/education/:id", put(update_education))
        .route("/api/profile/work-experience/:id", put(update_experience))
        .route("/api/resume/generate", post(generate))
        .route("/api/resume/upload", post(upload))
        .route("/api/document/download", post(download))
        .route("/api/chat/save", post(save_chat))
        .route("/api/chat/history", get(chat_history))
        .route("/api/chat/respond", post(respond))
        .route("/api/ai-conversation/save", post(save_conversation))
        .route("/api/ai-conversation/list", get(list_conversations))
        .route("/api/ai-conversation/:id", get(get_conversation))
        .with_state(state)
}

fn server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": {"code": "INTERNAL_ERROR", "message": "mock failure"}})),
    )
        .into_response()
}

async fn get_profile(State(state): State<Shared>) -> Response {
    let state = state.lock().unwrap();
    if state.fail_profile_get {
        return server_error();
    }
    Json(state.profile.clone()).into_response()
}

async fn update_profile(State(state): State<Shared>, Json(profile): Json<Profile>) -> Response {
    let mut state = state.lock().unwrap();
    if state.fail_profile_update {
        return server_error();
    }
    state.profile = profile.clone();
    state.pushes.push(profile);
    Json(json!({"message": "Profile updated successfully"})).into_response()
}

async fn update_education(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(patch): Json<EducationPatch>,
) -> Response {
    let mut state = state.lock().unwrap();
    if state.fail_direct {
        return server_error();
    }
    state.direct_updates.push(id.clone());
    match state.profile.education.iter_mut().find(|e| e.id == id) {
        Some(entry) => {
            patch.apply_to(entry);
            Json(json!({"education": entry.clone()})).into_response()
        }
        None => (StatusCode::NOT_FOUND, Json(json!({"error": "not found"}))).into_response(),
    }
}

async fn update_experience(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(patch): Json<WorkExperiencePatch>,
) -> Response {
    let mut state = state.lock().unwrap();
    if state.fail_direct {
        return server_error();
    }
    state.direct_updates.push(id.clone());
    match state.profile.work_experiences.iter_mut().find(|e| e.id == id) {
        Some(entry) => {
            patch.apply_to(entry);
            Json(json!({"workExperience": entry.clone()})).into_response()
        }
        None => (StatusCode::NOT_FOUND, Json(json!({"error": "not found"}))).into_response(),
    }
}

async fn generate(State(state): State<Shared>, Json(request): Json<Value>) -> Response {
    if state.lock().unwrap().fail_generate {
        return server_error();
    }
    let title = request["jobTitle"].as_str().unwrap_or_default().to_string();
    Json(GeneratedDocuments {
        resume: format!("Remote resume for {title}"),
        cover_letter: format!("Remote cover letter for {title}"),
    })
    .into_response()
}

async fn upload(State(state): State<Shared>, mut multipart: Multipart) -> Response {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.unwrap();
        let ext = name.rsplit_once('.').map(|(_, e)| e).unwrap_or("bin").to_string();
        state.lock().unwrap().uploads.push((name, bytes.len()));
        let filename = format!("res.{ext}");
        return Json(json!({"filename": filename, "path": format!("resumes/{filename}")}))
            .into_response();
    }
    (StatusCode::BAD_REQUEST, Json(json!({"error": "No file part"}))).into_response()
}

async fn download(State(state): State<Shared>) -> Response {
    if !state.lock().unwrap().render_documents {
        return (StatusCode::NOT_IMPLEMENTED, "not implemented").into_response();
    }
    ([(header::CONTENT_TYPE, "application/pdf")], b"%PDF-1.4 mock".to_vec()).into_response()
}

async fn save_chat(State(state): State<Shared>, Json(body): Json<SaveChatRequest>) -> Response {
    let mut state = state.lock().unwrap();
    let id = format!("chat-{}", state.chats.len() + 1);
    state.chats.push(ChatHistory {
        id: id.clone(),
        job_title: body.job_title.unwrap_or_else(|| "Untitled Job".to_string()),
        timestamp: Utc::now(),
        messages: body.chat_messages,
    });
    Json(json!({"message": "Chat history saved successfully", "chatId": id})).into_response()
}

async fn chat_history(State(state): State<Shared>) -> Response {
    Json(state.lock().unwrap().chats.clone()).into_response()
}

async fn respond(State(state): State<Shared>) -> Response {
    match state.lock().unwrap().reply.clone() {
        Some(reply) => Json(json!({"reply": reply})).into_response(),
        None => Json(json!({})).into_response(),
    }
}

async fn save_conversation(
    State(state): State<Shared>,
    Json(body): Json<SaveConversationRequest>,
) -> Response {
    let mut state = state.lock().unwrap();
    let id = body
        .conversation_id
        .unwrap_or_else(|| format!("conv-{}", state.conversations.len() + 1));
    state.conversations.insert(
        id.clone(),
        AiConversation {
            job_title: body.job_title.unwrap_or_else(|| "Untitled Job".to_string()),
            last_updated: Utc::now(),
            messages: body.messages,
        },
    );
    Json(json!({"message": "Conversation saved successfully", "conversationId": id}))
        .into_response()
}

async fn list_conversations(State(state): State<Shared>) -> Response {
    let state = state.lock().unwrap();
    let list: Vec<AiConversationSummary> = state
        .conversations
        .iter()
        .map(|(id, c)| AiConversationSummary {
            id: id.clone(),
            job_title: c.job_title.clone(),
            last_updated: Some(c.last_updated),
            message_count: c.messages.len(),
        })
        .collect();
    Json(list).into_response()
}

async fn get_conversation(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    match state.lock().unwrap().conversations.get(&id) {
        Some(conversation) => Json(conversation.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Conversation not found"})),
        )
            .into_response(),
    }
}
