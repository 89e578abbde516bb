//! Sync client: the single point of contact with the remote profile and
//! generation APIs.
//!
//! Read paths never fail: they log and hand back an absent/empty value.
//! Write paths report failure as a value (`SyncOutcome::LocalOnly`) except
//! the entry update chain, upload and conversation saves, which return `Err`.

pub mod strategy;

use reqwest::{multipart, Client, Response, Url};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, warn};

use crate::config::ClientConfig;
use crate::errors::SyncError;
use crate::models::{
    AiConversation, AiConversationSummary, ChatHistory, ChatMessage, ChatReplyRequest,
    ChatReplyResponse, DownloadFormat, DownloadRequest, DownloadedFile, EducationPatch,
    GeneratedDocuments, GenerationRequest, Profile, SaveChatRequest, SaveChatResponse,
    SaveConversationRequest, SaveConversationResponse, UpdateAck, UploadedFile,
    WorkExperiencePatch,
};
use crate::template;

pub use strategy::{run_in_order, UpdateStrategy, UPDATE_STRATEGIES};

pub const EMPTY_REPLY: &str = "Sorry, I didn't quite get that.";
pub const FAILED_REPLY: &str = "Sorry, something went wrong while generating a response.";

/// Result of a best-effort push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The remote store accepted the change.
    Synced,
    /// The change only exists locally.
    LocalOnly,
}

#[derive(Clone)]
pub struct SyncClient {
    http: Client,
    base: Url,
}

impl SyncClient {
    pub fn new(config: &ClientConfig) -> Result<Self, SyncError> {
        let base = Url::parse(&config.api_url).map_err(|e| SyncError::InvalidUrl(e.to_string()))?;
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Joins path segments onto the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, SyncError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SyncError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json::<T>().await?)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, SyncError> {
        let response = self.http.get(self.endpoint(segments)).send().await?;
        Self::read_json(response).await
    }

    async fn post_json<B, T>(&self, segments: &[&str], body: &B) -> Result<T, SyncError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .post(self.endpoint(segments))
            .json(body)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn put_json<B, T>(&self, segments: &[&str], body: &B) -> Result<T, SyncError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .put(self.endpoint(segments))
            .json(body)
            .send()
            .await?;
        Self::read_json(response).await
    }

    // ────────────────────────────────────────────────────────────────────────
    // Profile
    // ────────────────────────────────────────────────────────────────────────

    /// GET /api/profile. `None` when the profile cannot be fetched.
    pub async fn fetch_profile(&self) -> Option<Profile> {
        match self.get_json::<Profile>(&["api", "profile"]).await {
            Ok(profile) => {
                debug!("Fetched remote profile for '{}'", profile.name);
                Some(profile)
            }
            Err(e) => {
                warn!("Failed to fetch remote profile: {e}");
                None
            }
        }
    }

    /// POST /api/profile/update with a full or partial profile document.
    pub async fn push_profile<P: Serialize + ?Sized>(&self, payload: &P) -> SyncOutcome {
        match self.try_push_profile(payload).await {
            Ok(()) => {
                debug!("Profile pushed to remote");
                SyncOutcome::Synced
            }
            Err(e) => {
                warn!("Profile kept locally, remote push failed: {e}");
                SyncOutcome::LocalOnly
            }
        }
    }

    async fn try_push_profile<P: Serialize + ?Sized>(&self, payload: &P) -> Result<(), SyncError> {
        let ack: UpdateAck = self.post_json(&["api", "profile", "update"], payload).await?;
        if ack.success == Some(false) {
            return Err(SyncError::Rejected(
                ack.message.unwrap_or_else(|| "profile update rejected".to_string()),
            ));
        }
        Ok(())
    }

    /// Re-fetches the whole profile, lets `splice` edit it, and pushes it back.
    async fn splice_and_push<F>(&self, splice: F) -> Result<(), SyncError>
    where
        F: FnOnce(&mut Profile),
    {
        let mut profile: Profile = self.get_json(&["api", "profile"]).await?;
        splice(&mut profile);
        self.try_push_profile(&profile).await
    }

    /// Updates one education entry, direct endpoint first, whole-profile replace second.
    pub async fn update_education(
        &self,
        id: &str,
        patch: &EducationPatch,
    ) -> Result<UpdateStrategy, SyncError> {
        let label = format!("education {id}");
        run_in_order(&label, &UPDATE_STRATEGIES, |strategy| async move {
            match strategy {
                UpdateStrategy::Direct => self
                    .put_json::<_, serde_json::Value>(&["api", "profile", "education", id], patch)
                    .await
                    .map(|_| ()),
                UpdateStrategy::General => {
                    self.splice_and_push(|profile| {
                        if let Some(entry) = profile.education.iter_mut().find(|e| e.id == id) {
                            patch.apply_to(entry);
                        }
                    })
                    .await
                }
            }
        })
        .await
    }

    /// Updates one work experience entry with the same strategy order as education.
    pub async fn update_work_experience(
        &self,
        id: &str,
        patch: &WorkExperiencePatch,
    ) -> Result<UpdateStrategy, SyncError> {
        let label = format!("work experience {id}");
        run_in_order(&label, &UPDATE_STRATEGIES, |strategy| async move {
            match strategy {
                UpdateStrategy::Direct => self
                    .put_json::<_, serde_json::Value>(
                        &["api", "profile", "work-experience", id],
                        patch,
                    )
                    .await
                    .map(|_| ()),
                UpdateStrategy::General => {
                    self.splice_and_push(|profile| {
                        if let Some(entry) =
                            profile.work_experiences.iter_mut().find(|e| e.id == id)
                        {
                            patch.apply_to(entry);
                        }
                    })
                    .await
                }
            }
        })
        .await
    }

    // ────────────────────────────────────────────────────────────────────────
    // Documents
    // ────────────────────────────────────────────────────────────────────────

    /// POST /api/resume/generate, falling back to the local template on any failure.
    pub async fn generate_documents(&self, request: &GenerationRequest) -> GeneratedDocuments {
        match self
            .post_json::<_, GeneratedDocuments>(&["api", "resume", "generate"], request)
            .await
        {
            Ok(documents) => {
                debug!("Generated documents for '{}'", request.job_title);
                documents
            }
            Err(e) => {
                warn!("Remote generation failed, using local template: {e}");
                template::render_fallback(request)
            }
        }
    }

    /// POST /api/resume/upload as multipart field `file`.
    pub async fn upload_document(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedFile, SyncError> {
        let part = multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = multipart::Form::new().part("file", part);

        let result = async {
            let response = self
                .http
                .post(self.endpoint(&["api", "resume", "upload"]))
                .multipart(form)
                .send()
                .await?;
            Self::read_json::<UploadedFile>(response).await
        }
        .await;

        match &result {
            Ok(uploaded) => debug!("Uploaded '{file_name}' as {}", uploaded.path),
            Err(e) => error!("Failed to upload '{file_name}': {e}"),
        }
        result
    }

    /// POST /api/document/download. When the backend cannot render the
    /// document the raw text is returned as `{file_name}.txt` instead.
    pub async fn download_document(
        &self,
        content: &str,
        file_name: &str,
        format: DownloadFormat,
    ) -> Result<DownloadedFile, SyncError> {
        if content.is_empty() {
            return Err(SyncError::EmptyContent);
        }

        let body = DownloadRequest {
            content: content.to_string(),
            file_name: file_name.to_string(),
            format: format.extension().to_string(),
        };

        match self.fetch_rendered(&body).await {
            Ok(bytes) => Ok(DownloadedFile {
                file_name: format!("{file_name}.{}", format.extension()),
                content_type: format.content_type().to_string(),
                bytes,
                fallback: false,
            }),
            Err(e) => {
                warn!("Backend download failed, falling back to plain text: {e}");
                Ok(DownloadedFile::plain_text(file_name, content))
            }
        }
    }

    async fn fetch_rendered(&self, body: &DownloadRequest) -> Result<Vec<u8>, SyncError> {
        let response = self
            .http
            .post(self.endpoint(&["api", "document", "download"]))
            .json(body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SyncError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    // ────────────────────────────────────────────────────────────────────────
    // Chat
    // ────────────────────────────────────────────────────────────────────────

    /// POST /api/chat/save. Returns the new chat id.
    pub async fn save_chat_history(
        &self,
        messages: &[ChatMessage],
        job_title: &str,
    ) -> Result<String, SyncError> {
        let body = SaveChatRequest {
            chat_messages: messages.to_vec(),
            job_title: Some(job_title.to_string()),
        };
        match self
            .post_json::<_, SaveChatResponse>(&["api", "chat", "save"], &body)
            .await
        {
            Ok(saved) => {
                debug!("Chat history saved as {}", saved.chat_id);
                Ok(saved.chat_id)
            }
            Err(e) => {
                error!("Failed to save chat history for '{job_title}': {e}");
                Err(e)
            }
        }
    }

    /// GET /api/chat/history. Empty when unavailable.
    pub async fn chat_history(&self) -> Vec<ChatHistory> {
        match self.get_json::<Vec<ChatHistory>>(&["api", "chat", "history"]).await {
            Ok(histories) => {
                debug!("Retrieved {} chat histories", histories.len());
                histories
            }
            Err(e) => {
                warn!("Failed to fetch chat history: {e}");
                Vec::new()
            }
        }
    }

    /// POST /api/ai-conversation/save. Returns the conversation id, minted
    /// by the backend when `conversation_id` is `None`.
    pub async fn save_ai_conversation(
        &self,
        conversation_id: Option<&str>,
        job_title: &str,
        messages: &[ChatMessage],
    ) -> Result<String, SyncError> {
        let body = SaveConversationRequest {
            conversation_id: conversation_id.map(str::to_string),
            job_title: Some(job_title.to_string()),
            messages: messages.to_vec(),
        };
        match self
            .post_json::<_, SaveConversationResponse>(&["api", "ai-conversation", "save"], &body)
            .await
        {
            Ok(saved) => {
                debug!("AI conversation saved as {}", saved.conversation_id);
                Ok(saved.conversation_id)
            }
            Err(e) => {
                error!("Failed to save AI conversation for '{job_title}': {e}");
                Err(e)
            }
        }
    }

    /// GET /api/ai-conversation/{id}. `None` when missing or unreachable.
    pub async fn ai_conversation(&self, conversation_id: &str) -> Option<AiConversation> {
        match self
            .get_json::<AiConversation>(&["api", "ai-conversation", conversation_id])
            .await
        {
            Ok(conversation) => Some(conversation),
            Err(e) => {
                warn!("Failed to fetch AI conversation {conversation_id}: {e}");
                None
            }
        }
    }

    /// GET /api/ai-conversation/list. Empty when unavailable.
    pub async fn list_ai_conversations(&self) -> Vec<AiConversationSummary> {
        match self
            .get_json::<Vec<AiConversationSummary>>(&["api", "ai-conversation", "list"])
            .await
        {
            Ok(list) => {
                debug!("Retrieved {} AI conversations", list.len());
                list
            }
            Err(e) => {
                warn!("Failed to list AI conversations: {e}");
                Vec::new()
            }
        }
    }

    /// POST /api/chat/respond. Always yields a displayable reply.
    pub async fn chat_reply(&self, messages: &[ChatMessage]) -> String {
        let body = ChatReplyRequest {
            messages: messages.to_vec(),
        };
        match self
            .post_json::<_, ChatReplyResponse>(&["api", "chat", "respond"], &body)
            .await
        {
            Ok(ChatReplyResponse { reply: Some(reply) }) if !reply.is_empty() => reply,
            Ok(_) => EMPTY_REPLY.to_string(),
            Err(e) => {
                warn!("Chat reply failed: {e}");
                FAILED_REPLY.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(url: &str) -> SyncClient {
        SyncClient::new(&ClientConfig::default().with_api_url(url)).unwrap()
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let c = client("http://localhost:5000");
        assert_eq!(
            c.endpoint(&["api", "profile", "update"]).as_str(),
            "http://localhost:5000/api/profile/update"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path_and_encodes_ids() {
        let c = client("http://example.com/backend/");
        assert_eq!(
            c.endpoint(&["api", "ai-conversation", "a b/c"]).as_str(),
            "http://example.com/backend/api/ai-conversation/a%20b%2Fc"
        );
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let err = SyncClient::new(&ClientConfig::default().with_api_url("not a url"));
        assert!(matches!(err, Err(SyncError::InvalidUrl(_))));
    }
}
