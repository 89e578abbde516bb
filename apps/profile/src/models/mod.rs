//! Wire model shared by the profile store, the sync client and the backend.
//!
//! Field names follow the JSON the web client and the backend exchange
//! (camelCase), so a profile document round-trips between them unchanged.

pub mod chat;
pub mod documents;
pub mod generation;
pub mod profile;
pub mod timestamp;

pub use chat::{
    AiConversation, AiConversationSummary, ChatHistory, ChatMessage, ChatReplyRequest,
    ChatReplyResponse, Role, SaveChatRequest, SaveChatResponse, SaveConversationRequest,
    SaveConversationResponse,
};
pub use documents::{DownloadFormat, DownloadRequest, DownloadedFile, UploadedFile};
pub use generation::{GeneratedDocuments, GenerationRequest};
pub use profile::{
    new_id, Document, Education, EducationPatch, Identified, NewDocument, NewEducation,
    NewWorkExperience, PersonalInfo, Profile, ProfileEdit, UpdateAck, WorkExperience,
    WorkExperiencePatch,
};
