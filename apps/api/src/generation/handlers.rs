//! Axum route handlers for the Generation API.

use axum::{extract::State, Json};
use chrono::Local;
use tracing::info;

use resumecraft_profile::models::{Document, GeneratedDocuments, GenerationRequest};

use crate::errors::AppError;
use crate::generation::generator::generate_documents;
use crate::state::AppState;

/// POST /api/resume/generate
///
/// Generates a tailored resume section and cover letter, files both under
/// the stored profile and returns them.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerationRequest>,
) -> Result<Json<GeneratedDocuments>, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "jobDescription cannot be empty".to_string(),
        ));
    }

    let profile = state.store.profile().await;
    let documents = generate_documents(
        state.llm.as_ref(),
        &profile,
        &request,
        Local::now().date_naive(),
    )
    .await?;

    let job_title = request.job_title.clone();
    state
        .store
        .update_profile(|profile| {
            profile.resumes.push(Document::new(
                format!("Updated Resume for {job_title}"),
                documents.resume.clone(),
            ));
            profile.cover_letters.push(Document::new(
                format!("Cover Letter for {job_title}"),
                documents.cover_letter.clone(),
            ));
            Ok::<_, AppError>(())
        })
        .await?;

    info!("Stored generated documents for '{}'", request.job_title);
    Ok(Json(documents))
}
