//! Axum route handlers for the Profile API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use resumecraft_profile::models::{EducationPatch, Profile, UpdateAck, WorkExperiencePatch};

use crate::errors::AppError;
use crate::profile::merge_known_keys;
use crate::state::AppState;

/// GET /api/profile
pub async fn handle_get_profile(State(state): State<AppState>) -> Json<Profile> {
    Json(state.store.profile().await)
}

/// POST /api/profile/update
///
/// Accepts a full or partial profile document. Only keys the stored profile
/// already has are replaced.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<UpdateAck>, AppError> {
    let Value::Object(update) = body else {
        return Err(AppError::Validation(
            "Profile update must be a JSON object".to_string(),
        ));
    };

    state
        .store
        .update_profile(|profile| {
            *profile = merge_known_keys(profile, update)
                .map_err(|e| AppError::Validation(format!("Invalid profile field: {e}")))?;
            Ok::<_, AppError>(())
        })
        .await?;

    info!("Profile updated");
    Ok(Json(UpdateAck {
        success: Some(true),
        message: Some("Profile updated successfully".to_string()),
    }))
}

/// PUT /api/profile/education/:id
pub async fn handle_update_education(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<EducationPatch>,
) -> Result<Json<Value>, AppError> {
    let updated = state
        .store
        .update_profile(|profile| {
            let entry = profile
                .education
                .iter_mut()
                .find(|e| e.id == id)
                .ok_or_else(|| AppError::NotFound("Education entry not found".to_string()))?;
            patch.apply_to(entry);
            Ok::<_, AppError>(entry.clone())
        })
        .await?;

    info!("Education entry {id} updated");
    Ok(Json(json!({
        "message": "Education entry updated successfully",
        "education": updated
    })))
}

/// PUT /api/profile/work-experience/:id
pub async fn handle_update_work_experience(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<WorkExperiencePatch>,
) -> Result<Json<Value>, AppError> {
    let updated = state
        .store
        .update_profile(|profile| {
            let entry = profile
                .work_experiences
                .iter_mut()
                .find(|e| e.id == id)
                .ok_or_else(|| AppError::NotFound("Work experience entry not found".to_string()))?;
            patch.apply_to(entry);
            Ok::<_, AppError>(entry.clone())
        })
        .await?;

    info!("Work experience entry {id} updated");
    Ok(Json(json!({
        "message": "Work experience entry updated successfully",
        "workExperience": updated
    })))
}
