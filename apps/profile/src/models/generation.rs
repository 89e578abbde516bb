use serde::{Deserialize, Serialize};

use super::profile::{Document, Education, Profile, WorkExperience};

/// Input of a resume / cover letter generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub job_title: String,
    pub job_description: String,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub work_experience: Vec<WorkExperience>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub previous_resumes: Vec<Document>,
    /// Text of a previously uploaded resume, used as a formatting hint.
    #[serde(default)]
    pub existing_resume_format: Option<String>,
}

impl GenerationRequest {
    /// Builds a request from the profile's collections.
    pub fn from_profile(
        profile: &Profile,
        job_title: impl Into<String>,
        job_description: impl Into<String>,
    ) -> Self {
        Self {
            job_title: job_title.into(),
            job_description: job_description.into(),
            education: profile.education.clone(),
            work_experience: profile.work_experiences.clone(),
            skills: profile.skills.clone(),
            previous_resumes: profile.resumes.clone(),
            existing_resume_format: None,
        }
    }

    pub fn with_existing_resume(mut self, text: impl Into<String>) -> Self {
        self.existing_resume_format = Some(text.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDocuments {
    pub resume: String,
    pub cover_letter: String,
}
