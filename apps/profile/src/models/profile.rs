use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::timestamp;

/// Returns a fresh opaque id for a new collection entry.
pub fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Entities stored in id-keyed, insertion-ordered collections.
pub trait Identified {
    fn id(&self) -> &str;
}

/// Reads `""` and `null` as `None`; the web form sends empty strings for cleared dates.
fn blank_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.trim().is_empty()))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Profile
// ────────────────────────────────────────────────────────────────────────────

/// The complete career dataset of one user.
///
/// Missing fields deserialize to their defaults so a partial remote document
/// still yields a usable profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub education: Vec<Education>,
    pub work_experiences: Vec<WorkExperience>,
    pub skills: Vec<String>,
    pub resumes: Vec<Document>,
    pub cover_letters: Vec<Document>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: String,
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub start_date: String,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A position held. `current` and a populated `end_date` are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperience {
    pub id: String,
    pub company: String,
    pub position: String,
    pub start_date: String,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub bullets: Vec<String>,
}

impl WorkExperience {
    /// Clears the end date of a current position and drops blank bullets.
    pub fn normalize(&mut self) {
        if self.current {
            self.end_date = None;
        }
        self.end_date = non_blank(self.end_date.take());
        self.bullets.retain(|b| !b.trim().is_empty());
    }

    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }
}

/// A generated resume or cover letter.
///
/// `created_at` is assigned once when the document is created and has no setter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub title: String,
    #[serde(with = "timestamp")]
    created_at: DateTime<Utc>,
    pub content: String,
}

impl Document {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            created_at: Utc::now(),
            content: content.into(),
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Identified for Education {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for WorkExperience {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Document {
    fn id(&self) -> &str {
        &self.id
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Add payloads (no caller-supplied ids)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEducation {
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewEducation {
    pub fn with_id(self, id: String) -> Education {
        Education {
            id,
            institution: self.institution,
            degree: self.degree,
            field: self.field,
            start_date: self.start_date,
            end_date: non_blank(self.end_date),
            description: self.description,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkExperience {
    pub company: String,
    pub position: String,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub bullets: Vec<String>,
}

impl NewWorkExperience {
    pub fn with_id(self, id: String) -> WorkExperience {
        WorkExperience {
            id,
            company: self.company,
            position: self.position,
            start_date: self.start_date,
            end_date: self.end_date,
            current: self.current,
            description: self.description,
            bullets: self.bullets,
        }
        .normalized()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewDocument {
    pub title: String,
    pub content: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Partial payloads
// ────────────────────────────────────────────────────────────────────────────

/// Field-wise personal info change; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
}

/// Partial education entry sent to the direct update endpoint.
/// An empty `end_date` or `description` clears the stored one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EducationPatch {
    pub fn apply_to(&self, target: &mut Education) {
        if let Some(v) = &self.institution {
            target.institution = v.clone();
        }
        if let Some(v) = &self.degree {
            target.degree = v.clone();
        }
        if let Some(v) = &self.field {
            target.field = v.clone();
        }
        if let Some(v) = &self.start_date {
            target.start_date = v.clone();
        }
        if let Some(v) = &self.end_date {
            target.end_date = non_blank(Some(v.clone()));
        }
        if let Some(v) = &self.description {
            target.description = non_blank(Some(v.clone()));
        }
    }
}

impl From<&Education> for EducationPatch {
    fn from(entry: &Education) -> Self {
        Self {
            institution: Some(entry.institution.clone()),
            degree: Some(entry.degree.clone()),
            field: Some(entry.field.clone()),
            start_date: Some(entry.start_date.clone()),
            end_date: Some(entry.end_date.clone().unwrap_or_default()),
            description: Some(entry.description.clone().unwrap_or_default()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperiencePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullets: Option<Vec<String>>,
}

impl WorkExperiencePatch {
    pub fn apply_to(&self, target: &mut WorkExperience) {
        if let Some(v) = &self.company {
            target.company = v.clone();
        }
        if let Some(v) = &self.position {
            target.position = v.clone();
        }
        if let Some(v) = &self.start_date {
            target.start_date = v.clone();
        }
        if let Some(v) = &self.end_date {
            target.end_date = Some(v.clone());
        }
        if let Some(v) = self.current {
            target.current = v;
        }
        if let Some(v) = &self.description {
            target.description = v.clone();
        }
        if let Some(v) = &self.bullets {
            target.bullets = v.clone();
        }
        target.normalize();
    }
}

impl From<&WorkExperience> for WorkExperiencePatch {
    fn from(entry: &WorkExperience) -> Self {
        Self {
            company: Some(entry.company.clone()),
            position: Some(entry.position.clone()),
            start_date: Some(entry.start_date.clone()),
            end_date: Some(entry.end_date.clone().unwrap_or_default()),
            current: Some(entry.current),
            description: Some(entry.description.clone()),
            bullets: Some(entry.bullets.clone()),
        }
    }
}

/// Body of a profile update acknowledgement. A missing `success` counts as success.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Edits
// ────────────────────────────────────────────────────────────────────────────

/// One logical profile edit. Ids of added entries are assigned before the edit is built.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileEdit {
    PersonalInfo(PersonalInfo),
    AddEducation(Education),
    UpdateEducation(Education),
    RemoveEducation(String),
    AddWorkExperience(WorkExperience),
    UpdateWorkExperience(WorkExperience),
    RemoveWorkExperience(String),
    ReplaceSkills(Vec<String>),
    AddResume(Document),
    RemoveResume(String),
    AddCoverLetter(Document),
    RemoveCoverLetter(String),
}

impl Profile {
    /// Computes the profile that results from `edit` without touching `self`.
    ///
    /// Updates and removals that name an unknown id leave the collection as is.
    pub fn apply(&self, edit: ProfileEdit) -> Profile {
        let mut next = self.clone();
        match edit {
            ProfileEdit::PersonalInfo(info) => {
                if let Some(name) = info.name {
                    next.name = name;
                }
                if let Some(email) = info.email {
                    next.email = email;
                }
                if let Some(phone) = info.phone {
                    next.phone = phone;
                }
                if let Some(linkedin) = info.linkedin {
                    next.linkedin = linkedin;
                }
            }
            ProfileEdit::AddEducation(entry) => next.education.push(entry),
            ProfileEdit::UpdateEducation(entry) => replace_by_id(&mut next.education, entry),
            ProfileEdit::RemoveEducation(id) => remove_by_id(&mut next.education, &id),
            ProfileEdit::AddWorkExperience(entry) => next.work_experiences.push(entry.normalized()),
            ProfileEdit::UpdateWorkExperience(entry) => {
                replace_by_id(&mut next.work_experiences, entry.normalized())
            }
            ProfileEdit::RemoveWorkExperience(id) => remove_by_id(&mut next.work_experiences, &id),
            ProfileEdit::ReplaceSkills(skills) => next.skills = skills,
            ProfileEdit::AddResume(doc) => next.resumes.push(doc),
            ProfileEdit::RemoveResume(id) => remove_by_id(&mut next.resumes, &id),
            ProfileEdit::AddCoverLetter(doc) => next.cover_letters.push(doc),
            ProfileEdit::RemoveCoverLetter(id) => remove_by_id(&mut next.cover_letters, &id),
        }
        next
    }

    pub fn education_by_id(&self, id: &str) -> Option<&Education> {
        self.education.iter().find(|e| e.id == id)
    }

    pub fn work_experience_by_id(&self, id: &str) -> Option<&WorkExperience> {
        self.work_experiences.iter().find(|e| e.id == id)
    }
}

/// Returns a new id not used by any item of `items`.
pub fn fresh_id_for<T: Identified>(items: &[T]) -> String {
    loop {
        let id = new_id();
        if !items.iter().any(|item| item.id() == id) {
            return id;
        }
    }
}

fn replace_by_id<T: Identified>(items: &mut [T], replacement: T) {
    if let Some(slot) = items.iter_mut().find(|item| item.id() == replacement.id()) {
        *slot = replacement;
    }
}

fn remove_by_id<T: Identified>(items: &mut Vec<T>, id: &str) {
    items.retain(|item| item.id() != id);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mit() -> NewEducation {
        NewEducation {
            institution: "MIT".to_string(),
            degree: "BS".to_string(),
            field: "CS".to_string(),
            start_date: "2020-01-01".to_string(),
            end_date: Some("2024-01-01".to_string()),
            description: None,
        }
    }

    fn job(current: bool, end_date: Option<&str>) -> WorkExperience {
        NewWorkExperience {
            company: "Acme".to_string(),
            position: "Engineer".to_string(),
            start_date: "2021-06".to_string(),
            end_date: end_date.map(str::to_string),
            current,
            description: "Built things".to_string(),
            bullets: vec!["Shipped v1".to_string(), "  ".to_string(), String::new()],
        }
        .with_id(new_id())
    }

    #[test]
    fn test_apply_does_not_touch_previous_value() {
        let before = Profile::default();
        let after = before.apply(ProfileEdit::AddEducation(mit().with_id(new_id())));
        assert!(before.education.is_empty());
        assert_eq!(after.education.len(), 1);
        assert_eq!(after.education[0].institution, "MIT");
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let profile =
            Profile::default().apply(ProfileEdit::AddEducation(mit().with_id(new_id())));
        let after = profile.apply(ProfileEdit::RemoveEducation("missing".to_string()));
        assert_eq!(after, profile);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let profile =
            Profile::default().apply(ProfileEdit::AddEducation(mit().with_id(new_id())));
        let stray = mit().with_id("missing".to_string());
        let after = profile.apply(ProfileEdit::UpdateEducation(stray));
        assert_eq!(after, profile);
    }

    #[test]
    fn test_update_replaces_matching_entry_in_place() {
        let first = mit().with_id("a".to_string());
        let second = mit().with_id("b".to_string());
        let profile = Profile::default()
            .apply(ProfileEdit::AddEducation(first))
            .apply(ProfileEdit::AddEducation(second));

        let mut edited = profile.education[0].clone();
        edited.degree = "MS".to_string();
        let after = profile.apply(ProfileEdit::UpdateEducation(edited));

        assert_eq!(after.education[0].id, "a");
        assert_eq!(after.education[0].degree, "MS");
        assert_eq!(after.education[1].degree, "BS");
    }

    #[test]
    fn test_current_position_has_no_end_date() {
        let entry = job(true, Some("2023-01"));
        assert!(entry.current);
        assert_eq!(entry.end_date, None);
    }

    #[test]
    fn test_blank_bullets_dropped() {
        let entry = job(false, Some("2023-01"));
        assert_eq!(entry.bullets, vec!["Shipped v1".to_string()]);
        assert_eq!(entry.end_date.as_deref(), Some("2023-01"));
    }

    #[test]
    fn test_update_to_current_clears_end_date() {
        let entry = job(false, Some("2023-01"));
        let profile = Profile::default().apply(ProfileEdit::AddWorkExperience(entry.clone()));
        let mut edited = entry;
        edited.current = true;
        let after = profile.apply(ProfileEdit::UpdateWorkExperience(edited));
        assert_eq!(after.work_experiences[0].end_date, None);
    }

    #[test]
    fn test_personal_info_merges_present_fields() {
        let profile = Profile {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            ..Profile::default()
        };
        let after = profile.apply(ProfileEdit::PersonalInfo(PersonalInfo {
            phone: Some("555-0100".to_string()),
            ..PersonalInfo::default()
        }));
        assert_eq!(after.name, "Ada");
        assert_eq!(after.email, "ada@example.com");
        assert_eq!(after.phone, "555-0100");
    }

    #[test]
    fn test_fresh_id_avoids_existing() {
        let items: Vec<Education> = (0..10).map(|_| mit().with_id(new_id())).collect();
        let id = fresh_id_for(&items);
        assert!(!id.is_empty());
        assert!(items.iter().all(|e| e.id != id));
    }

    #[test]
    fn test_education_patch_merges_fields() {
        let mut entry = mit().with_id("a".to_string());
        let patch = EducationPatch {
            degree: Some("PhD".to_string()),
            end_date: Some(String::new()),
            ..EducationPatch::default()
        };
        patch.apply_to(&mut entry);
        assert_eq!(entry.degree, "PhD");
        assert_eq!(entry.institution, "MIT");
        assert_eq!(entry.end_date, None);
    }

    #[test]
    fn test_education_patch_from_entry_clears_description() {
        let mut remote = mit().with_id("a".to_string());
        remote.description = Some("Dean's list".to_string());
        let local = mit().with_id("a".to_string());
        assert_eq!(local.description, None);

        let patch = EducationPatch::from(&local);
        assert_eq!(patch.description.as_deref(), Some(""));
        patch.apply_to(&mut remote);
        assert_eq!(remote, local);
    }

    #[test]
    fn test_experience_patch_keeps_invariant() {
        let mut entry = job(false, Some("2023-01"));
        let patch = WorkExperiencePatch {
            current: Some(true),
            ..WorkExperiencePatch::default()
        };
        patch.apply_to(&mut entry);
        assert!(entry.current);
        assert_eq!(entry.end_date, None);
        assert_eq!(entry.company, "Acme");
    }

    #[test]
    fn test_deserializes_partial_remote_profile() {
        let json = r#"{
            "name": "John Doe",
            "workExperiences": [{
                "id": "w1", "company": "Acme", "position": "Dev",
                "startDate": "2020", "endDate": "", "current": true
            }],
            "resumes": [{
                "id": "r1", "title": "Resume", "content": "...",
                "createdAt": "2024-05-01T10:00:00.500000"
            }]
        }"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.name, "John Doe");
        assert!(profile.skills.is_empty());
        assert_eq!(profile.work_experiences[0].end_date, None);
        assert_eq!(profile.resumes[0].id, "r1");
    }

    #[test]
    fn test_serializes_camel_case_keys() {
        let profile = Profile::default().apply(ProfileEdit::AddWorkExperience(job(true, None)));
        let value = serde_json::to_value(&profile).unwrap();
        assert!(value.get("workExperiences").is_some());
        assert!(value.get("coverLetters").is_some());
        assert_eq!(value["workExperiences"][0]["current"], true);
        assert!(value["workExperiences"][0].get("startDate").is_some());
    }
}
