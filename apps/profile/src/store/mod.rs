//! Local profile store: the authoritative profile of the active session.
//!
//! Every mutator commits synchronously (in-memory replace, then cache write)
//! and only then queues the remote reconciliation. Callers see the new state
//! immediately and may await the returned [`PendingSync`] if they care about
//! the remote outcome. A failed sync never rolls the local state back.

pub mod notify;
mod worker;

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::cache::{CachedSession, SessionCache};
use crate::errors::SyncError;
use crate::models::profile::fresh_id_for;
use crate::models::{
    Document, Education, EducationPatch, GeneratedDocuments, GenerationRequest, NewDocument,
    NewEducation, NewWorkExperience, PersonalInfo, Profile, ProfileEdit, WorkExperience,
    WorkExperiencePatch,
};
use crate::sync::{SyncClient, SyncOutcome};

pub use notify::{EditLabel, Notification, NotificationLevel};
use worker::{QueuedJob, SyncJob, SyncResult};

/// Handle on a queued remote reconciliation.
///
/// Dropping it does not cancel the job.
#[must_use = "await `outcome()` to observe the remote result, or drop to fire and forget"]
pub struct PendingSync {
    rx: oneshot::Receiver<SyncResult>,
}

impl PendingSync {
    /// A job that never reached the queue.
    fn resolved(result: SyncResult) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(result);
        Self { rx }
    }

    pub async fn outcome(self) -> Result<SyncOutcome, SyncError> {
        self.rx.await.unwrap_or_else(|_| Err(SyncError::WorkerGone))
    }
}

pub struct ProfileStore {
    username: String,
    profile: Profile,
    client: SyncClient,
    cache: Arc<dyn SessionCache>,
    jobs: mpsc::UnboundedSender<QueuedJob>,
    notifications: Option<mpsc::UnboundedReceiver<Notification>>,
}

impl ProfileStore {
    /// Starts a session: the remote profile if it can be fetched, an empty one otherwise.
    ///
    /// Must be called inside a Tokio runtime; the sync worker is spawned on it.
    pub async fn login(
        username: impl Into<String>,
        client: SyncClient,
        cache: Arc<dyn SessionCache>,
    ) -> Self {
        let username = username.into();
        let profile = match client.fetch_profile().await {
            Some(profile) => {
                info!("Session for '{username}' started from remote profile");
                profile
            }
            None => {
                info!("Session for '{username}' started with an empty profile");
                Profile::default()
            }
        };
        let store = Self::start(username, profile, client, cache);
        store.write_cache();
        store
    }

    /// Resumes the session found in the cache, if any. Reads the cache once.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn restore(client: SyncClient, cache: Arc<dyn SessionCache>) -> Option<Self> {
        let CachedSession { username, profile } = cache.load()?;
        debug!("Restored cached session for '{username}'");
        Some(Self::start(username, profile, client, cache))
    }

    fn start(
        username: String,
        profile: Profile,
        client: SyncClient,
        cache: Arc<dyn SessionCache>,
    ) -> Self {
        let (notify_tx, notify_rx) = mpsc::unbounded_channel();
        let jobs = worker::spawn(client.clone(), notify_tx);
        Self {
            username,
            profile,
            client,
            cache,
            jobs,
            notifications: Some(notify_rx),
        }
    }

    /// Ends the session and forgets the cached profile. Queued jobs still drain.
    pub fn logout(self) {
        self.cache.clear();
        info!("Session for '{}' ended", self.username);
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn client(&self) -> &SyncClient {
        &self.client
    }

    /// Takes the notification stream. Only the first call returns `Some`.
    pub fn take_notifications(&mut self) -> Option<mpsc::UnboundedReceiver<Notification>> {
        self.notifications.take()
    }

    // ────────────────────────────────────────────────────────────────────────
    // Commit plumbing
    // ────────────────────────────────────────────────────────────────────────

    fn write_cache(&self) {
        self.cache.store(&CachedSession {
            username: self.username.clone(),
            profile: self.profile.clone(),
        });
    }

    /// Local replace, then cache write. Never fails.
    fn commit_local(&mut self, edit: ProfileEdit) {
        self.profile = self.profile.apply(edit);
        self.write_cache();
    }

    fn enqueue(&self, job: SyncJob, label: EditLabel) -> PendingSync {
        let (reply, rx) = oneshot::channel();
        if self.jobs.send(QueuedJob { job, label, reply }).is_err() {
            warn!("Sync worker gone; '{} {}' stays local", label.subject, label.verb);
        }
        PendingSync { rx }
    }

    fn commit_and_push(&mut self, edit: ProfileEdit, label: EditLabel) -> PendingSync {
        self.commit_local(edit);
        self.enqueue(SyncJob::PushProfile(self.profile.clone()), label)
    }

    // ────────────────────────────────────────────────────────────────────────
    // Mutators
    // ────────────────────────────────────────────────────────────────────────

    pub fn update_personal_info(&mut self, info: PersonalInfo) -> PendingSync {
        self.commit_and_push(
            ProfileEdit::PersonalInfo(info),
            EditLabel::new("Profile", "updated"),
        )
    }

    pub fn add_education(&mut self, entry: NewEducation) -> (String, PendingSync) {
        let id = fresh_id_for(&self.profile.education);
        let pending = self.commit_and_push(
            ProfileEdit::AddEducation(entry.with_id(id.clone())),
            EditLabel::new("Education", "added"),
        );
        (id, pending)
    }

    /// Replaces the entry with the same id, then runs the direct → general update chain.
    /// An unknown id is a no-op: nothing is queued and the outcome is `LocalOnly`.
    pub fn update_education(&mut self, entry: Education) -> PendingSync {
        if self.profile.education_by_id(&entry.id).is_none() {
            warn!("Education {} not in profile; update ignored", entry.id);
            return PendingSync::resolved(Ok(SyncOutcome::LocalOnly));
        }
        let job = SyncJob::UpdateEducation {
            id: entry.id.clone(),
            patch: EducationPatch::from(&entry),
        };
        self.commit_local(ProfileEdit::UpdateEducation(entry));
        self.enqueue(job, EditLabel::new("Education", "updated"))
    }

    pub fn remove_education(&mut self, id: &str) -> PendingSync {
        self.commit_and_push(
            ProfileEdit::RemoveEducation(id.to_string()),
            EditLabel::new("Education", "removed"),
        )
    }

    pub fn add_work_experience(&mut self, entry: NewWorkExperience) -> (String, PendingSync) {
        let id = fresh_id_for(&self.profile.work_experiences);
        let pending = self.commit_and_push(
            ProfileEdit::AddWorkExperience(entry.with_id(id.clone())),
            EditLabel::new("Experience", "added"),
        );
        (id, pending)
    }

    /// Same contract as [`ProfileStore::update_education`].
    pub fn update_work_experience(&mut self, entry: WorkExperience) -> PendingSync {
        if self.profile.work_experience_by_id(&entry.id).is_none() {
            warn!("Work experience {} not in profile; update ignored", entry.id);
            return PendingSync::resolved(Ok(SyncOutcome::LocalOnly));
        }
        let entry = entry.normalized();
        let job = SyncJob::UpdateWorkExperience {
            id: entry.id.clone(),
            patch: WorkExperiencePatch::from(&entry),
        };
        self.commit_local(ProfileEdit::UpdateWorkExperience(entry));
        self.enqueue(job, EditLabel::new("Experience", "updated"))
    }

    pub fn remove_work_experience(&mut self, id: &str) -> PendingSync {
        self.commit_and_push(
            ProfileEdit::RemoveWorkExperience(id.to_string()),
            EditLabel::new("Experience", "removed"),
        )
    }

    /// Replaces the skill list wholesale. Duplicates are kept.
    pub fn update_skills(&mut self, skills: Vec<String>) -> PendingSync {
        self.commit_and_push(
            ProfileEdit::ReplaceSkills(skills),
            EditLabel::new("Skills", "updated"),
        )
    }

    pub fn add_resume(&mut self, resume: NewDocument) -> (String, PendingSync) {
        let mut doc = Document::new(resume.title, resume.content);
        doc.id = fresh_id_for(&self.profile.resumes);
        let id = doc.id.clone();
        let pending = self.commit_and_push(
            ProfileEdit::AddResume(doc),
            EditLabel::new("Resume", "added"),
        );
        (id, pending)
    }

    pub fn remove_resume(&mut self, id: &str) -> PendingSync {
        self.commit_and_push(
            ProfileEdit::RemoveResume(id.to_string()),
            EditLabel::new("Resume", "removed"),
        )
    }

    pub fn add_cover_letter(&mut self, letter: NewDocument) -> (String, PendingSync) {
        let mut doc = Document::new(letter.title, letter.content);
        doc.id = fresh_id_for(&self.profile.cover_letters);
        let id = doc.id.clone();
        let pending = self.commit_and_push(
            ProfileEdit::AddCoverLetter(doc),
            EditLabel::new("Cover letter", "added"),
        );
        (id, pending)
    }

    pub fn remove_cover_letter(&mut self, id: &str) -> PendingSync {
        self.commit_and_push(
            ProfileEdit::RemoveCoverLetter(id.to_string()),
            EditLabel::new("Cover letter", "removed"),
        )
    }

    // ────────────────────────────────────────────────────────────────────────
    // Generation
    // ────────────────────────────────────────────────────────────────────────

    /// Generates documents from the current profile. Never fails; see
    /// [`SyncClient::generate_documents`].
    pub async fn generate(
        &self,
        job_title: &str,
        job_description: &str,
        existing_resume: Option<&str>,
    ) -> GeneratedDocuments {
        let mut request =
            GenerationRequest::from_profile(&self.profile, job_title, job_description);
        if let Some(text) = existing_resume {
            request = request.with_existing_resume(text);
        }
        self.client.generate_documents(&request).await
    }

    /// Files generated (possibly hand-edited) documents under the job title.
    /// Empty texts are skipped.
    pub fn save_generated(
        &mut self,
        job_title: &str,
        documents: &GeneratedDocuments,
    ) -> Vec<PendingSync> {
        let mut pending = Vec::with_capacity(2);
        if !documents.resume.is_empty() {
            let (_, sync) = self.add_resume(NewDocument {
                title: format!("Resume for {job_title}"),
                content: documents.resume.clone(),
            });
            pending.push(sync);
        }
        if !documents.cover_letter.is_empty() {
            let (_, sync) = self.add_cover_letter(NewDocument {
                title: format!("Cover Letter for {job_title}"),
                content: documents.cover_letter.clone(),
            });
            pending.push(sync);
        }
        pending
    }
}
