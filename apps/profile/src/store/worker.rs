//! Background reconciliation worker.
//!
//! One task per session drains jobs strictly in enqueue order, so remote
//! writes land in the same order as the local edits that produced them.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use super::notify::{EditLabel, Notification};
use crate::errors::SyncError;
use crate::models::{EducationPatch, Profile, WorkExperiencePatch};
use crate::sync::{SyncClient, SyncOutcome};

pub type SyncResult = Result<SyncOutcome, SyncError>;

#[derive(Debug)]
pub enum SyncJob {
    PushProfile(Profile),
    UpdateEducation { id: String, patch: EducationPatch },
    UpdateWorkExperience { id: String, patch: WorkExperiencePatch },
}

pub struct QueuedJob {
    pub job: SyncJob,
    pub label: EditLabel,
    pub reply: oneshot::Sender<SyncResult>,
}

/// Spawns the worker on the current Tokio runtime and returns its job queue.
/// The worker exits once every sender is dropped and the queue is drained.
pub fn spawn(
    client: SyncClient,
    notifier: mpsc::UnboundedSender<Notification>,
) -> mpsc::UnboundedSender<QueuedJob> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(run(client, rx, notifier));
    tx
}

async fn run(
    client: SyncClient,
    mut jobs: mpsc::UnboundedReceiver<QueuedJob>,
    notifier: mpsc::UnboundedSender<Notification>,
) {
    debug!("Sync worker started");
    while let Some(QueuedJob { job, label, reply }) = jobs.recv().await {
        let result = execute(&client, job).await;

        let notification = match &result {
            Ok(SyncOutcome::Synced) => label.synced(),
            Ok(SyncOutcome::LocalOnly) => label.local_only(),
            Err(e) => label.failed(&e.to_string()),
        };
        // Nobody listening is fine.
        let _ = notifier.send(notification);
        let _ = reply.send(result);
    }
    info!("Sync worker stopped");
}

async fn execute(client: &SyncClient, job: SyncJob) -> SyncResult {
    match job {
        SyncJob::PushProfile(profile) => Ok(client.push_profile(&profile).await),
        SyncJob::UpdateEducation { id, patch } => client
            .update_education(&id, &patch)
            .await
            .map(|_| SyncOutcome::Synced),
        SyncJob::UpdateWorkExperience { id, patch } => client
            .update_work_experience(&id, &patch)
            .await
            .map(|_| SyncOutcome::Synced),
    }
}
