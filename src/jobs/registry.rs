use chrono::Utc;
use dashmap::DashMap;

use crate::models::{InvitationBatchJob, JobId, JobRecord, JobStatus};

/// In-memory job state, written by the worker and read by the status API.
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: DashMap<JobId, JobRecord>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a new job as pending; its enqueue time becomes `created_at`.
    pub fn insert_pending(&self, job: &InvitationBatchJob) {
        self.jobs.insert(
            job.id,
            JobRecord {
                job_id: job.id,
                batch_size: job.invitations.len(),
                status: JobStatus::Pending,
                created_at: job.enqueued_at,
                updated_at: job.enqueued_at,
            },
        );
    }

    pub fn set_status(&self, job_id: JobId, status: JobStatus) {
        match self.jobs.get_mut(&job_id) {
            Some(mut record) => {
                record.status = status;
                record.updated_at = Utc::now();
            }
            None => tracing::warn!(job_id = %job_id, "Status update for unknown job"),
        }
    }

    pub fn remove(&self, job_id: JobId) {
        self.jobs.remove(&job_id);
    }

    pub fn get(&self, job_id: JobId) -> Option<JobRecord> {
        self.jobs.get(&job_id).map(|record| record.clone())
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
