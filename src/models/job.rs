use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::email::DispatchResult;
use super::invitation::InvitationRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A queued batch; owns its records so every attempt re-sends the same input.
#[derive(Debug, Clone)]
pub struct InvitationBatchJob {
    pub id: JobId,
    pub invitations: Vec<InvitationRecord>,
    pub enqueued_at: DateTime<Utc>,
}

impl InvitationBatchJob {
    pub fn new(invitations: Vec<InvitationRecord>) -> Self {
        Self {
            id: JobId::new(),
            invitations,
            enqueued_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running {
        attempt: u32,
    },
    Retrying {
        attempt: u32,
        next_attempt_at: DateTime<Utc>,
        error: String,
    },
    Completed {
        attempts: u32,
        attempted: usize,
        failed_messages: usize,
    },
    Failed {
        attempts: u32,
        error: String,
    },
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed { .. } | JobStatus::Failed { .. })
    }

    pub fn completed(attempts: u32, result: &DispatchResult) -> Self {
        JobStatus::Completed {
            attempts,
            attempted: result.attempted,
            failed_messages: result.errors.len(),
        }
    }
}

/// Job state as exposed by the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct JobRecord {
    pub job_id: JobId,
    pub batch_size: usize,
    #[serde(flatten)]
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// POST /api/v1/invitations/batch body
#[derive(Debug, Deserialize)]
pub struct EnqueueBatchRequest {
    pub invitations: Vec<InvitationRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EnqueueBatchResponse {
    pub job_id: JobId,
    pub batch_size: usize,
    pub status: String,
}
