use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};

use super::registry::JobRegistry;
use crate::error::{AppError, Result};
use crate::models::{InvitationBatchJob, InvitationRecord, JobId};

/// Producer side of the in-process job queue.
#[derive(Debug, Clone)]
pub struct JobQueue {
    sender: mpsc::Sender<InvitationBatchJob>,
    registry: Arc<JobRegistry>,
    capacity: usize,
}

impl JobQueue {
    /// Create a queue holding at most `capacity` waiting jobs.
    pub fn bounded(
        capacity: usize,
        registry: Arc<JobRegistry>,
    ) -> (Self, mpsc::Receiver<InvitationBatchJob>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (
            Self {
                sender,
                registry,
                capacity,
            },
            receiver,
        )
    }

    /// Register and queue a batch. Never blocks: a full queue is an error.
    pub fn enqueue(&self, invitations: Vec<InvitationRecord>) -> Result<JobId> {
        let job = InvitationBatchJob::new(invitations);
        let job_id = job.id;
        let batch_size = job.invitations.len();

        self.registry.insert_pending(&job);

        match self.sender.try_send(job) {
            Ok(()) => {
                tracing::info!(job_id = %job_id, batch_size, "Invitation batch queued");
                Ok(job_id)
            }
            Err(err) => {
                self.registry.remove(job_id);
                match err {
                    TrySendError::Full(_) => {
                        tracing::warn!(batch_size, "Invitation queue full, batch rejected");
                        Err(AppError::QueueFull)
                    }
                    TrySendError::Closed(_) => Err(AppError::QueueClosed),
                }
            }
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Free slots right now.
    pub fn available(&self) -> usize {
        self.sender.capacity()
    }

    /// True once the worker has dropped its receiver.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    pub fn registry(&self) -> &Arc<JobRegistry> {
        &self.registry
    }
}
