use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinError, JoinSet};

use super::policy::RetryPolicy;
use super::registry::JobRegistry;
use crate::dispatch::BatchInvitationDispatcher;
use crate::models::{InvitationBatchJob, JobStatus};

/// Consumes queued batches and runs each one with retries.
pub struct Worker {
    runner: JobRunner,
    shutdown_grace: Duration,
}

impl Worker {
    pub fn new(
        dispatcher: BatchInvitationDispatcher,
        registry: Arc<JobRegistry>,
        policy: RetryPolicy,
        max_concurrent: usize,
        shutdown_grace: Duration,
    ) -> Self {
        Self {
            runner: JobRunner {
                dispatcher,
                registry,
                policy,
                permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            },
            shutdown_grace,
        }
    }

    /// Run until every queue sender is dropped, then wait for in-flight jobs.
    pub async fn run(self, mut receiver: mpsc::Receiver<InvitationBatchJob>) {
        let mut in_flight = JoinSet::new();
        tracing::info!(
            max_concurrent = self.runner.permits.available_permits(),
            "Invitation worker started"
        );

        loop {
            tokio::select! {
                job = receiver.recv() => match job {
                    Some(job) => {
                        let runner = self.runner.clone();
                        in_flight.spawn(runner.run(job));
                    }
                    None => break,
                },
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    log_join(joined);
                }
            }
        }

        if !in_flight.is_empty() {
            tracing::info!(in_flight = in_flight.len(), "Waiting for in-flight invitation jobs");
        }

        let drained = tokio::time::timeout(self.shutdown_grace, async {
            while let Some(joined) = in_flight.join_next().await {
                log_join(joined);
            }
        })
        .await;

        if drained.is_err() {
            tracing::warn!(
                aborted = in_flight.len(),
                "Shutdown grace period elapsed, aborting in-flight invitation jobs"
            );
            in_flight.shutdown().await;
        }

        tracing::info!("Invitation worker stopped");
    }
}

fn log_join(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        if e.is_panic() {
            tracing::error!(error = %e, "Invitation job panicked");
        }
    }
}

/// Executes one job: dispatch, and on failure wait out the backoff and
/// dispatch the same records again.
#[derive(Clone)]
pub(crate) struct JobRunner {
    dispatcher: BatchInvitationDispatcher,
    registry: Arc<JobRegistry>,
    policy: RetryPolicy,
    permits: Arc<Semaphore>,
}

impl JobRunner {
    pub(crate) async fn run(self, job: InvitationBatchJob) {
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;

            // A slot is held per attempt, not across backoff sleeps.
            let outcome = {
                let Ok(_permit) = self.permits.acquire().await else {
                    return;
                };
                self.registry
                    .set_status(job.id, JobStatus::Running { attempt });
                tracing::info!(
                    job_id = %job.id,
                    attempt,
                    max_attempts,
                    batch_size = job.invitations.len(),
                    "Running invitation batch job"
                );
                self.dispatcher.dispatch(&job.invitations).await
            };

            let err = match outcome {
                Ok(result) => {
                    tracing::info!(
                        job_id = %job.id,
                        attempts = attempt,
                        attempted = result.attempted,
                        failed_messages = result.errors.len(),
                        "Invitation batch job completed"
                    );
                    self.registry
                        .set_status(job.id, JobStatus::completed(attempt, &result));
                    return;
                }
                Err(err) => err,
            };

            match self.policy.delay_after_attempt(attempt) {
                Some(delay) => {
                    let next_attempt_at =
                        Utc::now() + chrono::Duration::from_std(delay).unwrap_or_default();
                    tracing::warn!(
                        job_id = %job.id,
                        attempt,
                        retry_in_secs = delay.as_secs(),
                        error = %err,
                        "Invitation batch job failed, retry scheduled"
                    );
                    self.registry.set_status(
                        job.id,
                        JobStatus::Retrying {
                            attempt,
                            next_attempt_at,
                            error: err.to_string(),
                        },
                    );
                    tokio::time::sleep(delay).await;
                }
                None => {
                    tracing::error!(
                        job_id = %job.id,
                        attempts = attempt,
                        batch_size = job.invitations.len(),
                        error = %err,
                        "Invitation batch job failed permanently, retries exhausted"
                    );
                    self.registry.set_status(
                        job.id,
                        JobStatus::Failed {
                            attempts: attempt,
                            error: err.to_string(),
                        },
                    );
                    return;
                }
            }
        }
    }
}
