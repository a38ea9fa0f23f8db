//! In-process job queue and the worker that retries failed batches.

pub mod policy;
pub mod queue;
pub mod registry;
pub mod worker;

pub use policy::{RetryPolicy, INVITATION_BACKOFF_SECONDS};
pub use queue::JobQueue;
pub use registry::JobRegistry;
pub use worker::Worker;
