use std::sync::Arc;

use crate::config::Config;
use crate::jobs::{JobQueue, JobRegistry};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub queue: JobQueue,
    pub jobs: Arc<JobRegistry>,
}

impl AppState {
    pub fn new(config: Config, queue: JobQueue) -> Self {
        let jobs = queue.registry().clone();
        Self {
            config: Arc::new(config),
            queue,
            jobs,
        }
    }
}
