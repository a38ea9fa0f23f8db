use std::time::Duration;

/// Seconds to wait before each retry of a failed invitation batch.
pub const INVITATION_BACKOFF_SECONDS: [u64; 3] = [300, 600, 900];

/// Fixed, per-retry backoff schedule.
///
/// A job gets one initial attempt plus one retry per entry in `backoff`;
/// entry `n` is the wait after failed attempt `n + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    backoff: Vec<Duration>,
}

impl RetryPolicy {
    pub fn new(backoff: Vec<Duration>) -> Self {
        Self { backoff }
    }

    pub fn invitation_batch() -> Self {
        Self::new(
            INVITATION_BACKOFF_SECONDS
                .iter()
                .copied()
                .map(Duration::from_secs)
                .collect(),
        )
    }

    pub fn backoff(&self) -> &[Duration] {
        &self.backoff
    }

    pub fn max_attempts(&self) -> u32 {
        self.backoff.len() as u32 + 1
    }

    /// Delay before the next attempt after `attempt` (1-based) failed,
    /// or `None` when retries are exhausted.
    pub fn delay_after_attempt(&self, attempt: u32) -> Option<Duration> {
        let index = attempt.checked_sub(1)? as usize;
        self.backoff.get(index).copied()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::invitation_batch()
    }
}
