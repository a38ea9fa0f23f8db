pub mod resend;

pub use resend::ResendMailer;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{BatchRequest, BatchSendResponse};

/// Transactional email provider (currently backed by Resend)
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Submit the whole batch in one call.
    async fn send_batch(&self, batch: &BatchRequest) -> Result<BatchSendResponse>;
}
