use async_trait::async_trait;
use reqwest::Client;

use super::EmailProvider;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{BatchRequest, BatchSendResponse};

#[derive(Clone)]
pub struct ResendMailer {
    client: Client,
    api_key: String,
    base_url: String,
}

impl ResendMailer {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.provider_timeout())
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.resend_api_key.clone(),
            base_url: config.resend_api_url.clone(),
        })
    }

    fn batch_url(&self) -> String {
        format!("{}/emails/batch", self.base_url)
    }
}

#[async_trait]
impl EmailProvider for ResendMailer {
    async fn send_batch(&self, batch: &BatchRequest) -> Result<BatchSendResponse> {
        // Permissive validation: bad messages are reported in `errors`
        // instead of rejecting the whole batch.
        let res = self
            .client
            .post(self.batch_url())
            .bearer_auth(&self.api_key)
            .header("x-batch-validation", "permissive")
            .json(batch)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(AppError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        // Accepted batch: an unreadable body is logged, never retried.
        let raw = serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body));
        match BatchSendResponse::from_raw(raw.clone()) {
            Ok(response) => Ok(response),
            Err(e) => {
                tracing::warn!(
                    status = status.as_u16(),
                    error = %e,
                    body = %raw,
                    "Batch accepted but the response body is unreadable"
                );
                Ok(BatchSendResponse::opaque(raw))
            }
        }
    }
}
