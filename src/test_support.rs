//! In-memory collaborators and log capture for unit tests.

use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use tokio::sync::mpsc;
use tracing_subscriber::fmt::MakeWriter;

use crate::config::test_config;
use crate::error::{AppError, Result};
use crate::jobs::{JobQueue, JobRegistry};
use crate::mail::EmailProvider;
use crate::models::{BatchRequest, BatchSendResponse, InvitationBatchJob, InvitationRecord};
use crate::render::{
    PdfOptions, PdfRenderer, RenderKind, TemplateContext, TemplateRenderer, TemplateView,
};
use crate::state::AppState;

pub const FAKE_PDF_BYTES: &[u8] = b"%PDF-1.4 fake ticket";

pub fn record(order_id: &str) -> InvitationRecord {
    InvitationRecord::new(
        order_id,
        "E1",
        format!("U-{}", order_id),
        format!("{}@example.com", order_id.to_lowercase()),
        "Summer Gala",
        "Gala Org",
    )
}

/// App state over a queue of capacity 8; keep the receiver alive to keep the queue open.
pub fn test_state(token: Option<&str>) -> (AppState, mpsc::Receiver<InvitationBatchJob>) {
    let mut config = test_config();
    config.intake_api_token = token.map(str::to_string);
    let (queue, receiver) = JobQueue::bounded(config.queue_capacity, Arc::new(JobRegistry::new()));
    (AppState::new(config, queue), receiver)
}

pub async fn read_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Renders `"<kind>:<order_id>"`, optionally failing for one order.
#[derive(Debug, Clone, Default)]
pub struct FakeTemplates {
    fail_on: Option<String>,
}

impl FakeTemplates {
    pub fn failing_on(order_id: &str) -> Self {
        Self {
            fail_on: Some(order_id.to_string()),
        }
    }
}

impl TemplateRenderer for FakeTemplates {
    fn render(&self, _view: TemplateView, context: TemplateContext<'_>) -> Result<String> {
        if self.fail_on.as_deref() == Some(context.data.order_id.as_str()) {
            return Err(AppError::Template(format!(
                "missing variable for order {}",
                context.data.order_id
            )));
        }
        let prefix = match context.kind {
            RenderKind::Mail => "mail",
            RenderKind::Pdf => "pdf",
        };
        Ok(format!("{}:{}", prefix, context.data.order_id))
    }
}

/// Returns fixed bytes and records every call.
#[derive(Debug, Clone, Default)]
pub struct FakePdf {
    calls: Arc<Mutex<Vec<(String, PdfOptions)>>>,
}

impl FakePdf {
    pub fn calls(&self) -> Vec<(String, PdfOptions)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PdfRenderer for FakePdf {
    async fn render(&self, html: &str, options: &PdfOptions) -> Result<Vec<u8>> {
        self.calls
            .lock()
            .unwrap()
            .push((html.to_string(), options.clone()));
        Ok(FAKE_PDF_BYTES.to_vec())
    }
}

#[derive(Debug, Clone)]
enum ProviderBehaviour {
    Accept,
    Respond(BatchSendResponse),
    Fail(u16),
}

/// Records submitted batches; fails the first `failures` calls when configured.
#[derive(Debug, Clone)]
pub struct FakeProvider {
    behaviour: ProviderBehaviour,
    failures_left: Arc<Mutex<u32>>,
    sent: Arc<Mutex<Vec<BatchRequest>>>,
    calls: Arc<Mutex<u32>>,
}

impl FakeProvider {
    fn with(behaviour: ProviderBehaviour, failures: u32) -> Self {
        Self {
            behaviour,
            failures_left: Arc::new(Mutex::new(failures)),
            sent: Arc::default(),
            calls: Arc::default(),
        }
    }

    pub fn accepting() -> Self {
        Self::with(ProviderBehaviour::Accept, 0)
    }

    pub fn responding(response: BatchSendResponse) -> Self {
        Self::with(ProviderBehaviour::Respond(response), 0)
    }

    pub fn failing(status: u16) -> Self {
        Self::with(ProviderBehaviour::Fail(status), 0)
    }

    /// Fails with a 500 `failures` times, then accepts.
    pub fn flaky(failures: u32) -> Self {
        Self::with(ProviderBehaviour::Accept, failures)
    }

    pub fn sent_batches(&self) -> Vec<BatchRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn calls(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl EmailProvider for FakeProvider {
    async fn send_batch(&self, batch: &BatchRequest) -> Result<BatchSendResponse> {
        *self.calls.lock().unwrap() += 1;

        {
            let mut failures_left = self.failures_left.lock().unwrap();
            if *failures_left > 0 {
                *failures_left -= 1;
                return Err(AppError::Provider {
                    status: 500,
                    body: "internal_server_error".to_string(),
                });
            }
        }

        match &self.behaviour {
            ProviderBehaviour::Fail(status) => Err(AppError::Provider {
                status: *status,
                body: "service unavailable".to_string(),
            }),
            ProviderBehaviour::Respond(response) => {
                self.sent.lock().unwrap().push(batch.clone());
                Ok(response.clone())
            }
            ProviderBehaviour::Accept => {
                self.sent.lock().unwrap().push(batch.clone());
                let data: Vec<_> = (0..batch.len())
                    .map(|i| serde_json::json!({ "id": format!("msg-{}", i) }))
                    .collect();
                Ok(BatchSendResponse::from_raw(serde_json::json!({ "data": data })).unwrap())
            }
        }
    }
}

/// Collects formatted log lines from a thread-local subscriber.
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::TRACE)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock().unwrap()).into_owned()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.contents().contains(needle)
    }

    pub fn count(&self, needle: &str) -> usize {
        self.contents().matches(needle).count()
    }

    /// Lines emitted at `level` ("INFO", "WARN", "ERROR", ...).
    pub fn lines_at(&self, level: &str) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.trim_start().starts_with(level))
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
