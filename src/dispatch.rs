//! Batch invitation dispatch: render every record, submit one batch, log the outcome.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::{error_trace, Result};
use crate::mail::EmailProvider;
use crate::models::{Attachment, BatchRequest, DispatchResult, InvitationRecord, RenderedEmail};
use crate::render::{
    PdfOptions, PdfRenderer, RenderKind, TemplateContext, TemplateRenderer, TemplateView,
};

/// Sender mailbox; the display name is the event manager's.
pub const INVITATIONS_ADDRESS: &str = "invitations@spotseeker.lk";

/// Builds and sends one invitation email per record in a single provider call.
#[derive(Clone)]
pub struct BatchInvitationDispatcher {
    templates: Arc<dyn TemplateRenderer>,
    pdf: Arc<dyn PdfRenderer>,
    provider: Arc<dyn EmailProvider>,
}

impl BatchInvitationDispatcher {
    pub fn new(
        templates: Arc<dyn TemplateRenderer>,
        pdf: Arc<dyn PdfRenderer>,
        provider: Arc<dyn EmailProvider>,
    ) -> Self {
        Self {
            templates,
            pdf,
            provider,
        }
    }

    /// Render and send the whole batch.
    ///
    /// Any render or provider failure fails the entire call and is returned
    /// as-is so the caller can retry the batch. Per-message rejections
    /// reported by the provider only produce a warning.
    pub async fn dispatch(&self, invitations: &[InvitationRecord]) -> Result<DispatchResult> {
        match self.try_dispatch(invitations).await {
            Ok(result) => Ok(result),
            Err(err) => {
                tracing::error!(
                    error = %err,
                    trace = %error_trace(&err),
                    batch_size = invitations.len(),
                    "Batch invitation emails failed"
                );
                Err(err)
            }
        }
    }

    async fn try_dispatch(&self, invitations: &[InvitationRecord]) -> Result<DispatchResult> {
        if invitations.is_empty() {
            tracing::warn!("Empty invitation batch, nothing to send");
            return Ok(DispatchResult::default());
        }

        let batch = self.prepare_batch(invitations).await?;
        let response = self.provider.send_batch(&batch).await?;

        tracing::info!(
            batch_size = batch.len(),
            response = %response.raw,
            "Batch invitation emails sent successfully"
        );

        if !response.errors.is_empty() {
            tracing::warn!(errors = ?response.errors, "Some emails in batch failed");
        }

        Ok(DispatchResult::from_response(batch.len(), response))
    }

    /// Render every record in input order.
    pub async fn prepare_batch(&self, invitations: &[InvitationRecord]) -> Result<BatchRequest> {
        let options = PdfOptions::ticket();
        let mut batch = BatchRequest::with_capacity(invitations.len());

        for record in invitations {
            let html = self.templates.render(
                TemplateView::InvitationEmail,
                TemplateContext {
                    data: record,
                    kind: RenderKind::Mail,
                },
            )?;

            let ticket_html = self.templates.render(
                TemplateView::OrderTicket,
                TemplateContext {
                    data: record,
                    kind: RenderKind::Pdf,
                },
            )?;
            let pdf = self.pdf.render(&ticket_html, &options).await?;

            batch.push(build_email(record, html, &pdf));

            tracing::info!(
                user_id = %record.user_id,
                event_id = %record.event_id,
                "Prepared invitation email for batch"
            );
        }

        Ok(batch)
    }
}

/// Provider entry for one record.
pub fn build_email(record: &InvitationRecord, html: String, pdf: &[u8]) -> RenderedEmail {
    RenderedEmail {
        from: format!("{} <{}>", record.event_manager, INVITATIONS_ADDRESS),
        to: vec![record.email.clone()],
        subject: format!("You are invited to {}", record.event_name),
        html,
        attachments: vec![Attachment {
            filename: format!("{}.pdf", record.order_id),
            content: BASE64.encode(pdf),
        }],
        cc: record.cc_email.as_ref().map(|cc| vec![cc.clone()]),
    }
}
