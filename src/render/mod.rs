//! HTML and PDF rendering collaborators used by the dispatcher.

pub mod pdf;
pub mod templates;

pub use pdf::{PdfOptions, WkhtmltopdfRenderer};
pub use templates::AskamaRenderer;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::InvitationRecord;

/// Templates known to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateView {
    /// Body of the invitation email
    InvitationEmail,
    /// Printable order/ticket page, converted to PDF
    OrderTicket,
}

/// Output medium a template is being rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderKind {
    Mail,
    Pdf,
}

impl RenderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderKind::Mail => "mail",
            RenderKind::Pdf => "pdf",
        }
    }
}

/// Context a template is rendered with: the record plus the medium.
#[derive(Debug, Clone, Copy)]
pub struct TemplateContext<'a> {
    pub data: &'a InvitationRecord,
    pub kind: RenderKind,
}

pub trait TemplateRenderer: Send + Sync {
    fn render(&self, view: TemplateView, context: TemplateContext<'_>) -> Result<String>;
}

#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(&self, html: &str, options: &PdfOptions) -> Result<Vec<u8>>;
}
