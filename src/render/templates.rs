use askama::Template;

use super::{TemplateContext, TemplateRenderer, TemplateView};
use crate::error::Result;
use crate::models::InvitationRecord;

#[derive(Template)]
#[template(path = "emails/event_invitation.html")]
struct InvitationEmailView<'a> {
    data: &'a InvitationRecord,
    kind: &'a str,
}

#[derive(Template)]
#[template(path = "pdf/order_ticket.html")]
struct OrderTicketView<'a> {
    data: &'a InvitationRecord,
    kind: &'a str,
}

/// Renders the compiled-in askama templates.
#[derive(Debug, Clone, Default)]
pub struct AskamaRenderer;

impl AskamaRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateRenderer for AskamaRenderer {
    fn render(&self, view: TemplateView, context: TemplateContext<'_>) -> Result<String> {
        let kind = context.kind.as_str();
        let html = match view {
            TemplateView::InvitationEmail => InvitationEmailView {
                data: context.data,
                kind,
            }
            .render()?,
            TemplateView::OrderTicket => OrderTicketView {
                data: context.data,
                kind,
            }
            .render()?,
        };

        tracing::debug!(?view, kind, bytes = html.len(), "Template rendered");
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderKind;

    fn record() -> InvitationRecord {
        let mut record = InvitationRecord::new(
            "ORD123",
            "E1",
            "U1",
            "guest@example.com",
            "Summer Gala",
            "Gala <Org>",
        );
        record.event_venue = Some("Nelum Pokuna".to_string());
        record.ticket_count = Some(2);
        record
    }

    #[test]
    fn test_invitation_email_contains_event_details() {
        let record = record();
        let html = AskamaRenderer::new()
            .render(
                TemplateView::InvitationEmail,
                TemplateContext {
                    data: &record,
                    kind: RenderKind::Mail,
                },
            )
            .expect("Should render invitation");

        assert!(html.contains("Summer Gala"));
        assert!(html.contains("Nelum Pokuna"));
        assert!(html.contains("ORD123"));
        assert!(html.contains("Gala &#60;Org&#62;") || html.contains("Gala &lt;Org&gt;"));
        assert!(html.contains("data-render=\"mail\""));
    }

    #[test]
    fn test_order_ticket_marks_pdf_medium() {
        let record = record();
        let html = AskamaRenderer::new()
            .render(
                TemplateView::OrderTicket,
                TemplateContext {
                    data: &record,
                    kind: RenderKind::Pdf,
                },
            )
            .expect("Should render ticket");

        assert!(html.contains("data-render=\"pdf\""));
        assert!(html.contains("ORD123"));
        assert!(html.contains("<td>2</td>"));
    }
}
