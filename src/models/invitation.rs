use serde::{Deserialize, Deserializer, Serialize};

/// One ticket holder to invite, as handed over by the ordering system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvitationRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub order_id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub event_id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub user_id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc_email: Option<String>,
    pub event_name: String,
    pub event_manager: String,

    // Ticket details used by the templates only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_venue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_package: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_count: Option<u32>,
}

impl InvitationRecord {
    /// Record with only the fields the mailer itself needs.
    pub fn new(
        order_id: impl Into<String>,
        event_id: impl Into<String>,
        user_id: impl Into<String>,
        email: impl Into<String>,
        event_name: impl Into<String>,
        event_manager: impl Into<String>,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            event_id: event_id.into(),
            user_id: user_id.into(),
            email: email.into(),
            cc_email: None,
            event_name: event_name.into(),
            event_manager: event_manager.into(),
            name: None,
            event_date: None,
            event_time: None,
            event_venue: None,
            ticket_package: None,
            ticket_count: None,
        }
    }

    pub fn with_cc(mut self, cc_email: impl Into<String>) -> Self {
        self.cc_email = Some(cc_email.into());
        self
    }
}

/// Upstream ids arrive either as JSON strings or as integers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}
