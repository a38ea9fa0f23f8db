use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single message of a batch send, in the provider's wire shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    pub attachments: Vec<Attachment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cc: Option<Vec<String>>,
}

/// File attachment; `content` is base64.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attachment {
    pub filename: String,
    pub content: String,
}

/// Ordered batch submitted in one provider call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BatchRequest(Vec<RenderedEmail>);

impl BatchRequest {
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    pub fn push(&mut self, email: RenderedEmail) {
        self.0.push(email);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn emails(&self) -> &[RenderedEmail] {
        &self.0
    }
}

/// Body of a successful batch send. `raw` is the body exactly as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSendResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<SentEmail>,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub errors: Vec<BatchItemError>,
    #[serde(skip)]
    pub raw: Value,
}

impl BatchSendResponse {
    pub fn from_raw(raw: Value) -> Result<Self, serde_json::Error> {
        let mut response = Self::deserialize(&raw)?;
        response.raw = raw;
        Ok(response)
    }

    /// Accepted batch whose body could not be read.
    pub fn opaque(raw: Value) -> Self {
        Self {
            raw,
            ..Self::default()
        }
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentEmail {
    #[serde(default)]
    pub id: String,
}

/// Provider-side rejection of one message inside an accepted batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItemError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(default)]
    pub message: String,
}

/// Outcome of a dispatch that reached the provider (or had nothing to send).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DispatchResult {
    pub attempted: usize,
    pub message_ids: Vec<String>,
    pub errors: Vec<BatchItemError>,
}

impl DispatchResult {
    pub fn from_response(attempted: usize, response: BatchSendResponse) -> Self {
        Self {
            attempted,
            message_ids: response.data.into_iter().map(|sent| sent.id).collect(),
            errors: response.errors,
        }
    }

    pub fn fully_accepted(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_without_errors_key() {
        let response =
            BatchSendResponse::from_raw(json!({ "data": [{ "id": "m1" }, { "id": "m2" }] }))
                .expect("Should parse response");

        let result = DispatchResult::from_response(2, response);
        assert_eq!(result.message_ids, vec!["m1", "m2"]);
        assert!(result.fully_accepted());
    }

    #[test]
    fn test_response_with_errors() {
        let response = BatchSendResponse::from_raw(json!({
            "data": [{ "id": "m1" }],
            "errors": [{ "index": 1, "message": "Invalid `to` field." }]
        }))
        .expect("Should parse response");

        let result = DispatchResult::from_response(2, response);
        assert!(!result.fully_accepted());
        assert_eq!(result.errors[0].index, Some(1));
    }

    #[test]
    fn test_null_lists_read_as_empty() {
        let response = BatchSendResponse::from_raw(json!({ "data": null, "errors": null }))
            .expect("Should parse response");

        assert!(response.data.is_empty());
        assert!(response.errors.is_empty());
    }

    #[test]
    fn test_error_descriptor_fields_are_optional() {
        let response = BatchSendResponse::from_raw(json!({
            "errors": [{ "message": "Invalid `to` field." }, {}]
        }))
        .expect("Should parse response");

        assert_eq!(response.errors.len(), 2);
        assert_eq!(response.errors[0].index, None);
        assert_eq!(response.errors[0].message, "Invalid `to` field.");
    }

    #[test]
    fn test_raw_body_is_kept() {
        let body = json!({ "data": [{ "id": "m1" }], "object": "batch" });
        let response = BatchSendResponse::from_raw(body.clone()).expect("Should parse response");

        assert_eq!(response.raw, body);
        assert!(BatchSendResponse::from_raw(json!({ "data": "m1" })).is_err());
    }

    #[test]
    fn test_batch_serializes_as_array() {
        let mut batch = BatchRequest::with_capacity(1);
        batch.push(RenderedEmail {
            from: "Org <invitations@spotseeker.lk>".to_string(),
            to: vec!["a@x.com".to_string()],
            subject: "You are invited to Demo".to_string(),
            html: "<p>hi</p>".to_string(),
            attachments: vec![],
            cc: None,
        });

        let value = serde_json::to_value(&batch).expect("Should serialize batch");
        assert!(value.is_array());
        assert!(value[0].get("cc").is_none());
    }
}
