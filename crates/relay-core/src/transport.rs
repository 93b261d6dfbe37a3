//! Reply transport port and wire types.
//!
//! One exchange is a single POST of a JSON envelope to the configured
//! webhook endpoint; the response body is any JSON object. The transport
//! implementation only moves bytes - envelope construction and reply
//! extraction live here, next to the domain.

use crate::error::Result;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reply fields probed in order; the first present, non-null one wins.
pub const REPLY_FIELDS: [&str; 4] = ["output", "text", "answer", "message"];

/// A file queued for one exchange.
///
/// One attachment per send; callers holding several files issue one send
/// per file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttachment {
    /// Original file name
    pub file_name: String,
    /// MIME type of the file
    pub mime_type: String,
    /// Raw file content
    pub data: Vec<u8>,
}

impl FileAttachment {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            data,
        }
    }
}

/// The JSON envelope posted to the webhook endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatEnvelope {
    /// The user's message text
    #[serde(rename = "chatInput")]
    pub chat_input: String,
    /// Attached file content, present only when a file rides along
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary: Option<BinaryEnvelope>,
}

/// Container for the attached file slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryEnvelope {
    pub file1: FilePart,
}

/// One base64-encoded file inside the envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilePart {
    /// Base64 content, no data-URL prefix
    pub data: String,
    #[serde(rename = "fileName")]
    pub file_name: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

impl ChatEnvelope {
    /// An envelope carrying only text.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            chat_input: content.into(),
            binary: None,
        }
    }

    /// An envelope carrying text plus one base64-encoded file.
    pub fn with_attachment(content: impl Into<String>, file: &FileAttachment) -> Self {
        Self {
            chat_input: content.into(),
            binary: Some(BinaryEnvelope {
                file1: FilePart {
                    data: BASE64_STANDARD.encode(&file.data),
                    file_name: file.file_name.clone(),
                    mime_type: file.mime_type.clone(),
                },
            }),
        }
    }
}

/// Extracts the assistant reply from a webhook response body.
///
/// Probes `REPLY_FIELDS` in order; a present string wins as-is, any other
/// present non-null value is stringified. When no candidate field is
/// present the whole body is stringified.
pub fn extract_reply(body: &Value) -> String {
    for field in REPLY_FIELDS {
        match body.get(field) {
            None | Some(Value::Null) => continue,
            Some(Value::String(text)) => return text.clone(),
            Some(other) => return other.to_string(),
        }
    }
    body.to_string()
}

/// An abstract transport for the reply exchange.
///
/// Implementations perform exactly one POST with `Content-Type:
/// application/json` and the serialized envelope as body, and return the
/// parsed JSON response. A non-success HTTP status is an error regardless
/// of the body.
#[async_trait]
pub trait ReplyTransport: Send + Sync {
    /// Posts the envelope and returns the parsed response body.
    ///
    /// # Returns
    ///
    /// - `Ok(body)`: 2xx response with a JSON body
    /// - `Err(RelayError::Http { .. })`: non-success status
    /// - `Err(RelayError::Network(_))`: request/connect failure
    /// - `Err(RelayError::Serialization { .. })`: body decode failure
    async fn exchange(&self, envelope: &ChatEnvelope) -> Result<Value>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_envelope_shape() {
        let envelope = ChatEnvelope::text("ping");
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value, json!({"chatInput": "ping"}));
    }

    #[test]
    fn test_attachment_envelope_shape() {
        let file = FileAttachment::new("notes.txt", "text/plain", b"hello".to_vec());
        let envelope = ChatEnvelope::with_attachment("see attached", &file);
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            value,
            json!({
                "chatInput": "see attached",
                "binary": {
                    "file1": {
                        "data": "aGVsbG8=",
                        "fileName": "notes.txt",
                        "mimeType": "text/plain"
                    }
                }
            })
        );
    }

    #[test]
    fn test_extract_reply_field_order() {
        let body = json!({"text": "second", "output": "first"});
        assert_eq!(extract_reply(&body), "first");

        let body = json!({"message": "fourth", "answer": "third"});
        assert_eq!(extract_reply(&body), "third");
    }

    #[test]
    fn test_extract_reply_skips_null_candidates() {
        let body = json!({"output": null, "text": "fallback"});
        assert_eq!(extract_reply(&body), "fallback");
    }

    #[test]
    fn test_extract_reply_stringifies_non_string_values() {
        let body = json!({"output": {"nested": true}});
        assert_eq!(extract_reply(&body), r#"{"nested":true}"#);
    }

    #[test]
    fn test_extract_reply_falls_back_to_whole_body() {
        let body = json!({"status": "ok", "count": 3});
        let reply = extract_reply(&body);
        let round_trip: Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(round_trip, body);
    }
}
