use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A submission enriched with the system-assigned fields, ready to persist.
#[derive(Debug, Clone)]
pub struct FeedbackRecord {
    pub id: Uuid,
    pub fields: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub classified: bool,
}

impl FeedbackRecord {
    pub fn new(id: Uuid, fields: Map<String, Value>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            fields,
            created_at,
            classified: false,
        }
    }

    /// Store key of the record, shared with the notification event.
    pub fn key(&self) -> String {
        self.id.to_string()
    }

    /// The stored document. System fields overwrite any client-supplied
    /// `createdAt` or `classified`.
    pub fn to_document(&self) -> Value {
        let mut doc = self.fields.clone();
        doc.insert(
            "createdAt".to_string(),
            Value::String(self.created_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        doc.insert("classified".to_string(), Value::Bool(self.classified));
        Value::Object(doc)
    }
}

/// Notification payload announcing a new record. Consumers re-fetch the
/// record by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackCreated {
    pub new_feedback_id: Uuid,
}

impl FeedbackCreated {
    pub fn to_bytes(&self) -> Result<bytes::Bytes, serde_json::Error> {
        serde_json::to_vec(self).map(bytes::Bytes::from)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn document_carries_system_fields() {
        let mut fields = Map::new();
        fields.insert("feedback".to_string(), json!("great service"));
        fields.insert("classified".to_string(), json!(true));
        let now = Utc::now();

        let id = Uuid::new_v4();
        let record = FeedbackRecord::new(id, fields, now);
        assert_eq!(record.key(), id.to_string());

        let doc = record.to_document();

        assert_eq!(doc["feedback"], "great service");
        assert_eq!(doc["classified"], false);
        let created_at = doc["createdAt"].as_str().unwrap();
        let parsed = DateTime::parse_from_rfc3339(created_at).unwrap();
        assert_eq!(parsed.timestamp_millis(), now.timestamp_millis());
    }

    #[test]
    fn event_payload_shape() {
        let id = Uuid::new_v4();
        let bytes = FeedbackCreated { new_feedback_id: id }.to_bytes().unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value, json!({ "newFeedbackId": id.to_string() }));
    }
}
