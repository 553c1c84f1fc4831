use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One log entry payload. The entries:write wire format carries exactly one
/// of these fields per entry, and the variant name doubles as the field name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Payload {
    #[serde(rename = "textPayload")]
    Text(String),
    #[serde(rename = "jsonPayload")]
    Json(Map<String, Value>),
    #[serde(rename = "protoPayload")]
    Proto(Value),
}

/// The monitored resource an entry is associated with. Entries written by
/// this crate always use the `global` resource type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "type")]
    pub resource_type: String,
}

impl Resource {
    pub fn global() -> Self {
        Resource {
            resource_type: "global".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LogEntry {
    pub log_name: String,
    pub resource: Resource,
    #[serde(flatten)]
    pub payload: Payload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

/// Body of an entries:write call carrying fully-addressed entries.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct WriteRequest {
    pub entries: Vec<LogEntry>,
}

/// Body of an entries:write call where the log name and resource are hoisted
/// out of the individual entries, as produced by a committed batch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BatchWriteRequest<'a> {
    pub log_name: String,
    pub resource: Resource,
    pub entries: &'a [Payload],
}

/// A log entry as returned by entries:list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedEntry {
    pub log_name: String,
    pub text_payload: Option<String>,
    pub json_payload: Option<Map<String, Value>>,
    pub proto_payload: Option<Value>,
    pub timestamp: Option<DateTime<Utc>>,
    pub severity: Option<String>,
    pub insert_id: Option<String>,
    pub labels: Option<HashMap<String, String>>,
}

impl ReceivedEntry {
    /// The entry's payload, whichever of the three wire fields was present.
    pub fn payload(&self) -> Option<Payload> {
        if let Some(text) = &self.text_payload {
            Some(Payload::Text(text.clone()))
        } else if let Some(info) = &self.json_payload {
            Some(Payload::Json(info.clone()))
        } else {
            self.proto_payload.clone().map(Payload::Proto)
        }
    }
}
