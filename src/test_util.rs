use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{Value, json};

use crate::client::Connection;
use crate::error::{ApiStatus, BoxError, Error, Result};
use crate::proto::ProtoMessage;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

/// Recording [`Connection`] double: captures every dispatched request and
/// answers with queued replies, defaulting to an empty success body.
#[derive(Debug, Default)]
pub(crate) struct MockConnection {
    requests: Mutex<Vec<RecordedRequest>>,
    replies: Mutex<VecDeque<Result<Value>>>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_reply(&self, reply: Result<Value>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Connection for MockConnection {
    async fn api_request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            path: path.to_owned(),
            body,
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(json!({})))
    }
}

pub(crate) fn api_error(message: &str) -> Error {
    Error::Api(ApiStatus {
        code: Some(500),
        message: message.to_owned(),
        status: "INTERNAL".to_owned(),
    })
}

pub(crate) fn labels(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Message whose canonical JSON form is a fixed value.
pub(crate) struct TestMessage {
    rendered: Value,
}

impl TestMessage {
    pub fn new(rendered: Value) -> Self {
        TestMessage { rendered }
    }
}

impl ProtoMessage for TestMessage {
    fn to_canonical_json(&self) -> Result<String, BoxError> {
        Ok(self.rendered.to_string())
    }
}

/// Message whose codec always fails.
pub(crate) struct FailingMessage;

impl ProtoMessage for FailingMessage {
    fn to_canonical_json(&self) -> Result<String, BoxError> {
        Err("unknown field in message".into())
    }
}

/// Message whose codec emits text that is not JSON.
pub(crate) struct GarbageMessage;

impl ProtoMessage for GarbageMessage {
    fn to_canonical_json(&self) -> Result<String, BoxError> {
        Ok("not json".to_owned())
    }
}
