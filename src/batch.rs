use reqwest::Method;
use serde_json::{Map, Value};

use crate::client::{Client, Connection};
use crate::entry::{BatchWriteRequest, Payload, Resource};
use crate::error::Result;
use crate::logger::Logger;
use crate::proto::{ProtoMessage, render_proto};

/// Collects entries locally and sends them in a single entries:write call.
///
/// Returned by [`Logger::batch`]. Accumulation performs no I/O; entries are
/// dispatched in insertion order by [`commit`](Batch::commit). A successful
/// commit clears the batch so it can be reused; a failed commit leaves the
/// accumulated entries intact so the caller may retry or discard them. For
/// commit-on-clean-exit scoping, see [`Logger::with_batch`].
pub struct Batch<'a, C: Connection> {
    logger: &'a Logger<'a, C>,
    client: &'a Client<C>,
    entries: Vec<Payload>,
}

impl<'a, C: Connection> Batch<'a, C> {
    pub(crate) fn new(logger: &'a Logger<'a, C>, client: &'a Client<C>) -> Self {
        Batch {
            logger,
            client,
            entries: Vec::new(),
        }
    }

    /// Adds a text entry to be sent on commit.
    pub fn log_text(&mut self, text: impl Into<String>) {
        self.entries.push(Payload::Text(text.into()));
    }

    /// Adds a structured entry to be sent on commit.
    pub fn log_struct(&mut self, info: Map<String, Value>) {
        self.entries.push(Payload::Json(info));
    }

    /// Adds a protobuf entry to be sent on commit.
    ///
    /// The message is rendered to canonical JSON here, so a broken codec
    /// surfaces at append time rather than poisoning the commit.
    pub fn log_proto(&mut self, message: &impl ProtoMessage) -> Result<()> {
        let rendered = render_proto(message)?;
        self.entries.push(Payload::Proto(rendered));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sends the accumulated entries as a single API call, using the client
    /// the batch was created with.
    pub async fn commit(&mut self) -> Result<()> {
        let client = self.client;
        self.commit_with(client).await
    }

    /// Sends the accumulated entries as a single API call through `client`.
    ///
    /// Committing an empty batch is a no-op.
    pub async fn commit_with(&mut self, client: &Client<C>) -> Result<()> {
        if self.entries.is_empty() {
            return Ok(());
        }

        let body = serde_json::to_value(&BatchWriteRequest {
            log_name: self.logger.full_name(),
            resource: Resource::global(),
            entries: &self.entries,
        })?;

        tracing::debug!(
            logger = %self.logger.name(),
            entries = self.entries.len(),
            "committing batch"
        );
        client
            .connection()
            .api_request(Method::POST, "/entries:write", Some(body))
            .await?;

        self.entries.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::Error;
    use crate::test_util::{MockConnection, TestMessage, api_error};

    fn client() -> Client<MockConnection> {
        Client::new("p", MockConnection::new())
    }

    fn struct_entry() -> Map<String, Value> {
        let mut info = Map::new();
        info.insert("b".into(), json!(1));
        info
    }

    #[tokio::test]
    async fn commit_preserves_insertion_order() {
        let client = client();
        let logger = client.logger("app");
        let mut batch = logger.batch();
        batch.log_text("a");
        batch.log_struct(struct_entry());
        batch.log_text("c");
        batch.commit().await.unwrap();

        let requests = client.connection().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/entries:write");
        assert_eq!(
            requests[0].body,
            Some(json!({
                "logName": "projects/p/logs/app",
                "resource": {"type": "global"},
                "entries": [
                    {"textPayload": "a"},
                    {"jsonPayload": {"b": 1}},
                    {"textPayload": "c"},
                ],
            }))
        );
    }

    #[tokio::test]
    async fn a_successful_commit_clears_the_batch() {
        let client = client();
        let logger = client.logger("app");
        let mut batch = logger.batch();
        batch.log_text("a");
        batch.commit().await.unwrap();
        assert!(batch.is_empty());
    }

    #[tokio::test]
    async fn committing_an_empty_batch_is_a_no_op() {
        let client = client();
        let logger = client.logger("app");
        let mut batch = logger.batch();
        batch.log_text("a");
        batch.commit().await.unwrap();
        batch.commit().await.unwrap();

        assert_eq!(client.connection().requests().len(), 1);
    }

    #[tokio::test]
    async fn a_failed_commit_keeps_the_entries_for_retry() {
        let client = client();
        client.connection().push_reply(Err(api_error("unavailable")));
        let logger = client.logger("app");
        let mut batch = logger.batch();
        batch.log_text("a");
        batch.log_text("b");

        let err = batch.commit().await.unwrap_err();
        assert!(matches!(err, Error::Api(_)));
        assert_eq!(batch.len(), 2);

        batch.commit().await.unwrap();
        assert!(batch.is_empty());

        let requests = client.connection().requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].body, requests[1].body);
    }

    #[tokio::test]
    async fn commit_with_dispatches_through_the_override_client() {
        let bound = client();
        let other = client();
        let logger = bound.logger("app");
        let mut batch = logger.batch();
        batch.log_text("a");
        batch.commit_with(&other).await.unwrap();

        assert!(bound.connection().requests().is_empty());
        assert_eq!(other.connection().requests().len(), 1);
    }

    #[tokio::test]
    async fn proto_entries_round_trip_through_commit_unmutated() {
        let client = client();
        let logger = client.logger("app");
        let rendered = json!({"@type": "example.Event", "id": 7});
        let mut batch = logger.batch();
        batch.log_proto(&TestMessage::new(rendered.clone())).unwrap();
        batch.commit().await.unwrap();

        let requests = client.connection().requests();
        assert_eq!(
            requests[0].body.as_ref().unwrap()["entries"][0]["protoPayload"],
            rendered
        );
    }

    #[tokio::test]
    async fn with_batch_commits_once_on_clean_exit() {
        let client = client();
        let logger = client.logger("app");
        logger
            .with_batch(|batch| {
                batch.log_text("a");
                batch.log_text("b");
                Ok(())
            })
            .await
            .unwrap();

        let requests = client.connection().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].body.as_ref().unwrap()["entries"],
            json!([{"textPayload": "a"}, {"textPayload": "b"}])
        );
    }

    #[tokio::test]
    async fn with_batch_skips_the_commit_on_error_exit() {
        let client = client();
        let logger = client.logger("app");
        let result: Result<()> = logger
            .with_batch(|batch| {
                batch.log_text("a");
                Err(api_error("boom"))
            })
            .await;

        match result {
            Err(Error::Api(status)) => assert_eq!(status.message, "boom"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(client.connection().requests().is_empty());
    }
}
