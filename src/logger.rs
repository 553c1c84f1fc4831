use std::collections::HashMap;

use reqwest::Method;
use serde_json::{Map, Value};

use crate::batch::Batch;
use crate::client::{Client, Connection, EntryPage, ListOptions};
use crate::entry::{LogEntry, Payload, Resource, WriteRequest};
use crate::error::Result;
use crate::proto::{ProtoMessage, render_proto};

/// A named target for log entries, scoped to the client's project.
///
/// Loggers are stateless façades: they shape and dispatch single-entry
/// write, delete, and list requests, and hand out [`Batch`]es for multi-entry
/// writes. A logger borrows its client; one client may back many loggers.
///
/// See <https://cloud.google.com/logging/docs/reference/v2/rest/v2/projects.logs>.
pub struct Logger<'c, C: Connection> {
    name: String,
    client: &'c Client<C>,
    default_labels: Option<HashMap<String, String>>,
}

/// Effective labels for one entry: the entry's own labels if given, else the
/// logger's defaults, else none.
fn resolve_labels(
    explicit: Option<HashMap<String, String>>,
    default: Option<&HashMap<String, String>>,
) -> Option<HashMap<String, String>> {
    explicit.or_else(|| default.cloned())
}

impl<'c, C: Connection> Logger<'c, C> {
    pub fn new(name: impl Into<String>, client: &'c Client<C>) -> Self {
        Logger {
            name: name.into(),
            client,
            default_labels: None,
        }
    }

    /// Sets labels applied to every entry written through this logger that
    /// does not carry its own.
    pub fn with_default_labels(mut self, labels: HashMap<String, String>) -> Self {
        self.default_labels = Some(labels);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Project bound to the logger, read through its client.
    pub fn project(&self) -> &str {
        self.client.project()
    }

    pub fn default_labels(&self) -> Option<&HashMap<String, String>> {
        self.default_labels.as_ref()
    }

    /// Fully-qualified name used in logging APIs:
    /// `projects/{project}/logs/{name}`.
    pub fn full_name(&self) -> String {
        format!("projects/{}/logs/{}", self.project(), self.name)
    }

    async fn write_entry(
        &self,
        payload: Payload,
        labels: Option<HashMap<String, String>>,
    ) -> Result<()> {
        let entry = LogEntry {
            log_name: self.full_name(),
            resource: Resource::global(),
            payload,
            labels: resolve_labels(labels, self.default_labels.as_ref()),
        };
        let body = serde_json::to_value(&WriteRequest {
            entries: vec![entry],
        })?;

        tracing::debug!(logger = %self.name, "writing one log entry");
        self.client
            .connection()
            .api_request(Method::POST, "/entries:write", Some(body))
            .await?;
        Ok(())
    }

    /// API call: log a text message via a POST request.
    ///
    /// See <https://cloud.google.com/logging/docs/reference/v2/rest/v2/entries/write>.
    pub async fn log_text(
        &self,
        text: impl Into<String>,
        labels: Option<HashMap<String, String>>,
    ) -> Result<()> {
        self.write_entry(Payload::Text(text.into()), labels).await
    }

    /// API call: log a structured message via a POST request.
    ///
    /// The mapping's schema is caller-defined and not validated here.
    pub async fn log_struct(
        &self,
        info: Map<String, Value>,
        labels: Option<HashMap<String, String>>,
    ) -> Result<()> {
        self.write_entry(Payload::Json(info), labels).await
    }

    /// API call: log a protobuf message via a POST request.
    ///
    /// The message is rendered to its canonical JSON form and transmitted as
    /// a structure, never as raw binary.
    pub async fn log_proto(
        &self,
        message: &impl ProtoMessage,
        labels: Option<HashMap<String, String>>,
    ) -> Result<()> {
        let rendered = render_proto(message)?;
        self.write_entry(Payload::Proto(rendered), labels).await
    }

    /// API call: delete all entries in this logger via a DELETE request.
    ///
    /// This is a destructive, non-reversible bulk operation.
    pub async fn delete(&self) -> Result<()> {
        let path = format!("/{}", self.full_name());
        self.client
            .connection()
            .api_request(Method::DELETE, &path, None)
            .await?;
        Ok(())
    }

    /// API call: return a page of entries scoped to this logger.
    ///
    /// A caller-supplied filter is AND-combined with the logger's own
    /// `logName:{name}` clause before delegating to
    /// [`Client::list_entries`].
    pub async fn list_entries(&self, options: ListOptions) -> Result<EntryPage> {
        let scope = format!("logName:{}", self.name);
        let filter = match options.filter {
            Some(filter) => format!("{filter} AND {scope}"),
            None => scope,
        };
        self.client
            .list_entries(ListOptions {
                filter: Some(filter),
                ..options
            })
            .await
    }

    /// Returns a [`Batch`] bound to this logger and its client.
    pub fn batch(&self) -> Batch<'_, C> {
        Batch::new(self, self.client)
    }

    /// Runs `scope` against a fresh batch and commits it on clean exit.
    ///
    /// If the closure returns an error, the commit is skipped and the error
    /// propagates unchanged; nothing is rolled back.
    pub async fn with_batch<T>(
        &self,
        scope: impl FnOnce(&mut Batch<'_, C>) -> Result<T>,
    ) -> Result<T> {
        let mut batch = self.batch();
        let value = scope(&mut batch)?;
        batch.commit().await?;
        Ok(value)
    }
}
