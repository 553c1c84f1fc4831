use async_trait::async_trait;
use derive_builder::Builder;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entry::ReceivedEntry;
use crate::error::{Error, Result};
use crate::logger::Logger;

/// The transport seam: one request/response exchange with the Logging API.
///
/// [`HttpConnection`](crate::HttpConnection) is the stock implementation;
/// tests substitute a recording double. Failure modes (network, auth, quota)
/// are opaque to the rest of the crate and simply propagate.
#[async_trait]
pub trait Connection: Send + Sync {
    async fn api_request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value>;
}

/// Holds the project id and connection that loggers operate through.
#[derive(Debug)]
pub struct Client<C: Connection> {
    project: String,
    connection: C,
}

/// Sort order accepted by entries:list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    TimestampAsc,
    TimestampDesc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::TimestampAsc => "timestamp asc",
            SortOrder::TimestampDesc => "timestamp desc",
        }
    }
}

/// Options for [`Client::list_entries`] and [`Logger::list_entries`].
///
/// All fields are optional; `projects` defaults to the project bound to the
/// client, the rest default to the API's own behavior.
#[derive(Debug, Clone, Default, Builder)]
#[builder(pattern = "owned", setter(into, strip_option), default)]
pub struct ListOptions {
    pub projects: Option<Vec<String>>,
    /// An [advanced logs filter](https://cloud.google.com/logging/docs/view/advanced_filters) expression.
    pub filter: Option<String>,
    pub order_by: Option<SortOrder>,
    pub page_size: Option<i32>,
    /// Opaque marker for the next page of entries, as returned by a
    /// previous call.
    pub page_token: Option<String>,
}

impl ListOptions {
    pub fn builder() -> ListOptionsBuilder {
        ListOptionsBuilder::default()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListRequest {
    project_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    order_by: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_token: Option<String>,
}

/// One page of log entries plus the cursor for the next page. An absent
/// token means there are no further pages.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPage {
    #[serde(default)]
    pub entries: Vec<ReceivedEntry>,
    pub next_page_token: Option<String>,
}

impl<C: Connection> Client<C> {
    pub fn new(project: impl Into<String>, connection: C) -> Self {
        Client {
            project: project.into(),
            connection,
        }
    }

    /// Project id bound to the client.
    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// Returns a [`Logger`] named `name`, bound to this client.
    pub fn logger(&self, name: impl Into<String>) -> Logger<'_, C> {
        Logger::new(name, self)
    }

    /// API call: return one page of log entries via a POST request.
    ///
    /// See <https://cloud.google.com/logging/docs/reference/v2/rest/v2/entries/list>.
    pub async fn list_entries(&self, options: ListOptions) -> Result<EntryPage> {
        let request = ListRequest {
            project_ids: options
                .projects
                .unwrap_or_else(|| vec![self.project.clone()]),
            filter: options.filter,
            order_by: options.order_by.map(SortOrder::as_str),
            page_size: options.page_size,
            page_token: options.page_token,
        };

        let body = serde_json::to_value(&request)?;
        let response = self
            .connection
            .api_request(Method::POST, "/entries:list", Some(body))
            .await?;

        serde_json::from_value(response).map_err(Error::ListResponse)
    }
}
