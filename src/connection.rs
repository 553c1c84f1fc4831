use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::client::Connection;
use crate::error::{ApiResponseError, ApiStatus, Error, Result};

/// Google Cloud Logging v2 API endpoint.
const DEFAULT_ENDPOINT: &str = "https://logging.googleapis.com/v2";

/// [`Connection`] implementation that talks to the Logging API over HTTPS.
///
/// The bearer token is caller-supplied and attached as-is; obtaining and
/// refreshing it is the caller's concern. No retries are performed here —
/// every failure surfaces to the caller.
#[derive(Debug, Clone)]
pub struct HttpConnection {
    http_client: reqwest::Client,
    endpoint: String,
    access_token: String,
}

impl HttpConnection {
    /// Creates a connection to the production endpoint.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT, access_token)
    }

    /// Creates a connection to a custom endpoint, e.g. an emulator.
    pub fn with_endpoint(endpoint: impl Into<String>, access_token: impl Into<String>) -> Self {
        HttpConnection {
            http_client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            access_token: access_token.into(),
        }
    }
}

#[async_trait]
impl Connection for HttpConnection {
    async fn api_request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.endpoint, path);
        tracing::debug!(%method, %url, "API request");

        let mut request = self
            .http_client
            .request(method, &url)
            .header("Authorization", format!("Bearer {}", self.access_token));
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        // Write and delete calls answer with an empty body on success.
        let payload = response.json::<Value>().await.unwrap_or(Value::Null);

        if !status.is_success() {
            // https://cloud.google.com/apis/design/errors#http_mapping
            let api_status = match serde_json::from_value::<ApiResponseError>(payload) {
                Ok(ApiResponseError { error }) => error,
                Err(_) => ApiStatus {
                    code: Some(i64::from(status.as_u16())),
                    message: status.to_string(),
                    status: String::new(),
                },
            };
            return Err(Error::Api(api_status));
        }

        Ok(payload)
    }
}
