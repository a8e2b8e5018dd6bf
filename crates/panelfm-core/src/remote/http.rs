//! HTTP transport for the file-management agent, built on `reqwest`.
//!
//! Every request carries the shared-secret `x-api-key` header and passes
//! the target path in the `p` query parameter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::config::settings::RemoteConfig;
use crate::error::{CoreError, CoreResult};
use crate::remote::entry::EntryKind;
use crate::remote::path::RemotePath;
use crate::remote::transport::{
    ContentResponse, CreateRequest, FileTransport, ListResponse, RenameRequest, SaveRequest,
};

/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Query parameter carrying the target path.
const PATH_PARAM: &str = "p";

/// Talks to the agent's `/files/*` routes over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Builds a transport from the `[remote]` configuration section.
    ///
    /// # Errors
    ///
    /// - [`CoreError::ConfigParse`] if `base_url` is not a URL or the API
    ///   key is not a valid header value.
    /// - [`CoreError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &RemoteConfig) -> CoreResult<Self> {
        url::Url::parse(&config.base_url)
            .map_err(|e| CoreError::ConfigParse(format!("base_url {}: {e}", config.base_url)))?;

        let mut headers = HeaderMap::new();
        if config.api_key.is_empty() {
            tracing::warn!("no API key configured, requests will be sent without {API_KEY_HEADER}");
        } else {
            let mut value = HeaderValue::from_str(&config.api_key)
                .map_err(|e| CoreError::ConfigParse(format!("api_key: {e}")))?;
            value.set_sensitive(true);
            headers.insert(API_KEY_HEADER, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CoreError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Returns the base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, route: &str, path: &RemotePath) -> RequestBuilder {
        tracing::debug!(%method, route, path = %path, "agent request");
        self.client
            .request(method, format!("{}/{route}", self.base_url))
            .query(&[(PATH_PARAM, path.as_str())])
    }
}

async fn send(request: RequestBuilder) -> CoreResult<Response> {
    let response = request
        .send()
        .await
        .map_err(|e| CoreError::Transport(e.to_string()))?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = rejection_message(&body);
    tracing::warn!(status = status.as_u16(), ?message, "agent rejected request");
    Err(CoreError::Rejected {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> CoreResult<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| CoreError::Transport(format!("malformed response: {e}")))
}

/// Pulls `error` or `message` out of a JSON error body.
fn rejection_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error", "message"]
        .iter()
        .find_map(|key| value.get(key)?.as_str().map(str::to_string))
}

#[async_trait]
impl FileTransport for HttpTransport {
    async fn list(&self, path: &RemotePath) -> CoreResult<ListResponse> {
        let response = send(self.request(Method::GET, "files/list", path)).await?;
        decode(response).await
    }

    async fn read(&self, path: &RemotePath) -> CoreResult<String> {
        let response = send(self.request(Method::GET, "files/content", path)).await?;
        let body: ContentResponse = decode(response).await?;
        Ok(body.content)
    }

    async fn write(&self, path: &RemotePath, content: &str) -> CoreResult<()> {
        let body = SaveRequest {
            content: content.to_string(),
        };
        send(self.request(Method::POST, "files/save", path).json(&body)).await?;
        Ok(())
    }

    async fn create(&self, path: &RemotePath, kind: EntryKind) -> CoreResult<()> {
        let body = CreateRequest { kind };
        send(self.request(Method::POST, "files/create", path).json(&body)).await?;
        Ok(())
    }

    async fn delete(&self, path: &RemotePath) -> CoreResult<()> {
        send(self.request(Method::DELETE, "files/delete", path)).await?;
        Ok(())
    }

    async fn rename(&self, path: &RemotePath, new_name: &str) -> CoreResult<()> {
        let body = RenameRequest {
            new_name: new_name.to_string(),
        };
        send(self.request(Method::POST, "files/rename", path).json(&body)).await?;
        Ok(())
    }
}
