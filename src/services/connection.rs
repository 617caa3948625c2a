//! Authenticated connection to the drafts API

use std::borrow::Cow;

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::DraftsConfig;
use crate::error::{DraftsError, Result};

/// Every API response wraps its payload in a `data` field
#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// Issues authenticated requests against the versioned drafts API
#[derive(Clone)]
pub struct ApiConnection {
    client: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl ApiConnection {
    /// Create a connection from configuration. The timeout configured here
    /// applies to every request made through the shared client.
    pub fn new(config: &DraftsConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| DraftsError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
        })
    }

    /// The underlying HTTP client, shared with secure transfers
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.api_url(path);
        tracing::debug!("{} {}", method, url);

        let builder = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");

        match &self.access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// GET `path` and decode the `data` payload
    pub async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = send(self.request(Method::GET, path), path).await?;
        decode_data(response, path).await
    }

    /// POST a JSON body to `path` and decode the `data` payload
    pub async fn post_data<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = send(self.request(Method::POST, path).json(body), path).await?;
        decode_data(response, path).await
    }

    /// DELETE `path`, ignoring any response body
    pub async fn delete(&self, path: &str) -> Result<()> {
        send(self.request(Method::DELETE, path), path).await?;
        Ok(())
    }
}

/// Send a request, mapping network failures, timeouts and non-success
/// statuses to transport errors
pub(crate) async fn send(request: RequestBuilder, context: &str) -> Result<Response> {
    let response = request
        .send()
        .await
        .map_err(|e| transport_error(context, e))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(DraftsError::Transport(format!(
            "{} returned {}: {}",
            context, status, body
        )));
    }

    Ok(response)
}

pub(crate) fn transport_error(context: &str, error: reqwest::Error) -> DraftsError {
    if error.is_timeout() {
        DraftsError::Transport(format!("{} timed out: {}", context, error))
    } else {
        DraftsError::Transport(format!("{} failed: {}", context, error))
    }
}

async fn decode_data<T: DeserializeOwned>(response: Response, context: &str) -> Result<T> {
    let body = response
        .text()
        .await
        .map_err(|e| transport_error(context, e))?;

    let envelope: DataEnvelope<T> = serde_json::from_str(&body).map_err(|e| {
        DraftsError::InvalidResponse(format!("Failed to parse {} response: {}", context, e))
    })?;

    Ok(envelope.data)
}

/// Percent-encode an id for use as a path segment
pub(crate) fn encode_id(id: &str) -> Cow<'_, str> {
    urlencoding::encode(id)
}
