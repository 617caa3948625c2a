//! Uploads and downloads against pre-signed transfer targets

use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE, HOST};
use reqwest::{Method, RequestBuilder};

use crate::error::{DraftsError, Result};
use crate::models::SecureLink;

use super::connection::{send, transport_error};

/// Moves raw text to and from storage locations issued by the API.
/// Knows nothing about drafts; every call is one round trip.
#[derive(Clone)]
pub struct SecureTransferClient {
    client: reqwest::Client,
}

impl SecureTransferClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn request(&self, target: &SecureLink) -> Result<RequestBuilder> {
        let method = Method::from_bytes(target.method.to_uppercase().as_bytes()).map_err(|_| {
            DraftsError::InvalidResponse(format!("Invalid transfer method: {}", target.method))
        })?;

        let mut builder = self.client.request(method, &target.url);

        // An empty Host header is not a valid request; leave it to the URL then
        let host = target.host();
        if !host.is_empty() {
            let value = HeaderValue::from_str(host).map_err(|_| {
                DraftsError::InvalidResponse(format!("Invalid Host header: {}", host))
            })?;
            builder = builder.header(HOST, value);
        }

        Ok(builder)
    }

    /// Upload `contents` verbatim to `target`
    pub async fn upload(&self, target: &SecureLink, contents: &str) -> Result<()> {
        tracing::debug!("Uploading {} bytes via {}", contents.len(), target.method);

        let request = self
            .request(target)?
            .header(CONTENT_TYPE, "plain/text")
            .body(contents.to_string());

        send(request, "Secure upload").await?;
        Ok(())
    }

    /// Download the raw text stored at `target`
    pub async fn download(&self, target: &SecureLink) -> Result<String> {
        tracing::debug!("Downloading via {}", target.method);

        let request = self.request(target)?.header(ACCEPT, "text/plain");
        let response = send(request, "Secure download").await?;

        response
            .text()
            .await
            .map_err(|e| transport_error("Secure download", e))
    }
}
