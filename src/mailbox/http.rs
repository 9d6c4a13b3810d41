//! HTTP transport for the mailbox service

use super::transport::{
    EmailsResponse, FoldersResponse, MailboxTransport, SendRequest, SendResponse,
    SummarizeRequest, SummaryResponse, TransportError,
};
use crate::integration::config::{MailboxConfig, MailboxRoutes};
use crate::{Result, VoxmailError};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

pub struct HttpTransport {
    client: Client,
    base_url: String,
    routes: MailboxRoutes,
}

impl HttpTransport {
    pub fn new(config: &MailboxConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| VoxmailError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            routes: config.routes.clone(),
        })
    }

    fn url(&self, route: &str) -> String {
        format!("{}/{}", self.base_url, route.trim_start_matches('/'))
    }
}

fn request_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Request(e.to_string())
    }
}

/// Decode the JSON envelope whatever the status code; failures still carry `success: false`
async fn decode<R: DeserializeOwned>(response: Response) -> std::result::Result<R, TransportError> {
    let status = response.status();
    let body = response.text().await.map_err(request_error)?;
    debug!("HTTP {} ({} bytes)", status, body.len());

    serde_json::from_str(&body).map_err(|e| TransportError::Decode {
        status: status.as_u16(),
        detail: e.to_string(),
    })
}

#[async_trait]
impl MailboxTransport for HttpTransport {
    async fn send(&self, request: &SendRequest) -> std::result::Result<SendResponse, TransportError> {
        let response = self
            .client
            .post(self.url(&self.routes.send))
            .json(request)
            .send()
            .await
            .map_err(request_error)?;
        decode(response).await
    }

    async fn read_emails(&self, folder: &str) -> std::result::Result<EmailsResponse, TransportError> {
        let response = self
            .client
            .get(self.url(&self.routes.read_emails))
            .query(&[("folder", folder)])
            .send()
            .await
            .map_err(request_error)?;
        decode(response).await
    }

    async fn search(&self, query: &str) -> std::result::Result<EmailsResponse, TransportError> {
        let response = self
            .client
            .get(self.url(&self.routes.search))
            .query(&[("query", query)])
            .send()
            .await
            .map_err(request_error)?;
        decode(response).await
    }

    async fn summarize(
        &self,
        request: &SummarizeRequest,
    ) -> std::result::Result<SummaryResponse, TransportError> {
        let response = self
            .client
            .post(self.url(&self.routes.summarize))
            .json(request)
            .send()
            .await
            .map_err(request_error)?;
        decode(response).await
    }

    async fn folders(&self) -> std::result::Result<FoldersResponse, TransportError> {
        let response = self
            .client
            .get(self.url(&self.routes.folders))
            .send()
            .await
            .map_err(request_error)?;
        decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let config = MailboxConfig {
            base_url: "http://localhost:3000/api/".to_string(),
            ..MailboxConfig::default()
        };
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(transport.url("send"), "http://localhost:3000/api/send");
        assert_eq!(
            transport.url("/read-emails"),
            "http://localhost:3000/api/read-emails"
        );
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        let config = MailboxConfig {
            // Port 9 (discard) is essentially never served over HTTP locally
            base_url: "http://127.0.0.1:9/api".to_string(),
            timeout_ms: 500,
            ..MailboxConfig::default()
        };
        let transport = HttpTransport::new(&config).unwrap();
        assert!(transport.folders().await.is_err());
    }
}
