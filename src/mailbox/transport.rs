//! Wire shapes of the mailbox service and the transport seam
//!
//! Every response carries a `success` flag; failures add a human-readable
//! `message`.

use super::Message;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("request timed out")]
    Timeout,

    #[error("unexpected response (HTTP {status}): {detail}")]
    Decode { status: u16, detail: String },
}

/// `POST /send`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendRequest {
    pub to: String,
    pub subject: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `GET /read-emails?folder=` and `GET /search?query=`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailsResponse {
    pub success: bool,
    #[serde(default)]
    pub emails: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `POST /summarize`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarizeRequest {
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `GET /folders`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoldersResponse {
    pub success: bool,
    #[serde(default)]
    pub folders: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Raw request/response calls against the mailbox service
///
/// Implementations report what the service answered, including
/// `success: false` envelopes; interpreting them is the client's job.
#[async_trait]
pub trait MailboxTransport: Send + Sync {
    async fn send(&self, request: &SendRequest) -> Result<SendResponse, TransportError>;

    async fn read_emails(&self, folder: &str) -> Result<EmailsResponse, TransportError>;

    async fn search(&self, query: &str) -> Result<EmailsResponse, TransportError>;

    async fn summarize(
        &self,
        request: &SummarizeRequest,
    ) -> Result<SummaryResponse, TransportError>;

    async fn folders(&self) -> Result<FoldersResponse, TransportError>;
}

/// Share one transport between the controller and an observer
#[async_trait]
impl<T: MailboxTransport + ?Sized> MailboxTransport for Arc<T> {
    async fn send(&self, request: &SendRequest) -> Result<SendResponse, TransportError> {
        (**self).send(request).await
    }

    async fn read_emails(&self, folder: &str) -> Result<EmailsResponse, TransportError> {
        (**self).read_emails(folder).await
    }

    async fn search(&self, query: &str) -> Result<EmailsResponse, TransportError> {
        (**self).search(query).await
    }

    async fn summarize(
        &self,
        request: &SummarizeRequest,
    ) -> Result<SummaryResponse, TransportError> {
        (**self).summarize(request).await
    }

    async fn folders(&self) -> Result<FoldersResponse, TransportError> {
        (**self).folders().await
    }
}
