//! Mailbox action client
//!
//! [`MailboxClient`] is the only thing the dialogue controller calls to touch
//! the mailbox. It validates input locally, talks to a [`MailboxTransport`]
//! and turns every response envelope into either a normalized value or a
//! typed [`MailboxError`]. Nothing escapes it as a panic or a raw transport
//! error.

pub mod http;
pub mod memory;
pub mod transport;

pub use http::HttpTransport;
pub use memory::{InMemoryMailbox, Operation};
pub use transport::{
    EmailsResponse, FoldersResponse, MailboxTransport, SendRequest, SendResponse,
    SummarizeRequest, SummaryResponse, TransportError,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Longest content (in characters) submitted for summarization
pub const MAX_SUMMARY_CHARS: usize = 10_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MailboxError {
    #[error("Failed to send email: {reason}")]
    SendFailed { reason: String },

    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Failed to fetch emails: {reason}")]
    FetchFailed { reason: String },

    #[error("Failed to search emails: {reason}")]
    SearchFailed { reason: String },

    #[error("Search query is required")]
    InvalidQuery,

    #[error("Failed to summarize email: {reason}")]
    SummarizeFailed { reason: String },

    #[error("Failed to list folders: {reason}")]
    FoldersFailed { reason: String },
}

impl MailboxError {
    /// Rejected before any network call
    pub fn is_validation(&self) -> bool {
        matches!(self, MailboxError::InvalidQuery | MailboxError::MissingFields(_))
    }
}

/// A message as exposed by fetch and search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: Option<DateTime<Utc>>,
}

impl Message {
    pub fn new(
        id: impl Into<String>,
        from: impl Into<String>,
        subject: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            subject: subject.into(),
            content: content.into(),
            date: None,
        }
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Text(s)) => s,
        Some(RawId::Number(n)) => n.to_string(),
        None => String::new(),
    })
}

/// Accept RFC 3339 or RFC 2822 dates; anything else is treated as unknown
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .or_else(|_| DateTime::parse_from_rfc2822(&s))
            .map(|d| d.with_timezone(&Utc))
            .ok()
    }))
}

/// An outgoing message assembled field by field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub recipient: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
}

impl Draft {
    pub fn is_empty(&self) -> bool {
        self.recipient.is_none() && self.subject.is_none() && self.body.is_none()
    }

    pub fn clear(&mut self) {
        *self = Draft::default();
    }

    /// Fields that are absent or blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let blank = |field: &Option<String>| field.as_deref().map_or(true, |v| v.trim().is_empty());

        let mut missing = Vec::new();
        if blank(&self.recipient) {
            missing.push("to");
        }
        if blank(&self.subject) {
            missing.push("subject");
        }
        if blank(&self.body) {
            missing.push("text");
        }
        missing
    }

    fn to_request(&self) -> Result<SendRequest, MailboxError> {
        match (&self.recipient, &self.subject, &self.body) {
            (Some(to), Some(subject), Some(text)) if self.missing_fields().is_empty() => {
                Ok(SendRequest {
                    to: to.clone(),
                    subject: subject.clone(),
                    text: text.clone(),
                })
            }
            _ => Err(MailboxError::MissingFields(self.missing_fields())),
        }
    }
}

/// Proof that a send went through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    pub message_id: String,
}

/// Cut `content` to at most `max` characters without splitting a character
pub fn truncate_chars(content: &str, max: usize) -> &str {
    match content.char_indices().nth(max) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}

/// Newest first; undated messages keep their relative order at the end
fn sort_newest_first(messages: &mut [Message]) {
    messages.sort_by(|a, b| match (&a.date, &b.date) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

fn failure_reason(message: Option<String>, fallback: &str) -> String {
    message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

pub struct MailboxClient<T> {
    transport: T,
    max_summary_chars: usize,
}

impl<T: MailboxTransport> MailboxClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            max_summary_chars: MAX_SUMMARY_CHARS,
        }
    }

    pub fn with_max_summary_chars(mut self, max: usize) -> Self {
        self.max_summary_chars = max;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn send(&self, draft: &Draft) -> Result<SendReceipt, MailboxError> {
        let request = draft.to_request()?;
        info!("Sending email to {}", request.to);

        let response = self
            .transport
            .send(&request)
            .await
            .map_err(|e| MailboxError::SendFailed {
                reason: e.to_string(),
            })?;

        if !response.success {
            let reason = failure_reason(response.message, "Failed to send email");
            warn!("Send rejected: {}", reason);
            return Err(MailboxError::SendFailed { reason });
        }

        let message_id = response
            .message_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        debug!("Email sent, id {}", message_id);

        Ok(SendReceipt { message_id })
    }

    /// Up to `limit` messages from `folder`, newest first
    pub async fn fetch(&self, folder: &str, limit: usize) -> Result<Vec<Message>, MailboxError> {
        debug!("Fetching up to {} emails from {}", limit, folder);

        let response = self
            .transport
            .read_emails(folder)
            .await
            .map_err(|e| MailboxError::FetchFailed {
                reason: e.to_string(),
            })?;

        if !response.success {
            return Err(MailboxError::FetchFailed {
                reason: failure_reason(response.message, "Failed to read emails"),
            });
        }

        let mut emails = response.emails;
        sort_newest_first(&mut emails);
        emails.truncate(limit);
        Ok(emails)
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Message>, MailboxError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(MailboxError::InvalidQuery);
        }
        debug!("Searching for '{}'", query);

        let response = self
            .transport
            .search(query)
            .await
            .map_err(|e| MailboxError::SearchFailed {
                reason: e.to_string(),
            })?;

        if !response.success {
            return Err(MailboxError::SearchFailed {
                reason: failure_reason(response.message, "Failed to search emails"),
            });
        }

        Ok(response.emails)
    }

    pub async fn summarize(&self, content: &str) -> Result<String, MailboxError> {
        if content.trim().is_empty() {
            return Err(MailboxError::SummarizeFailed {
                reason: "Nothing to summarize".to_string(),
            });
        }

        let truncated = truncate_chars(content, self.max_summary_chars);
        if truncated.len() < content.len() {
            debug!(
                "Summary input truncated to {} characters",
                self.max_summary_chars
            );
        }

        let request = SummarizeRequest {
            content: truncated.to_string(),
        };
        let response = self
            .transport
            .summarize(&request)
            .await
            .map_err(|e| MailboxError::SummarizeFailed {
                reason: e.to_string(),
            })?;

        match (response.success, response.summary) {
            (true, Some(summary)) if !summary.trim().is_empty() => Ok(summary),
            (true, _) => Err(MailboxError::SummarizeFailed {
                reason: "Empty summary".to_string(),
            }),
            (false, _) => Err(MailboxError::SummarizeFailed {
                reason: failure_reason(response.message, "Failed to summarize email"),
            }),
        }
    }

    pub async fn folders(&self) -> Result<Vec<String>, MailboxError> {
        let response = self
            .transport
            .folders()
            .await
            .map_err(|e| MailboxError::FoldersFailed {
                reason: e.to_string(),
            })?;

        if !response.success {
            return Err(MailboxError::FoldersFailed {
                reason: failure_reason(response.message, "Failed to list folders"),
            });
        }

        Ok(response.folders)
    }
}
