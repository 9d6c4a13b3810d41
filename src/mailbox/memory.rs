//! In-process mailbox
//!
//! Serves the same envelopes as the HTTP service from memory. Used for the
//! offline demo and for exercising the dialogue without a network. Every
//! request is recorded and any operation can be switched to fail.

use super::transport::{
    EmailsResponse, FoldersResponse, MailboxTransport, SendRequest, SendResponse,
    SummarizeRequest, SummaryResponse, TransportError,
};
use super::Message;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;

/// Words kept by the built-in summarizer
const SUMMARY_WORDS: usize = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Send,
    Read,
    Search,
    Summarize,
    Folders,
}

#[derive(Default)]
pub struct InMemoryMailbox {
    folders: Mutex<BTreeMap<String, Vec<Message>>>,
    failing: Mutex<HashSet<Operation>>,
    sent: Mutex<Vec<SendRequest>>,
    read_requests: Mutex<Vec<String>>,
    search_requests: Mutex<Vec<String>>,
    summarize_requests: Mutex<Vec<String>>,
}

impl InMemoryMailbox {
    /// An empty mailbox with an empty INBOX
    pub fn new() -> Self {
        let mailbox = Self::default();
        mailbox.folders.lock().insert("INBOX".to_string(), Vec::new());
        mailbox
    }

    pub fn with_messages(self, folder: impl Into<String>, messages: Vec<Message>) -> Self {
        self.folders
            .lock()
            .entry(folder.into())
            .or_default()
            .extend(messages);
        self
    }

    /// A small mailbox with realistic noise in the bodies
    pub fn sample() -> Self {
        let now = Utc::now();
        Self::new()
            .with_messages(
                "INBOX",
                vec![
                    Message::new(
                        "1",
                        "alice@example.com",
                        "Team lunch",
                        "Content-Type: text/plain; charset=\"UTF-8\"\n\nAre we still on for lunch on Friday?",
                    )
                    .with_date(now - Duration::hours(2)),
                    Message::new(
                        "2",
                        "billing@example.com",
                        "Your invoice",
                        "--_000_INVOICE_\n<p>Your invoice for March is <b>ready</b>.</p>[image: logo.png]",
                    )
                    .with_date(now - Duration::days(1)),
                    Message::new(
                        "3",
                        "bob@example.com",
                        "Quarterly report",
                        "Hi, the quarterly report is attached. Revenue grew by ten percent. [report.pdf]",
                    )
                    .with_date(now - Duration::days(3)),
                ],
            )
            .with_messages(
                "Archive",
                vec![Message::new(
                    "4",
                    "carol@example.com",
                    "Old photos",
                    "Found some photos from the trip.",
                )
                .with_date(now - Duration::days(40))],
            )
    }

    pub fn add_message(&self, folder: &str, message: Message) {
        self.folders
            .lock()
            .entry(folder.to_string())
            .or_default()
            .push(message);
    }

    /// Make `operation` answer with a failure envelope
    pub fn fail(&self, operation: Operation) {
        self.failing.lock().insert(operation);
    }

    pub fn recover(&self, operation: Operation) {
        self.failing.lock().remove(&operation);
    }

    fn is_failing(&self, operation: Operation) -> bool {
        self.failing.lock().contains(&operation)
    }

    pub fn sent(&self) -> Vec<SendRequest> {
        self.sent.lock().clone()
    }

    pub fn read_requests(&self) -> Vec<String> {
        self.read_requests.lock().clone()
    }

    pub fn search_requests(&self) -> Vec<String> {
        self.search_requests.lock().clone()
    }

    pub fn summarize_requests(&self) -> Vec<String> {
        self.summarize_requests.lock().clone()
    }
}

fn simulated(what: &str) -> Option<String> {
    Some(format!("Error {}: simulated failure", what))
}

#[async_trait]
impl MailboxTransport for InMemoryMailbox {
    async fn send(&self, request: &SendRequest) -> Result<SendResponse, TransportError> {
        self.sent.lock().push(request.clone());

        if self.is_failing(Operation::Send) {
            return Ok(SendResponse {
                success: false,
                message_id: None,
                message: simulated("sending email"),
            });
        }

        Ok(SendResponse {
            success: true,
            message_id: Some(format!("<{}@voxmail.local>", Uuid::new_v4())),
            message: Some("Email sent successfully".to_string()),
        })
    }

    async fn read_emails(&self, folder: &str) -> Result<EmailsResponse, TransportError> {
        self.read_requests.lock().push(folder.to_string());

        if self.is_failing(Operation::Read) {
            return Ok(EmailsResponse {
                success: false,
                emails: Vec::new(),
                message: simulated("reading emails"),
            });
        }

        match self.folders.lock().get(folder) {
            Some(messages) => Ok(EmailsResponse {
                success: true,
                emails: messages.clone(),
                message: None,
            }),
            None => Ok(EmailsResponse {
                success: false,
                emails: Vec::new(),
                message: Some(format!("Error reading emails: unknown folder {}", folder)),
            }),
        }
    }

    async fn search(&self, query: &str) -> Result<EmailsResponse, TransportError> {
        self.search_requests.lock().push(query.to_string());

        if self.is_failing(Operation::Search) {
            return Ok(EmailsResponse {
                success: false,
                emails: Vec::new(),
                message: simulated("searching emails"),
            });
        }

        let needle = query.to_lowercase();
        let emails = self
            .folders
            .lock()
            .values()
            .flatten()
            .filter(|m| {
                m.from.to_lowercase().contains(&needle)
                    || m.subject.to_lowercase().contains(&needle)
                    || m.content.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();

        Ok(EmailsResponse {
            success: true,
            emails,
            message: None,
        })
    }

    async fn summarize(&self, request: &SummarizeRequest) -> Result<SummaryResponse, TransportError> {
        self.summarize_requests.lock().push(request.content.clone());

        if self.is_failing(Operation::Summarize) {
            return Ok(SummaryResponse {
                success: false,
                summary: None,
                message: simulated("summarizing email"),
            });
        }

        let words: Vec<&str> = request.content.split_whitespace().collect();
        let mut summary = words
            .iter()
            .take(SUMMARY_WORDS)
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        if words.len() > SUMMARY_WORDS {
            summary.push_str("...");
        }

        Ok(SummaryResponse {
            success: true,
            summary: Some(summary),
            message: None,
        })
    }

    async fn folders(&self) -> Result<FoldersResponse, TransportError> {
        if self.is_failing(Operation::Folders) {
            return Ok(FoldersResponse {
                success: false,
                folders: Vec::new(),
                message: simulated("fetching folders"),
            });
        }

        Ok(FoldersResponse {
            success: true,
            folders: self.folders.lock().keys().cloned().collect(),
            message: None,
        })
    }
}
