//! Configuration for the integration layer
//!
//! Provides centralized configuration for the mailbox client, the dialogue
//! controller and the speech adapter. Every field has a default, so a TOML
//! file only needs the values it changes.

use crate::{Result, VoxmailError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Configuration for the complete application
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoxmailConfig {
    pub mailbox: MailboxConfig,
    pub dialogue: DialogueConfig,
    pub speech: SpeechConfig,
}

/// Where the mailbox service lives and how to reach it
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailboxConfig {
    /// Base URL all routes are joined to
    pub base_url: String,

    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,

    /// Folder targeted by read operations at startup
    pub default_folder: String,

    pub routes: MailboxRoutes,
}

impl Default for MailboxConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            timeout_ms: 15_000,
            default_folder: "INBOX".to_string(),
            routes: MailboxRoutes::default(),
        }
    }
}

/// Route names relative to `base_url`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailboxRoutes {
    pub send: String,
    pub read_emails: String,
    pub search: String,
    pub summarize: String,
    pub folders: String,
}

impl Default for MailboxRoutes {
    fn default() -> Self {
        Self {
            send: "send".to_string(),
            read_emails: "read-emails".to_string(),
            search: "search".to_string(),
            summarize: "summarize".to_string(),
            folders: "folders".to_string(),
        }
    }
}

/// Which messages "summarize latest" and "summarize all" work on
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummarizeSource {
    /// Fetch from the current folder every time
    #[default]
    FreshFetch,
    /// Reuse the batch of the last read; fetch when there is none
    LastBatch,
}

/// Dialogue pacing and limits
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueConfig {
    /// Messages spoken by the read flow
    pub read_limit: usize,

    /// Silence between two spoken messages, in milliseconds
    pub pacing_gap_ms: u64,

    pub rate_step: f32,
    pub min_rate: f32,
    pub max_rate: f32,
    pub default_rate: f32,

    pub summarize_source: SummarizeSource,

    /// Messages combined by "summarize all"
    pub summarize_batch: usize,

    /// Longest content submitted for summarization, in characters
    pub max_summary_chars: usize,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            read_limit: 5,
            pacing_gap_ms: 1000,
            rate_step: 0.25,
            min_rate: 0.5,
            max_rate: 2.0,
            default_rate: 1.0,
            summarize_source: SummarizeSource::FreshFetch,
            summarize_batch: 5,
            max_summary_chars: crate::mailbox::MAX_SUMMARY_CHARS,
        }
    }
}

/// Console speech adapter settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// A listen cycle with no transcript ends as `no-speech` after this long
    pub listen_timeout_ms: u64,

    /// Simulated speaking speed at rate 1.0
    pub words_per_minute: u32,

    /// Fail setup unless a microphone can be opened
    pub require_microphone: bool,

    /// Render cues as tones on the output device
    pub cue_tones: bool,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            listen_timeout_ms: 30_000,
            words_per_minute: 170,
            require_microphone: false,
            cue_tones: true,
        }
    }
}

impl VoxmailConfig {
    /// Load a configuration file; missing fields keep their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            VoxmailError::ConfigError(format!("Failed to read config '{}': {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| VoxmailError::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Defaults overridden from the process environment
    pub fn from_env() -> Self {
        Self::default().apply_env()
    }

    /// Apply `VOXMAIL_*` environment overrides
    pub fn apply_env(self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup; unparsable values are ignored
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        fn parsed<T: std::str::FromStr>(key: &str, value: Option<String>) -> Option<T> {
            let value = value?;
            match value.trim().parse() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!("Ignoring {}: cannot parse '{}'", key, value);
                    None
                }
            }
        }

        if let Some(url) = lookup("VOXMAIL_API_URL") {
            debug!("API URL from environment: {}", url);
            self.mailbox.base_url = url;
        }
        if let Some(folder) = lookup("VOXMAIL_FOLDER") {
            self.mailbox.default_folder = folder;
        }
        if let Some(limit) = parsed("VOXMAIL_READ_LIMIT", lookup("VOXMAIL_READ_LIMIT")) {
            self.dialogue.read_limit = limit;
        }
        if let Some(gap) = parsed("VOXMAIL_PACING_MS", lookup("VOXMAIL_PACING_MS")) {
            self.dialogue.pacing_gap_ms = gap;
        }
        if let Some(timeout) = parsed(
            "VOXMAIL_LISTEN_TIMEOUT_MS",
            lookup("VOXMAIL_LISTEN_TIMEOUT_MS"),
        ) {
            self.speech.listen_timeout_ms = timeout;
        }
        self
    }

    /// Point the mailbox client at another service
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.mailbox.base_url = url.into();
        self
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.mailbox.default_folder = folder.into();
        self
    }

    pub fn with_read_limit(mut self, limit: usize) -> Self {
        self.dialogue.read_limit = limit;
        self
    }

    /// Set the silence between spoken messages
    pub fn with_pacing_gap_ms(mut self, gap_ms: u64) -> Self {
        self.dialogue.pacing_gap_ms = gap_ms;
        self
    }

    pub fn with_summarize_source(mut self, source: SummarizeSource) -> Self {
        self.dialogue.summarize_source = source;
        self
    }

    /// Disable cue tones (silent mode)
    pub fn without_cue_tones(mut self) -> Self {
        self.speech.cue_tones = false;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        let url = self.mailbox.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(format!("API URL must be http(s): {}", self.mailbox.base_url));
        }
        if self.mailbox.timeout_ms == 0 {
            return Err("Request timeout must be positive".to_string());
        }
        if self.mailbox.default_folder.trim().is_empty() {
            return Err("Default folder is required".to_string());
        }

        let d = &self.dialogue;
        if d.read_limit == 0 {
            return Err("Read limit must be at least 1".to_string());
        }
        if d.summarize_batch == 0 {
            return Err("Summarize batch must be at least 1".to_string());
        }
        if d.max_summary_chars == 0 {
            return Err("Summary input limit must be positive".to_string());
        }
        if !(d.min_rate > 0.0 && d.min_rate <= d.max_rate) {
            return Err(format!(
                "Invalid speech rate bounds [{}, {}]",
                d.min_rate, d.max_rate
            ));
        }
        if d.default_rate < d.min_rate || d.default_rate > d.max_rate {
            return Err(format!(
                "Default speech rate {} outside [{}, {}]",
                d.default_rate, d.min_rate, d.max_rate
            ));
        }
        if d.rate_step <= 0.0 {
            return Err("Rate step must be positive".to_string());
        }

        if self.speech.words_per_minute == 0 {
            return Err("Words per minute must be positive".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = VoxmailConfig::default();
        assert_eq!(config.mailbox.base_url, "http://localhost:3000/api");
        assert_eq!(config.mailbox.default_folder, "INBOX");
        assert_eq!(config.dialogue.read_limit, 5);
        assert_eq!(config.dialogue.pacing_gap_ms, 1000);
        assert_eq!(config.dialogue.summarize_source, SummarizeSource::FreshFetch);
        assert_eq!(config.speech.listen_timeout_ms, 30_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = VoxmailConfig::default()
            .with_api_url("https://mail.example.com/api")
            .with_folder("Archive")
            .with_read_limit(3)
            .with_summarize_source(SummarizeSource::LastBatch)
            .without_cue_tones();

        assert_eq!(config.mailbox.base_url, "https://mail.example.com/api");
        assert_eq!(config.mailbox.default_folder, "Archive");
        assert_eq!(config.dialogue.read_limit, 3);
        assert_eq!(config.dialogue.summarize_source, SummarizeSource::LastBatch);
        assert!(!config.speech.cue_tones);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = VoxmailConfig::parse(
            r#"
            [mailbox]
            base_url = "http://10.0.0.2:3000/api"

            [dialogue]
            summarize_source = "last_batch"
            pacing_gap_ms = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.mailbox.base_url, "http://10.0.0.2:3000/api");
        assert_eq!(config.mailbox.routes.read_emails, "read-emails");
        assert_eq!(config.dialogue.summarize_source, SummarizeSource::LastBatch);
        assert_eq!(config.dialogue.pacing_gap_ms, 0);
        assert_eq!(config.dialogue.read_limit, 5);
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            VoxmailConfig::parse("[dialogue]\nread_limit = \"many\""),
            Err(VoxmailError::ConfigError(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("VOXMAIL_API_URL", "http://mail.local/api"),
            ("VOXMAIL_FOLDER", "Sent"),
            ("VOXMAIL_READ_LIMIT", "2"),
            ("VOXMAIL_PACING_MS", "not-a-number"),
            ("VOXMAIL_LISTEN_TIMEOUT_MS", "5000"),
        ]
        .into_iter()
        .collect();

        let config = VoxmailConfig::default()
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.mailbox.base_url, "http://mail.local/api");
        assert_eq!(config.mailbox.default_folder, "Sent");
        assert_eq!(config.dialogue.read_limit, 2);
        assert_eq!(config.dialogue.pacing_gap_ms, 1000);
        assert_eq!(config.speech.listen_timeout_ms, 5000);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(VoxmailConfig::default()
            .with_api_url("ftp://nope")
            .validate()
            .is_err());
        assert!(VoxmailConfig::default().with_read_limit(0).validate().is_err());

        let mut config = VoxmailConfig::default();
        config.dialogue.default_rate = 3.0;
        assert!(config.validate().is_err());
    }
}
