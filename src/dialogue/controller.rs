//! The dialogue state machine
//!
//! Handles one event at a time. Each `handle` call finishes all of its speech
//! and mailbox work before returning, and its [`Continuation`] says whether
//! listening should be re-armed. No action failure escapes: it is spoken as an
//! apology and the session returns to `Listening`.

use super::commands::{Command, ResultsCommand, Transcript};
use super::prompts;
use super::state::{DialogueState, SearchResults, Session};
use crate::audio::Cue;
use crate::integration::config::{DialogueConfig, SummarizeSource, VoxmailConfig};
use crate::mailbox::{MailboxClient, MailboxError, MailboxTransport, Message};
use crate::sanitize::sanitize;
use crate::speech::{Playback, Recognition, RecognitionError, SpeechCapability, SpeechError};
use crate::ui::StatusBoard;
use crate::VoxmailError;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Inbound events the controller reacts to
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DialogueEvent {
    /// A final transcript from one recognition cycle
    Heard(String),
    /// The recognition cycle failed
    RecognitionFailed(RecognitionError),
}

/// What the caller should do after an event was handled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Continuation {
    /// Start the next recognition cycle
    Listen,
    /// The session is idle; wait for a new activation
    Halt,
}

pub struct DialogueController<S: ?Sized, T> {
    pub(super) session: Session,
    pub(super) speech: Arc<S>,
    pub(super) mailbox: MailboxClient<T>,
    pub(super) board: StatusBoard,
    pub(super) config: DialogueConfig,
}

impl<S, T> DialogueController<S, T>
where
    S: SpeechCapability + ?Sized,
    T: MailboxTransport,
{
    pub fn new(config: &VoxmailConfig, speech: Arc<S>, transport: T, board: StatusBoard) -> Self {
        let mailbox =
            MailboxClient::new(transport).with_max_summary_chars(config.dialogue.max_summary_chars);
        let session = Session::new(
            config.mailbox.default_folder.clone(),
            config.dialogue.default_rate,
        );
        board.set_status(prompts::STATUS_ACTIVATE);

        Self {
            session,
            speech,
            mailbox,
            board,
            config: config.dialogue.clone(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn board(&self) -> &StatusBoard {
        &self.board
    }

    pub fn mailbox(&self) -> &MailboxClient<T> {
        &self.mailbox
    }

    pub fn speech(&self) -> Arc<S> {
        Arc::clone(&self.speech)
    }

    /// Run one recognition cycle and handle its outcome
    ///
    /// Returns `None` when the cycle was stopped without a result.
    pub async fn listen_once(&mut self) -> Option<Continuation> {
        if !self.session.is_armed() {
            return Some(Continuation::Halt);
        }

        self.board.set_status(prompts::STATUS_LISTENING);
        match self.speech.listen().await {
            Recognition::Heard(text) => Some(self.handle(DialogueEvent::Heard(text)).await),
            Recognition::Failed(e) => Some(self.handle(DialogueEvent::RecognitionFailed(e)).await),
            Recognition::Stopped => {
                debug!("Recognition stopped without a result");
                None
            }
        }
    }

    /// Keep listening until the session halts or recognition stops producing results
    pub async fn run(&mut self) -> Continuation {
        loop {
            match self.listen_once().await {
                Some(Continuation::Listen) => continue,
                Some(Continuation::Halt) => return Continuation::Halt,
                None => return Continuation::Listen,
            }
        }
    }

    /// Process one event against the current state
    pub async fn handle(&mut self, event: DialogueEvent) -> Continuation {
        if !self.session.is_armed() {
            debug!(?event, "Session idle, ignoring event");
            return Continuation::Halt;
        }

        match event {
            DialogueEvent::Heard(text) => self.on_transcript(Transcript::new(&text)).await,
            DialogueEvent::RecognitionFailed(e) => self.on_recognition_error(e),
        }

        self.publish_state();
        if self.session.is_armed() {
            Continuation::Listen
        } else {
            Continuation::Halt
        }
    }

    pub(super) fn publish_state(&self) {
        self.board
            .set_state(self.session.state(), self.session.is_armed());
    }

    /// Speak at the current rate; an interrupted utterance counts as done
    pub(super) async fn say(&self, text: &str) -> Result<(), SpeechError> {
        match self.speech.speak(text, self.session.speech_rate()).await? {
            Playback::Completed => {}
            Playback::Interrupted => debug!("Utterance interrupted by user"),
        }
        Ok(())
    }

    /// Speak an apology and return to `Listening` with an empty draft
    async fn recover(&mut self, error: VoxmailError, apology: &str) {
        warn!("Action failed ({:?}): {}", error.class(), error);
        self.session.transition(DialogueState::Listening);
        self.session.draft.clear();

        if let Err(e) = self.say(apology).await {
            error!("Failed to speak apology: {}", e);
        }
        self.speech.play_cue(Cue::Error);
    }

    fn on_recognition_error(&mut self, error: RecognitionError) {
        warn!("Speech recognition error: {}", error);
        self.speech.play_cue(Cue::Error);
        self.board.set_status(prompts::status_error(&error.to_string()));

        if error.is_permission_loss() {
            error!("Microphone access revoked, ending session");
            self.session.lose_capability();
            self.board.set_status(prompts::STATUS_NO_MICROPHONE);
        }
    }

    async fn on_transcript(&mut self, transcript: Transcript) {
        info!("Heard '{}' in {}", transcript.raw(), self.session.state());
        self.board.set_transcript(transcript.raw());
        self.board.set_status(prompts::STATUS_PROCESSING);

        if let Err(e) = self.dispatch(&transcript).await {
            self.recover(e, prompts::APOLOGY).await;
        }
    }

    async fn dispatch(&mut self, transcript: &Transcript) -> crate::Result<()> {
        let state = self.session.state();

        if transcript.is_empty() {
            debug!("Empty transcript in {}", state);
            self.say(self.reprompt(state)).await?;
            return Ok(());
        }

        match state {
            DialogueState::Idle => {}
            DialogueState::Listening => self.on_command(transcript).await?,
            DialogueState::ComposeTo => {
                self.session.draft.recipient = Some(transcript.raw().to_string());
                self.session.transition(DialogueState::ComposeSubject);
                self.say(prompts::ASK_SUBJECT).await?;
            }
            DialogueState::ComposeSubject => {
                self.session.draft.subject = Some(transcript.raw().to_string());
                self.session.transition(DialogueState::ComposeBody);
                self.say(prompts::ASK_BODY).await?;
            }
            DialogueState::ComposeBody => {
                self.session.draft.body = Some(transcript.raw().to_string());
                self.send_draft().await?;
            }
            DialogueState::Searching => self.run_search(transcript.raw()).await?,
            DialogueState::ReadingResults => self.on_results_command(transcript).await?,
            DialogueState::ChooseFolder => self.choose_folder(transcript).await?,
        }
        Ok(())
    }

    /// The question to repeat when nothing was heard
    fn reprompt(&self, state: DialogueState) -> &'static str {
        match state {
            DialogueState::Idle | DialogueState::Listening => prompts::HELP,
            DialogueState::ComposeTo => prompts::ASK_RECIPIENT,
            DialogueState::ComposeSubject => prompts::ASK_SUBJECT,
            DialogueState::ComposeBody => prompts::ASK_BODY,
            DialogueState::Searching => prompts::ASK_QUERY,
            DialogueState::ReadingResults => prompts::RESULTS_HINT,
            DialogueState::ChooseFolder => prompts::ASK_FOLDER,
        }
    }

    async fn on_command(&mut self, transcript: &Transcript) -> crate::Result<()> {
        let Some(command) = Command::parse(transcript) else {
            debug!("Unrecognized command '{}'", transcript.normalized());
            self.say(prompts::HELP).await?;
            return Ok(());
        };
        info!(?command, "Command");

        match command {
            Command::Compose => {
                self.session.draft.clear();
                self.session.transition(DialogueState::ComposeTo);
                self.say(prompts::ASK_RECIPIENT).await?;
            }
            Command::Read => self.read_emails().await?,
            Command::Search => {
                self.session.transition(DialogueState::Searching);
                self.say(prompts::ASK_QUERY).await?;
            }
            Command::SpeedUp => self.change_rate(self.config.rate_step).await?,
            Command::SlowDown => self.change_rate(-self.config.rate_step).await?,
            Command::Exit => self.exit().await,
            Command::SummarizeLatest => self.summarize_latest().await?,
            Command::SummarizeAll => self.summarize_all().await?,
            Command::ListFolders => self.list_folders().await?,
            Command::ChangeFolder => {
                self.session.transition(DialogueState::ChooseFolder);
                self.say(prompts::ASK_FOLDER).await?;
            }
        }
        Ok(())
    }

    async fn change_rate(&mut self, delta: f32) -> crate::Result<()> {
        let rate = self
            .session
            .adjust_rate(delta, self.config.min_rate, self.config.max_rate);
        info!("Speech rate now {}", rate);
        self.say(&prompts::rate_changed(rate)).await?;
        Ok(())
    }

    async fn exit(&mut self) {
        if let Err(e) = self.say(prompts::GOODBYE).await {
            warn!("Failed to say goodbye: {}", e);
        }
        self.speech.play_cue(Cue::Notification);
        self.session.disarm();
        self.board.set_status(prompts::STATUS_ACTIVATE);
        info!("Session ended");
    }

    async fn send_draft(&mut self) -> crate::Result<()> {
        self.board.set_status(prompts::STATUS_SENDING);
        let outcome = self.mailbox.send(&self.session.draft).await;

        // Draft is cleared whatever the outcome
        self.session.transition(DialogueState::Listening);

        match outcome {
            Ok(receipt) => {
                info!("Email sent ({})", receipt.message_id);
                self.speech.play_cue(Cue::Success);
                self.say(prompts::SEND_SUCCESS).await?;
                self.say(prompts::COMMANDS_ANNOUNCEMENT).await?;
            }
            Err(e) => self.recover(e.into(), prompts::SEND_FAILED).await,
        }
        Ok(())
    }

    /// Speak up to `read_limit` messages from the current folder
    async fn read_emails(&mut self) -> crate::Result<()> {
        // Keep our own voice out of the recognizer
        self.speech.stop_listening();
        self.board.set_status(prompts::STATUS_FETCHING);

        let folder = self.session.current_folder.clone();
        let messages = match self.mailbox.fetch(&folder, self.config.read_limit).await {
            Ok(messages) => messages,
            Err(e) => {
                self.recover(e.into(), prompts::READ_FAILED).await;
                return Ok(());
            }
        };

        if messages.is_empty() {
            info!("No emails in {}", folder);
            self.say(&prompts::empty_folder(&folder)).await?;
            return Ok(());
        }

        self.speech.play_cue(Cue::Notification);
        self.say(&prompts::read_intro(messages.len())).await?;

        let gap = Duration::from_millis(self.config.pacing_gap_ms);
        for (i, message) in messages.iter().enumerate() {
            if i > 0 && !gap.is_zero() {
                tokio::time::sleep(gap).await;
            }
            let text = prompts::read_item(
                i + 1,
                &message.from,
                &message.subject,
                &sanitize(&message.content),
            );
            self.say(&text).await?;
        }

        self.session.last_batch = messages;
        self.say(prompts::READ_COMPLETE).await?;
        Ok(())
    }

    async fn run_search(&mut self, query: &str) -> crate::Result<()> {
        self.board.set_status(prompts::STATUS_SEARCHING);

        let hits = match self.mailbox.search(query).await {
            Ok(hits) => hits,
            Err(e) => {
                self.recover(e.into(), prompts::SEARCH_FAILED).await;
                return Ok(());
            }
        };

        if hits.is_empty() {
            info!("No matches for '{}'", query);
            self.session.transition(DialogueState::Listening);
            self.say(prompts::NO_MATCHES).await?;
            self.say(prompts::COMMANDS_ANNOUNCEMENT).await?;
            return Ok(());
        }

        info!("{} matches for '{}'", hits.len(), query);
        self.speech.play_cue(Cue::Notification);
        self.session.transition(DialogueState::ReadingResults);
        self.session.results = SearchResults::new(hits);

        self.say(&prompts::search_found(self.session.results.len())).await?;
        self.speak_next_hit().await
    }

    async fn on_results_command(&mut self, transcript: &Transcript) -> crate::Result<()> {
        match ResultsCommand::parse(transcript) {
            Some(ResultsCommand::Next) => self.speak_next_hit().await,
            Some(ResultsCommand::Stop) => {
                self.session.transition(DialogueState::Listening);
                self.say(prompts::COMMANDS_ANNOUNCEMENT).await?;
                Ok(())
            }
            None => {
                self.say(prompts::RESULTS_HINT).await?;
                Ok(())
            }
        }
    }

    async fn speak_next_hit(&mut self) -> crate::Result<()> {
        let next = self
            .session
            .results
            .next_hit()
            .map(|(position, hit)| prompts::search_hit(position, &hit.from, &hit.subject));

        match next {
            Some(text) => self.say(&text).await?,
            None => {
                self.session.transition(DialogueState::Listening);
                self.say(prompts::NO_MORE_RESULTS).await?;
                self.say(prompts::COMMANDS_ANNOUNCEMENT).await?;
            }
        }
        Ok(())
    }

    /// Messages for a summary, newest first
    async fn summary_source(&self, count: usize) -> Result<Vec<Message>, MailboxError> {
        if self.config.summarize_source == SummarizeSource::LastBatch
            && !self.session.last_batch.is_empty()
        {
            debug!("Summarizing from the last read batch");
            return Ok(self.session.last_batch.iter().take(count).cloned().collect());
        }
        self.mailbox.fetch(&self.session.current_folder, count).await
    }

    async fn summarize_latest(&mut self) -> crate::Result<()> {
        self.board.set_status(prompts::STATUS_SUMMARIZING);

        let latest = match self.summary_source(1).await {
            Ok(mut messages) if !messages.is_empty() => messages.remove(0),
            Ok(_) => {
                self.say(prompts::NOTHING_TO_SUMMARIZE).await?;
                return Ok(());
            }
            Err(e) => {
                self.recover(e.into(), prompts::SUMMARIZE_FAILED).await;
                return Ok(());
            }
        };

        match self.mailbox.summarize(&sanitize(&latest.content)).await {
            Ok(summary) => {
                self.speech.play_cue(Cue::Success);
                self.say(&prompts::summary_latest(&latest.from, &summary)).await?;
            }
            Err(e) => self.recover(e.into(), prompts::SUMMARIZE_FAILED).await,
        }
        Ok(())
    }

    async fn summarize_all(&mut self) -> crate::Result<()> {
        self.board.set_status(prompts::STATUS_SUMMARIZING);

        let messages = match self.summary_source(self.config.summarize_batch).await {
            Ok(messages) => messages,
            Err(e) => {
                self.recover(e.into(), prompts::SUMMARIZE_FAILED).await;
                return Ok(());
            }
        };
        if messages.is_empty() {
            self.say(prompts::NOTHING_TO_SUMMARIZE).await?;
            return Ok(());
        }

        let combined = messages
            .iter()
            .map(|m| format!("From {}. Subject {}. {}", m.from, m.subject, sanitize(&m.content)))
            .collect::<Vec<_>>()
            .join("\n\n");

        match self.mailbox.summarize(&combined).await {
            Ok(summary) => {
                self.speech.play_cue(Cue::Success);
                self.say(&prompts::summary_all(messages.len(), &summary)).await?;
            }
            Err(e) => self.recover(e.into(), prompts::SUMMARIZE_FAILED).await,
        }
        Ok(())
    }

    async fn list_folders(&mut self) -> crate::Result<()> {
        match self.mailbox.folders().await {
            Ok(folders) => self.say(&prompts::folder_list(&folders)).await?,
            Err(e) => self.recover(e.into(), prompts::FOLDERS_FAILED).await,
        }
        Ok(())
    }

    async fn choose_folder(&mut self, transcript: &Transcript) -> crate::Result<()> {
        let folders = match self.mailbox.folders().await {
            Ok(folders) => folders,
            Err(e) => {
                self.recover(e.into(), prompts::FOLDERS_FAILED).await;
                return Ok(());
            }
        };

        self.session.transition(DialogueState::Listening);
        let wanted = transcript.normalized();
        match folders.into_iter().find(|f| f.to_lowercase() == wanted) {
            Some(folder) => {
                info!("Current folder is now {}", folder);
                self.say(&prompts::folder_changed(&folder)).await?;
                self.session.current_folder = folder;
            }
            None => {
                debug!("No folder named '{}'", transcript.raw());
                self.say(prompts::FOLDER_NOT_FOUND).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailbox::{InMemoryMailbox, Operation};
    use crate::speech::ScriptedSpeech;

    type Controller = DialogueController<ScriptedSpeech, InMemoryMailbox>;

    fn controller_with(mailbox: InMemoryMailbox) -> (Controller, Arc<ScriptedSpeech>) {
        let config = VoxmailConfig::default().with_pacing_gap_ms(0);
        let speech = Arc::new(ScriptedSpeech::new());
        let controller =
            DialogueController::new(&config, Arc::clone(&speech), mailbox, StatusBoard::new());
        (controller, speech)
    }

    async fn listening(mailbox: InMemoryMailbox) -> (Controller, Arc<ScriptedSpeech>) {
        let (mut controller, speech) = controller_with(mailbox);
        controller.activate().await;
        speech.take_spoken();
        (controller, speech)
    }

    async fn hear(controller: &mut Controller, text: &str) -> Continuation {
        controller.handle(DialogueEvent::Heard(text.to_string())).await
    }

    #[tokio::test]
    async fn test_events_ignored_while_idle() {
        let (mut controller, speech) = controller_with(InMemoryMailbox::new());
        assert_eq!(hear(&mut controller, "compose").await, Continuation::Halt);
        assert!(speech.spoken().is_empty());
        assert_eq!(controller.session().state(), DialogueState::Idle);
    }

    #[tokio::test]
    async fn test_unrecognized_speaks_help_once() {
        let (mut controller, speech) = listening(InMemoryMailbox::new()).await;
        assert_eq!(hear(&mut controller, "banana").await, Continuation::Listen);
        assert_eq!(speech.take_spoken(), vec![prompts::HELP]);
        assert_eq!(controller.session().state(), DialogueState::Listening);
    }

    #[tokio::test]
    async fn test_compose_keeps_raw_case() {
        let (mut controller, _speech) = listening(InMemoryMailbox::new()).await;
        hear(&mut controller, "compose").await;
        hear(&mut controller, "Bob@Example.com").await;
        assert_eq!(
            controller.session().draft.recipient.as_deref(),
            Some("Bob@Example.com")
        );
        assert_eq!(controller.session().state(), DialogueState::ComposeSubject);
    }

    #[tokio::test]
    async fn test_empty_transcript_repeats_question() {
        let (mut controller, speech) = listening(InMemoryMailbox::new()).await;
        hear(&mut controller, "search").await;
        speech.take_spoken();

        hear(&mut controller, "  ").await;
        assert_eq!(speech.take_spoken(), vec![prompts::ASK_QUERY]);
        assert_eq!(controller.session().state(), DialogueState::Searching);
    }

    #[tokio::test]
    async fn test_recognition_error_keeps_state() {
        let (mut controller, speech) = listening(InMemoryMailbox::new()).await;
        hear(&mut controller, "compose").await;

        let next = controller
            .handle(DialogueEvent::RecognitionFailed(RecognitionError::NoSpeech))
            .await;
        assert_eq!(next, Continuation::Listen);
        assert_eq!(controller.session().state(), DialogueState::ComposeTo);
        assert_eq!(controller.board().status(), "Error: no-speech");
        assert_eq!(speech.cues(), vec![Cue::Error]);
    }

    #[tokio::test]
    async fn test_permission_loss_is_fatal() {
        let (mut controller, _speech) = listening(InMemoryMailbox::new()).await;
        let next = controller
            .handle(DialogueEvent::RecognitionFailed(RecognitionError::NotAllowed))
            .await;
        assert_eq!(next, Continuation::Halt);
        assert!(!controller.session().is_armed());
        assert_eq!(controller.board().status(), prompts::STATUS_NO_MICROPHONE);

        // Reactivation is refused
        assert_eq!(controller.activate().await, Continuation::Halt);
    }

    #[tokio::test]
    async fn test_failed_utterance_falls_back_to_apology() {
        let (mut controller, speech) = listening(InMemoryMailbox::new()).await;
        speech.fail_speech_containing("subject");
        hear(&mut controller, "compose").await;
        hear(&mut controller, "a@b.com").await;

        assert_eq!(controller.session().state(), DialogueState::Listening);
        assert!(controller.session().draft.is_empty());
        assert_eq!(speech.spoken_texts().last().map(String::as_str), Some(prompts::APOLOGY));
    }

    #[tokio::test]
    async fn test_read_failure_recovers() {
        let mailbox = InMemoryMailbox::new();
        mailbox.fail(Operation::Read);
        let (mut controller, speech) = listening(mailbox).await;

        assert_eq!(hear(&mut controller, "read").await, Continuation::Listen);
        assert_eq!(speech.take_spoken(), vec![prompts::READ_FAILED]);
        assert_eq!(speech.cues(), vec![Cue::Error]);
        assert_eq!(speech.stop_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_folder_is_announced() {
        let (mut controller, speech) = listening(InMemoryMailbox::new()).await;
        hear(&mut controller, "read").await;
        assert_eq!(speech.take_spoken(), vec!["No emails found in INBOX."]);
    }

    #[tokio::test]
    async fn test_search_hits_next_and_stop() {
        let (mut controller, speech) = listening(InMemoryMailbox::sample()).await;
        hear(&mut controller, "search").await;
        hear(&mut controller, "report").await;
        assert_eq!(controller.session().state(), DialogueState::ReadingResults);

        let spoken = speech.take_spoken();
        assert_eq!(spoken[1], "Found 1 matching emails. Reading results.");
        assert!(spoken[2].starts_with("Result 1 from bob@example.com. Subject: Quarterly report."));

        hear(&mut controller, "maybe").await;
        assert_eq!(speech.take_spoken(), vec![prompts::RESULTS_HINT]);

        hear(&mut controller, "next").await;
        assert_eq!(
            speech.take_spoken(),
            vec![prompts::NO_MORE_RESULTS, prompts::COMMANDS_ANNOUNCEMENT]
        );
        assert_eq!(controller.session().state(), DialogueState::Listening);
    }

    #[tokio::test]
    async fn test_change_folder() {
        let (mut controller, speech) = listening(InMemoryMailbox::sample()).await;
        hear(&mut controller, "change folder").await;
        assert_eq!(controller.session().state(), DialogueState::ChooseFolder);

        hear(&mut controller, "archive.").await;
        assert_eq!(controller.session().current_folder, "Archive");
        assert_eq!(controller.session().state(), DialogueState::Listening);

        hear(&mut controller, "change folder").await;
        speech.take_spoken();
        hear(&mut controller, "spam").await;
        assert_eq!(speech.take_spoken(), vec![prompts::FOLDER_NOT_FOUND]);
        assert_eq!(controller.session().current_folder, "Archive");
    }

    #[tokio::test]
    async fn test_summarize_latest() {
        let (mut controller, speech) = listening(InMemoryMailbox::sample()).await;
        hear(&mut controller, "summarize latest").await;

        let spoken = speech.take_spoken();
        assert_eq!(spoken.len(), 1);
        assert!(spoken[0].starts_with("Summary of the latest email from alice@example.com:"));
        assert_eq!(speech.cues(), vec![Cue::Success]);

        // Sanitized content goes to the summarizer
        let requests = controller.mailbox().transport().summarize_requests();
        assert_eq!(requests, vec!["Are we still on for lunch on Friday?"]);
    }

    #[tokio::test]
    async fn test_summarize_last_batch_reuses_read() {
        let config = VoxmailConfig::default()
            .with_pacing_gap_ms(0)
            .with_summarize_source(SummarizeSource::LastBatch);
        let speech = Arc::new(ScriptedSpeech::new());
        let mut controller = DialogueController::new(
            &config,
            Arc::clone(&speech),
            InMemoryMailbox::sample(),
            StatusBoard::new(),
        );
        controller.activate().await;

        hear(&mut controller, "read").await;
        hear(&mut controller, "summarize all").await;

        // One fetch for the read, none for the summary
        assert_eq!(controller.mailbox().transport().read_requests().len(), 1);
        let spoken = speech.spoken_texts();
        assert!(spoken
            .last()
            .is_some_and(|s| s.starts_with("Summary of your latest 3 emails:")));
    }

    #[tokio::test]
    async fn test_nothing_to_summarize() {
        let (mut controller, speech) = listening(InMemoryMailbox::new()).await;
        hear(&mut controller, "summarize all").await;
        assert_eq!(speech.take_spoken(), vec![prompts::NOTHING_TO_SUMMARIZE]);
    }

    #[tokio::test]
    async fn test_list_folders() {
        let (mut controller, speech) = listening(InMemoryMailbox::sample()).await;
        hear(&mut controller, "list folders").await;
        assert_eq!(speech.take_spoken(), vec!["Your folders are: Archive, INBOX."]);
    }
}
